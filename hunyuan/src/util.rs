//! Small convenience constructors for common types.

use crate::{ChatOptions, Conversation, Message, Role, ToolDefinition};

pub fn system_message(content: impl Into<String>) -> Message {
    Message::new(Role::System, content)
}

pub fn user_message(content: impl Into<String>) -> Message {
    Message::new(Role::User, content)
}

pub fn assistant_message(content: impl Into<String>) -> Message {
    Message::new(Role::Assistant, content)
}

pub fn tool_message(tool_call_id: impl Into<String>, content: impl Into<String>) -> Message {
    Message::tool_result(tool_call_id, content)
}

/// A single-turn conversation, optionally prefixed with a system prompt.
pub fn ask(system_prompt: Option<&str>, user_input: impl Into<String>) -> Conversation {
    let mut messages = Vec::with_capacity(2);
    if let Some(prompt) = system_prompt.filter(|prompt| !prompt.trim().is_empty()) {
        messages.push(system_message(prompt));
    }
    messages.push(user_message(user_input));
    Conversation::new(messages)
}

/// A conversation that enables the named tools for this call only.
pub fn ask_with_tools<I, S>(user_input: impl Into<String>, tools: I) -> Conversation
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Conversation::from_user(user_input)
        .with_options(ChatOptions::default().with_enabled_tools(tools))
}

pub fn tool_definition(
    name: impl Into<String>,
    description: impl Into<String>,
    input_schema: impl Into<String>,
) -> ToolDefinition {
    ToolDefinition {
        name: name.into(),
        description: description.into(),
        input_schema: input_schema.into(),
    }
}
