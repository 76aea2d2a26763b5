//! Conversation input and normalized chat results.

use hcommon::{ChatOptions, MetadataMap};
use hprovider::{BoxedStream, FinishReason, Message, Role, TokenUsage, ToolCall};

use crate::ChatError;

/// Generation metadata key holding the provider response id.
pub const METADATA_ID: &str = "id";
/// Generation metadata key holding the assistant role.
pub const METADATA_ROLE: &str = "role";
/// Generation metadata key holding the raw finish reason.
pub const METADATA_FINISH_REASON: &str = "finish_reason";

/// Ordered messages plus per-call options. Never mutated in place; each tool
/// round builds a new value with [`Conversation::extend_with`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Conversation {
    pub messages: Vec<Message>,
    pub options: ChatOptions,
}

impl Conversation {
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            messages,
            options: ChatOptions::default(),
        }
    }

    pub fn from_user(content: impl Into<String>) -> Self {
        Self::new(vec![Message::user(content)])
    }

    pub fn with_options(mut self, options: ChatOptions) -> Self {
        self.options = options;
        self
    }

    /// Returns a new conversation with `messages` appended and the same options.
    pub fn extend_with<I>(&self, messages: I) -> Self
    where
        I: IntoIterator<Item = Message>,
    {
        let mut extended = self.messages.clone();
        extended.extend(messages);

        Self {
            messages: extended,
            options: self.options.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Generation {
    pub index: u32,
    pub text: String,
    pub tool_calls: Vec<ToolCall>,
    /// Raw wire value; empty when the provider has not finished this choice.
    pub finish_reason: String,
    pub metadata: MetadataMap,
}

impl Generation {
    pub fn response_id(&self) -> &str {
        self.metadata_value(METADATA_ID)
    }

    pub fn role(&self) -> Option<Role> {
        match self.metadata_value(METADATA_ROLE) {
            "system" => Some(Role::System),
            "user" => Some(Role::User),
            "assistant" => Some(Role::Assistant),
            "tool" => Some(Role::Tool),
            _ => None,
        }
    }

    pub fn finish(&self) -> Option<FinishReason> {
        FinishReason::parse(&self.finish_reason)
    }

    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }

    pub fn metadata_value(&self, key: &str) -> &str {
        self.metadata.get(key).map(String::as_str).unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChatResultMetadata {
    pub id: String,
    pub model: String,
    pub usage: TokenUsage,
    pub created: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChatResult {
    pub generations: Vec<Generation>,
    pub metadata: ChatResultMetadata,
}

impl ChatResult {
    /// The result for an absent completion or a fragment that failed to normalize.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.generations.is_empty()
    }

    pub fn first(&self) -> Option<&Generation> {
        self.generations.first()
    }

    /// Text of the first generation, or `""` when there is none.
    pub fn text(&self) -> &str {
        self.first()
            .map(|generation| generation.text.as_str())
            .unwrap_or_default()
    }

    pub fn has_tool_calls(&self) -> bool {
        self.generations.iter().any(Generation::has_tool_calls)
    }
}

pub type ChatResultStream<'a> = BoxedStream<'a, Result<ChatResult, ChatError>>;
