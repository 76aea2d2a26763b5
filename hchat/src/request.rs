//! Assembly of provider requests from a conversation and layered options.
//!
//! Options merge in three layers: an empty base, the client defaults, then the
//! per-call options. A field set on a later layer wins; enabled tool names are
//! unioned and resolved through the tool runtime.
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use hchat::{ChatRequestBuilder, Conversation};
//! use hcommon::ChatOptions;
//! use htooling::NoopToolRuntime;
//!
//! let builder = ChatRequestBuilder::new(
//!     ChatOptions::default().with_model("hunyuan-pro").with_temperature(0.2),
//!     Arc::new(NoopToolRuntime),
//! );
//! let conversation = Conversation::from_user("hello")
//!     .with_options(ChatOptions::default().with_temperature(0.8));
//!
//! let request = builder.build(&conversation, false).expect("request builds");
//! assert_eq!(request.model, "hunyuan-pro");
//! assert_eq!(request.temperature, Some(0.8));
//! assert!(!request.stream);
//! ```

use std::collections::HashSet;
use std::sync::Arc;

use hcommon::ChatOptions;
use hprovider::{Message, Role};
use hprovider::hunyuan::{ApiMessage, ApiRole, ApiTool, ApiToolCall, ChatCompletionRequest};
use htooling::ToolRuntime;

use crate::{ChatError, Conversation};

#[derive(Clone)]
pub struct ChatRequestBuilder {
    default_options: ChatOptions,
    tools: Arc<dyn ToolRuntime>,
}

impl ChatRequestBuilder {
    pub fn new(default_options: ChatOptions, tools: Arc<dyn ToolRuntime>) -> Self {
        Self {
            default_options,
            tools,
        }
    }

    pub fn default_options(&self) -> &ChatOptions {
        &self.default_options
    }

    /// Effective options for one call: defaults overridden by `per_call`.
    pub fn merge_options(&self, per_call: &ChatOptions) -> ChatOptions {
        ChatOptions::default()
            .apply_overrides(&self.default_options)
            .apply_overrides(per_call)
    }

    pub fn build(
        &self,
        conversation: &Conversation,
        stream: bool,
    ) -> Result<ChatCompletionRequest, ChatError> {
        if conversation.is_empty() {
            return Err(ChatError::invalid_request("conversation has no messages"));
        }

        let options = self.merge_options(&conversation.options);
        options.validate().map_err(ChatError::configuration)?;

        let model = options
            .model
            .clone()
            .ok_or_else(|| ChatError::configuration("no model configured"))?;
        let messages = map_messages(&conversation.messages)?;
        let tools = self
            .tools
            .resolve(&options.enabled_tools)
            .map_err(ChatError::unknown_tool)?;

        Ok(ChatCompletionRequest {
            model,
            messages,
            stream,
            temperature: options.temperature,
            top_p: options.top_p,
            stop: options.stop,
            seed: options.seed,
            enable_enhancement: options.enable_enhancement,
            stream_moderation: options.stream_moderation,
            tools: tools.iter().map(ApiTool::from).collect(),
            tool_choice: options.tool_choice,
        })
    }
}

impl std::fmt::Debug for ChatRequestBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatRequestBuilder")
            .field("default_options", &self.default_options)
            .finish_non_exhaustive()
    }
}

/// Maps conversation messages to wire messages in order.
///
/// Every tool response must name the id of a call issued by an earlier
/// assistant message.
pub fn map_messages(messages: &[Message]) -> Result<Vec<ApiMessage>, ChatError> {
    let mut issued = HashSet::new();
    let mut mapped = Vec::with_capacity(messages.len());

    for message in messages {
        let api_message = match message.role {
            Role::System | Role::User => ApiMessage {
                role: Some(ApiRole::from(message.role)),
                content: message.content.clone(),
                ..ApiMessage::default()
            },
            Role::Assistant => {
                issued.extend(message.tool_calls.iter().map(|call| call.id.as_str()));
                ApiMessage {
                    role: Some(ApiRole::Assistant),
                    content: message.content.clone(),
                    tool_calls: message.tool_calls.iter().map(ApiToolCall::from).collect(),
                    ..ApiMessage::default()
                }
            }
            Role::Tool => {
                let id = message
                    .tool_call_id
                    .as_deref()
                    .filter(|id| !id.trim().is_empty())
                    .ok_or_else(|| ChatError::invalid_request("tool response missing id"))?;

                if !issued.contains(id) {
                    return Err(ChatError::invalid_request(format!(
                        "tool response references unknown tool call '{id}'"
                    )));
                }

                ApiMessage {
                    role: Some(ApiRole::Tool),
                    content: message.content.clone(),
                    tool_call_id: Some(id.to_string()),
                    ..ApiMessage::default()
                }
            }
        };

        mapped.push(api_message);
    }

    Ok(mapped)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use hprovider::{ToolCall, ToolDefinition};
    use htooling::{DefaultToolRuntime, NoopToolRuntime, ToolRegistry};

    use super::*;
    use crate::ChatErrorKind;

    fn registry_builder(defaults: ChatOptions) -> ChatRequestBuilder {
        let mut registry = ToolRegistry::new();
        for name in ["weather", "clock"] {
            registry.register_sync_fn(
                ToolDefinition {
                    name: name.to_string(),
                    description: format!("{name} lookup"),
                    input_schema: r#"{"type":"object"}"#.to_string(),
                },
                |args, _ctx| Ok(args),
            );
        }

        ChatRequestBuilder::new(
            defaults,
            Arc::new(DefaultToolRuntime::new(Arc::new(registry))),
        )
    }

    #[test]
    fn per_call_options_override_defaults_field_by_field() {
        let builder = registry_builder(
            ChatOptions::default()
                .with_model("hunyuan-pro")
                .with_temperature(0.3)
                .with_top_p(0.9)
                .with_enhancement(true),
        );
        let conversation = Conversation::from_user("hi").with_options(
            ChatOptions::default()
                .with_model("hunyuan-lite")
                .with_temperature(1.0),
        );

        let request = builder.build(&conversation, true).expect("request builds");

        assert_eq!(request.model, "hunyuan-lite");
        assert_eq!(request.temperature, Some(1.0));
        assert_eq!(request.top_p, Some(0.9));
        assert_eq!(request.enable_enhancement, Some(true));
        assert!(request.stream);
        assert!(request.tools.is_empty());
    }

    #[test]
    fn enabled_tools_from_both_layers_are_resolved() {
        let builder = registry_builder(
            ChatOptions::default()
                .with_model("hunyuan-pro")
                .with_enabled_tool("weather"),
        );
        let conversation = Conversation::from_user("what time is it")
            .with_options(ChatOptions::default().with_enabled_tool("clock"));

        let request = builder.build(&conversation, false).expect("request builds");
        let names = request
            .tools
            .iter()
            .map(|tool| tool.function.name.as_str())
            .collect::<Vec<_>>();

        assert_eq!(names, vec!["clock", "weather"]);
        assert_eq!(request.tools[0].kind, "function");
    }

    #[test]
    fn unknown_tool_names_fail_instead_of_being_dropped() {
        let builder = registry_builder(ChatOptions::default().with_model("hunyuan-pro"));
        let conversation = Conversation::from_user("hi")
            .with_options(ChatOptions::default().with_enabled_tools(["weather", "stocks"]));

        let error = builder
            .build(&conversation, false)
            .expect_err("unknown tool must fail");

        assert_eq!(error.kind, ChatErrorKind::InvalidRequest);
        assert!(error.message.contains("stocks"));
    }

    #[test]
    fn noop_runtime_rejects_any_enabled_tool() {
        let builder = ChatRequestBuilder::new(
            ChatOptions::default().with_model("hunyuan-pro"),
            Arc::new(NoopToolRuntime),
        );
        let mut options = ChatOptions::default();
        options.enabled_tools = BTreeSet::from(["weather".to_string()]);

        assert!(
            builder
                .build(&Conversation::from_user("hi").with_options(options), false)
                .is_err()
        );
    }

    #[test]
    fn missing_model_and_invalid_values_are_configuration_errors() {
        let builder = ChatRequestBuilder::new(ChatOptions::default(), Arc::new(NoopToolRuntime));
        let error = builder
            .build(&Conversation::from_user("hi"), false)
            .expect_err("model is required");
        assert_eq!(error.kind, ChatErrorKind::Configuration);

        let builder = ChatRequestBuilder::new(
            ChatOptions::default().with_model("hunyuan-pro"),
            Arc::new(NoopToolRuntime),
        );
        let conversation = Conversation::from_user("hi")
            .with_options(ChatOptions::default().with_temperature(3.0));
        let error = builder
            .build(&conversation, false)
            .expect_err("temperature out of range");
        assert_eq!(error.kind, ChatErrorKind::Configuration);
    }

    #[test]
    fn empty_conversation_is_rejected() {
        let builder = ChatRequestBuilder::new(
            ChatOptions::default().with_model("hunyuan-pro"),
            Arc::new(NoopToolRuntime),
        );
        let error = builder
            .build(&Conversation::default(), false)
            .expect_err("no messages");
        assert_eq!(error.kind, ChatErrorKind::InvalidRequest);
    }

    #[test]
    fn messages_map_per_role() {
        let messages = vec![
            Message::system("be brief"),
            Message::user("weather?"),
            Message::assistant_with_tool_calls(
                "",
                vec![ToolCall::new("call-1", "weather", r#"{"city":"Shenzhen"}"#)],
            ),
            Message::tool_result("call-1", "sunny"),
        ];

        let mapped = map_messages(&messages).expect("messages map");

        assert_eq!(mapped[0].role, Some(ApiRole::System));
        assert!(mapped[1].tool_calls.is_empty());
        assert_eq!(mapped[2].tool_calls[0].id, "call-1");
        assert_eq!(mapped[2].tool_calls[0].function.name, "weather");
        assert_eq!(mapped[3].role, Some(ApiRole::Tool));
        assert_eq!(mapped[3].tool_call_id.as_deref(), Some("call-1"));
        assert_eq!(mapped[3].content, "sunny");
    }

    #[test]
    fn tool_response_without_id_fails() {
        let mut orphan = Message::tool_result("", "sunny");
        orphan.tool_call_id = None;

        for message in [orphan, Message::tool_result("  ", "sunny")] {
            let error = map_messages(&[Message::user("hi"), message]).expect_err("id is required");
            assert_eq!(error.kind, ChatErrorKind::InvalidRequest);
            assert_eq!(error.message, "tool response missing id");
        }
    }

    #[test]
    fn tool_response_must_follow_its_call() {
        let messages = vec![
            Message::user("hi"),
            Message::tool_result("call-9", "sunny"),
        ];

        let error = map_messages(&messages).expect_err("no matching call");
        assert_eq!(error.message, "tool response references unknown tool call 'call-9'");
    }
}
