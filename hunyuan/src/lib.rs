//! Unified facade over the Hunyuan chat workspace crates.
//!
//! This crate is designed to be the single dependency for most applications.
//! It re-exports the core crates and provides configuration, client
//! construction, and macros for common request-building flows.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use hunyuan::prelude::*;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = HunyuanConfig::from_env()?;
//! let model = build_chat_model(&config, Arc::new(NoopToolRuntime))?;
//!
//! let result = model.call(hy_conversation!(user => "Hello")).await?;
//! println!("{}", result.text());
//! # Ok(())
//! # }
//! ```

mod config;
mod macros;

pub mod prelude;
pub mod util;

pub use hchat;
pub use hcommon;
pub use hobserve;
pub use hprovider;
pub use htooling;

pub use hchat::{
    ChatError, ChatErrorKind, ChatErrorSource, ChatModel, ChatModelBuilder, ChatRequestBuilder,
    ChatResult, ChatResultMetadata, ChatResultStream, Conversation, DEFAULT_MAX_TOOL_ROUNDS,
    Generation, METADATA_FINISH_REASON, METADATA_ID, METADATA_ROLE, MessageAggregator,
    StreamAggregator, ToolCallResolver, collect_final, is_tool_call,
};
pub use hcommon::{BoxFuture, ChatOptions, MetadataMap};
pub use hobserve::{
    MetricsObservabilityHooks, SafeProviderHooks, SafeToolHooks, TracingObservabilityHooks,
};
pub use hprovider::hunyuan::{HunyuanHttpApi, SigningTarget, Tc3Signer};
pub use hprovider::{
    ChatCompletionApi, Credentials, FinishReason, Message, NoopOperationHooks, ProviderError,
    ProviderErrorKind, ProviderOperationHooks, RetryPolicy, Role, SecretString, TokenUsage,
    ToolCall, ToolDefinition,
};
pub use htooling::{
    DefaultToolRuntime, FunctionTool, NoopToolRuntime, NoopToolRuntimeHooks, Tool, ToolError,
    ToolErrorKind, ToolExecutionContext, ToolExecutionResult, ToolFuture, ToolRegistry,
    ToolRuntime, ToolRuntimeHooks, parse_json_object, parse_json_value, required_string,
};

pub use config::{
    ENV_BASE_URL, ENV_MODEL, ENV_REGION, ENV_SECRET_ID, ENV_SECRET_KEY, HunyuanConfig, build_api,
    build_chat_model,
};
pub use util::{
    ask, ask_with_tools, assistant_message, system_message, tool_definition, tool_message,
    user_message,
};

#[cfg(test)]
mod tests {
    use crate::Role;

    #[test]
    fn hy_msg_macro_creates_expected_message() {
        let message = crate::hy_msg!(user => "hello");
        assert_eq!(message.role, Role::User);
        assert_eq!(message.content, "hello");
        assert_eq!(message.tool_call_id, None);
    }

    #[test]
    fn hy_messages_macro_accepts_tool_replies() {
        let messages = crate::hy_messages![
            system => "You are concise.",
            user => "Weather in Shenzhen?",
            tool["call-1"] => "28C",
        ];

        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[2].role, Role::Tool);
        assert_eq!(messages[2].tool_call_id.as_deref(), Some("call-1"));
    }

    #[test]
    fn hy_conversation_macro_pins_model() {
        let conversation = crate::hy_conversation!(
            model = "hunyuan-lite";
            system => "Be brief.",
            user => "Hi",
        );

        assert_eq!(conversation.messages.len(), 2);
        assert_eq!(conversation.options.model.as_deref(), Some("hunyuan-lite"));
    }
}
