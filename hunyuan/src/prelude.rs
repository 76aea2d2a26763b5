//! Common imports for most Hunyuan chat applications.

pub use crate::{
    HunyuanConfig, ask, ask_with_tools, assistant_message, build_api, build_chat_model,
    system_message, tool_definition, tool_message, user_message,
};
pub use crate::{hy_conversation, hy_messages, hy_msg};
pub use crate::{
    ChatError, ChatErrorKind, ChatModel, ChatModelBuilder, ChatOptions, ChatResult,
    ChatResultStream, Conversation, DefaultToolRuntime, Generation, Message, NoopToolRuntime,
    ProviderError, RetryPolicy, Role, Tool, ToolCall, ToolDefinition, ToolError,
    ToolExecutionContext, ToolRegistry, ToolRuntime, TracingObservabilityHooks,
};
