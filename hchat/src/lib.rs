//! Chat orchestration over the Hunyuan chat completion API.
//!
//! [`ChatModel`] turns a [`Conversation`] into provider requests, normalizes
//! the replies into [`ChatResult`] values, and runs tool-call rounds through a
//! [`ToolRuntime`] until the model answers or the round limit is reached.
//!
//! ```rust
//! use hchat::{ChatResult, Conversation, StreamAggregator};
//! use hprovider::Message;
//!
//! let conversation = Conversation::from_user("hi");
//! let next = conversation.extend_with([Message::assistant("hello")]);
//! assert_eq!(next.messages.len(), 2);
//!
//! let mut aggregator = StreamAggregator::new();
//! aggregator.absorb(&ChatResult::empty());
//! assert!(aggregator.finish().is_empty());
//! ```

mod aggregate;
mod error;
mod normalize;
mod request;
mod service;
mod tool_calls;
mod types;

pub mod prelude {
    pub use crate::{
        ChatError, ChatErrorKind, ChatErrorSource, ChatModel, ChatModelBuilder, ChatResult,
        ChatResultMetadata, ChatResultStream, Conversation, Generation, StreamAggregator,
    };
    pub use hcommon::{ChatOptions, MetadataMap};
    pub use htooling::{
        DefaultToolRuntime, Tool, ToolError, ToolErrorKind, ToolExecutionContext,
        ToolExecutionResult, ToolRegistry, ToolRuntime,
    };
}

pub use aggregate::{MessageAggregator, StreamAggregator, collect_final};
pub use error::{ChatError, ChatErrorKind, ChatErrorSource};
pub use normalize::{ExchangeState, chunk_to_completion, to_chat_result};
pub use request::{ChatRequestBuilder, map_messages};
pub use service::{ChatModel, ChatModelBuilder, DEFAULT_MAX_TOOL_ROUNDS};
pub use tool_calls::{ToolCallResolver, is_tool_call, requests_tools};
pub use types::{
    ChatResult, ChatResultMetadata, ChatResultStream, Conversation, Generation,
    METADATA_FINISH_REASON, METADATA_ID, METADATA_ROLE,
};
pub use hcommon::{ChatOptions, MetadataMap};
pub use htooling::{
    DefaultToolRuntime, Tool, ToolError, ToolErrorKind, ToolExecutionContext, ToolExecutionResult,
    ToolRegistry, ToolRuntime,
};
