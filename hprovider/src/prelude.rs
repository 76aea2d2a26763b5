//! Common `hprovider` imports for downstream crates.

pub use crate::hunyuan::{
    ChatCompletionChunk, ChatCompletionRequest, ChatCompletionResponse, SigningTarget, Tc3Signer,
};
pub use crate::{
    BoxedStream, ChatCompletionApi, ChunkStream, Credentials, FinishReason, Message,
    NoopOperationHooks, ProviderError, ProviderErrorKind, ProviderOperationHooks, RetryPolicy,
    Role, TokenUsage, ToolCall, ToolDefinition, VecStream, execute_with_retry,
};
pub use hcommon::{BoxFuture, ChatOptions, MetadataMap};
