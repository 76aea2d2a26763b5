use std::future::Future;
use std::pin::Pin;

use crate::hunyuan::{ChatCompletionChunk, ChatCompletionRequest, ChatCompletionResponse};
use crate::{BoxedStream, ProviderError};

pub type ProviderFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Decoded stream fragments. A payload that fails to decode surfaces as a
/// [`crate::ProviderErrorKind::MalformedResponse`] item and the stream goes on;
/// any other error item is terminal.
pub type ChunkStream<'a> = BoxedStream<'a, Result<ChatCompletionChunk, ProviderError>>;

/// Low-level access to the chat completion action.
///
/// Implementations sign every call they send, so a retried call carries a
/// fresh timestamp and signature.
pub trait ChatCompletionApi: Send + Sync {
    fn chat_completion<'a>(
        &'a self,
        request: &'a ChatCompletionRequest,
    ) -> ProviderFuture<'a, Result<ChatCompletionResponse, ProviderError>>;

    fn chat_completion_stream<'a>(
        &'a self,
        request: &'a ChatCompletionRequest,
    ) -> ProviderFuture<'a, Result<ChunkStream<'a>, ProviderError>>;
}
