//! Tencent Hunyuan `ChatCompletions` (API version 2023-09-01).

mod signer;
mod sse;
mod tests;
#[cfg(feature = "transport-http")]
mod transport;
mod types;

pub use signer::{
    ALGORITHM, JSON_CONTENT_TYPE, SignedHeaders, SigningContext, SigningTarget, Tc3Signer,
    sha256_hex,
};
#[cfg(feature = "transport-http")]
pub use transport::HunyuanHttpApi;
pub use sse::{SseDecoder, SseFrame};
pub use types::{
    ApiError, ApiFunction, ApiFunctionCall, ApiMessage, ApiRole, ApiTool, ApiToolCall, ApiUsage,
    ChatCompletion, ChatCompletionChunk, ChatCompletionRequest, ChatCompletionResponse, Choice,
    ChunkChoice,
};

pub const SERVICE: &str = "hunyuan";
pub const DEFAULT_HOST: &str = "hunyuan.tencentcloudapi.com";
pub const DEFAULT_BASE_URL: &str = "https://hunyuan.tencentcloudapi.com";
pub const CHAT_ACTION: &str = "ChatCompletions";
pub const API_VERSION: &str = "2023-09-01";
pub const DEFAULT_MODEL: &str = "hunyuan-pro";
