//! Signed access to the Hunyuan chat completion endpoint.
//!
//! The crate owns the message model shared by the rest of the workspace, the
//! TC3-HMAC-SHA256 request signer, the Hunyuan wire types, and the
//! [`ChatCompletionApi`] seam the orchestrator talks to.
//!
//! ```rust
//! use hprovider::{FinishReason, Message, Role};
//!
//! let message = Message::user("What is the weather in Shenzhen?");
//! assert_eq!(message.role, Role::User);
//! assert_eq!(FinishReason::parse("tool_calls"), Some(FinishReason::ToolCalls));
//! ```

mod credentials;
mod error;
mod model;
mod provider;
mod resilience;
mod stream;

pub mod hunyuan;
pub mod prelude;

pub use credentials::{Credentials, SecretString};
pub use error::{ProviderError, ProviderErrorKind};
pub use model::{FinishReason, Message, Role, TokenUsage, ToolCall, ToolDefinition};
pub use provider::{ChatCompletionApi, ChunkStream, ProviderFuture};
pub use resilience::{NoopOperationHooks, ProviderOperationHooks, RetryPolicy, execute_with_retry};
pub use stream::{BoxedStream, VecStream};
