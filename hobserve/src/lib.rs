//! Observability hooks for provider retries and tool execution.
//!
//! Both hook implementations cover [`hprovider::ProviderOperationHooks`] and
//! [`htooling::ToolRuntimeHooks`]. Wrap them in [`SafeProviderHooks`] or
//! [`SafeToolHooks`] so a panicking hook cannot take down a chat call.
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use hobserve::{MetricsObservabilityHooks, SafeProviderHooks, SafeToolHooks, TracingObservabilityHooks};
//! use hprovider::ProviderOperationHooks;
//! use htooling::ToolRuntimeHooks;
//!
//! let provider_hooks: Arc<dyn ProviderOperationHooks> =
//!     Arc::new(SafeProviderHooks::new(TracingObservabilityHooks));
//! let tool_hooks: Arc<dyn ToolRuntimeHooks> =
//!     Arc::new(SafeToolHooks::new(MetricsObservabilityHooks));
//! # let _ = (provider_hooks, tool_hooks);
//! ```

mod metrics_hooks;
mod safe_hooks;
mod tracing_hooks;

pub use metrics_hooks::MetricsObservabilityHooks;
pub use safe_hooks::{SafeProviderHooks, SafeToolHooks};
pub use tracing_hooks::TracingObservabilityHooks;

pub mod prelude {
    pub use crate::{
        MetricsObservabilityHooks, SafeProviderHooks, SafeToolHooks, TracingObservabilityHooks,
    };
}
