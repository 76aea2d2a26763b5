//! Capability layer for registering, resolving, and executing tools.
//!
//! ```rust
//! use std::collections::BTreeSet;
//!
//! use hprovider::ToolDefinition;
//! use htooling::ToolRegistry;
//!
//! let mut registry = ToolRegistry::new();
//! registry.register_sync_fn(
//!     ToolDefinition {
//!         name: "clock".to_string(),
//!         description: "Current time".to_string(),
//!         input_schema: r#"{"type":"object"}"#.to_string(),
//!     },
//!     |_args, _ctx| Ok("12:00".to_string()),
//! );
//!
//! let names = BTreeSet::from(["clock".to_string()]);
//! assert_eq!(registry.resolve(&names).expect("known tool").len(), 1);
//! ```

mod args;
mod error;
mod hooks;
mod registry;
mod runtime;
mod tool;
mod types;

pub mod prelude {
    pub use crate::{
        DefaultToolRuntime, FunctionTool, NoopToolRuntime, NoopToolRuntimeHooks, Tool, ToolError,
        ToolErrorKind, ToolExecutionContext, ToolExecutionResult, ToolFuture, ToolRegistry,
        ToolRuntime, ToolRuntimeHooks,
    };
}

pub use args::{parse_json_object, parse_json_value, required_string};
pub use error::{ToolError, ToolErrorKind};
pub use hooks::{NoopToolRuntimeHooks, ToolRuntimeHooks};
pub use registry::ToolRegistry;
pub use runtime::{DefaultToolRuntime, NoopToolRuntime, ToolRuntime};
pub use tool::{FunctionTool, Tool, ToolFuture};
pub use types::{ToolExecutionContext, ToolExecutionResult};
