//! Tool runtime trait and the default registry-backed executor.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures_timer::Delay;
use futures_util::future::{Either, select};
use hprovider::{ToolCall, ToolDefinition};

use crate::{
    NoopToolRuntimeHooks, ToolError, ToolExecutionContext, ToolExecutionResult, ToolFuture,
    ToolRegistry, ToolRuntimeHooks,
};

/// Resolves enabled tool names for requests and executes requested calls.
pub trait ToolRuntime: Send + Sync {
    fn resolve(&self, names: &BTreeSet<String>) -> Result<Vec<ToolDefinition>, ToolError>;

    fn execute<'a>(
        &'a self,
        tool_call: ToolCall,
        context: ToolExecutionContext,
    ) -> ToolFuture<'a, Result<ToolExecutionResult, ToolError>>;
}

#[derive(Clone)]
pub struct DefaultToolRuntime {
    registry: Arc<ToolRegistry>,
    hooks: Arc<dyn ToolRuntimeHooks>,
    timeout: Option<Duration>,
}

impl Default for DefaultToolRuntime {
    fn default() -> Self {
        Self::new(Arc::new(ToolRegistry::new()))
    }
}

impl DefaultToolRuntime {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self {
            registry,
            hooks: Arc::new(NoopToolRuntimeHooks),
            timeout: None,
        }
    }

    pub fn with_hooks(mut self, hooks: Arc<dyn ToolRuntimeHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    /// Fails a call with [`crate::ToolErrorKind::Timeout`] once `timeout` elapses.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn registry(&self) -> Arc<ToolRegistry> {
        Arc::clone(&self.registry)
    }

    async fn invoke(
        &self,
        tool_call: &ToolCall,
        context: &ToolExecutionContext,
    ) -> Result<ToolExecutionResult, ToolError> {
        let tool = self.registry.get(&tool_call.name).ok_or_else(|| {
            ToolError::not_found(format!("tool '{}' is not registered", tool_call.name))
        })?;

        let invocation = tool.invoke(&tool_call.arguments, context);
        let output = match self.timeout {
            Some(timeout) => match select(invocation, Delay::new(timeout)).await {
                Either::Left((output, _)) => output?,
                Either::Right(_) => {
                    return Err(ToolError::timeout(format!(
                        "tool '{}' did not finish within {}ms",
                        tool_call.name,
                        timeout.as_millis()
                    )));
                }
            },
            None => invocation.await?,
        };

        Ok(ToolExecutionResult::from_call(tool_call, output))
    }
}

impl ToolRuntime for DefaultToolRuntime {
    fn resolve(&self, names: &BTreeSet<String>) -> Result<Vec<ToolDefinition>, ToolError> {
        self.registry.resolve(names)
    }

    fn execute<'a>(
        &'a self,
        tool_call: ToolCall,
        context: ToolExecutionContext,
    ) -> ToolFuture<'a, Result<ToolExecutionResult, ToolError>> {
        Box::pin(async move {
            self.hooks.on_execution_start(&tool_call, &context);
            let started = Instant::now();

            match self.invoke(&tool_call, &context).await {
                Ok(result) => {
                    self.hooks
                        .on_execution_success(&tool_call, &context, &result, started.elapsed());
                    Ok(result)
                }
                Err(error) => {
                    let error = error
                        .with_tool_name(tool_call.name.clone())
                        .with_tool_call_id(tool_call.id.clone());
                    tracing::warn!(
                        tool = %tool_call.name,
                        call_id = %tool_call.id,
                        error = %error,
                        "tool execution failed"
                    );
                    self.hooks
                        .on_execution_failure(&tool_call, &context, &error, started.elapsed());
                    Err(error)
                }
            }
        })
    }
}

/// Runtime for clients without tools: only the empty tool set resolves.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopToolRuntime;

impl ToolRuntime for NoopToolRuntime {
    fn resolve(&self, names: &BTreeSet<String>) -> Result<Vec<ToolDefinition>, ToolError> {
        if names.is_empty() {
            return Ok(Vec::new());
        }

        let names = names.iter().map(String::as_str).collect::<Vec<_>>();
        Err(ToolError::not_found(format!(
            "no tool runtime configured for: {}",
            names.join(", ")
        )))
    }

    fn execute<'a>(
        &'a self,
        tool_call: ToolCall,
        _context: ToolExecutionContext,
    ) -> ToolFuture<'a, Result<ToolExecutionResult, ToolError>> {
        Box::pin(async move {
            Err(ToolError::not_found("no tool runtime configured")
                .with_tool_name(tool_call.name)
                .with_tool_call_id(tool_call.id))
        })
    }
}
