//! Wrappers that contain panics raised by observability hooks.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::Duration;

use hprovider::{ProviderError, ProviderOperationHooks, ToolCall};
use htooling::{ToolError, ToolExecutionContext, ToolExecutionResult, ToolRuntimeHooks};

fn guarded(hook: &'static str, callback: impl FnOnce()) {
    if catch_unwind(AssertUnwindSafe(callback)).is_err() {
        tracing::warn!(hook, "observability hook panicked");
    }
}

#[derive(Debug, Clone, Default)]
pub struct SafeProviderHooks<H> {
    inner: H,
}

impl<H> SafeProviderHooks<H> {
    pub fn new(inner: H) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &H {
        &self.inner
    }
}

impl<H> ProviderOperationHooks for SafeProviderHooks<H>
where
    H: ProviderOperationHooks,
{
    fn on_attempt_start(&self, operation: &str, attempt: u32) {
        guarded("on_attempt_start", || {
            self.inner.on_attempt_start(operation, attempt)
        });
    }

    fn on_retry_scheduled(
        &self,
        operation: &str,
        attempt: u32,
        delay: Duration,
        error: &ProviderError,
    ) {
        guarded("on_retry_scheduled", || {
            self.inner
                .on_retry_scheduled(operation, attempt, delay, error)
        });
    }

    fn on_success(&self, operation: &str, attempts: u32) {
        guarded("on_success", || self.inner.on_success(operation, attempts));
    }

    fn on_failure(&self, operation: &str, attempts: u32, error: &ProviderError) {
        guarded("on_failure", || {
            self.inner.on_failure(operation, attempts, error)
        });
    }
}

#[derive(Debug, Clone, Default)]
pub struct SafeToolHooks<H> {
    inner: H,
}

impl<H> SafeToolHooks<H> {
    pub fn new(inner: H) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &H {
        &self.inner
    }
}

impl<H> ToolRuntimeHooks for SafeToolHooks<H>
where
    H: ToolRuntimeHooks,
{
    fn on_execution_start(&self, tool_call: &ToolCall, context: &ToolExecutionContext) {
        guarded("on_execution_start", || {
            self.inner.on_execution_start(tool_call, context)
        });
    }

    fn on_execution_success(
        &self,
        tool_call: &ToolCall,
        context: &ToolExecutionContext,
        result: &ToolExecutionResult,
        elapsed: Duration,
    ) {
        guarded("on_execution_success", || {
            self.inner
                .on_execution_success(tool_call, context, result, elapsed)
        });
    }

    fn on_execution_failure(
        &self,
        tool_call: &ToolCall,
        context: &ToolExecutionContext,
        error: &ToolError,
        elapsed: Duration,
    ) {
        guarded("on_execution_failure", || {
            self.inner
                .on_execution_failure(tool_call, context, error, elapsed)
        });
    }
}
