//! `metrics` counters and histograms for retry attempts and tool executions.
//!
//! Every metric is prefixed with `hunyuan_`. Provider metrics are labelled by
//! operation (`chat_completion`, `chat_completion_stream`) and tool metrics by
//! tool name.
//!
//! ```rust
//! use hobserve::MetricsObservabilityHooks;
//! use hprovider::ProviderOperationHooks;
//!
//! // Without an installed recorder the calls are no-ops.
//! MetricsObservabilityHooks.on_success("chat_completion", 1);
//! ```

use std::time::Duration;

use hprovider::{ProviderError, ProviderOperationHooks, ToolCall};
use htooling::{ToolError, ToolExecutionContext, ToolExecutionResult, ToolRuntimeHooks};

#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsObservabilityHooks;

fn error_code(error: &ProviderError) -> String {
    error.code.clone().unwrap_or_else(|| "none".to_string())
}

impl ProviderOperationHooks for MetricsObservabilityHooks {
    fn on_attempt_start(&self, operation: &str, _attempt: u32) {
        metrics::counter!(
            "hunyuan_provider_attempts_total",
            "operation" => operation.to_string()
        )
        .increment(1);
    }

    fn on_retry_scheduled(
        &self,
        operation: &str,
        _attempt: u32,
        delay: Duration,
        error: &ProviderError,
    ) {
        metrics::counter!(
            "hunyuan_provider_retries_total",
            "operation" => operation.to_string(),
            "error_kind" => format!("{:?}", error.kind)
        )
        .increment(1);
        metrics::histogram!(
            "hunyuan_provider_retry_delay_seconds",
            "operation" => operation.to_string()
        )
        .record(delay.as_secs_f64());
    }

    fn on_success(&self, operation: &str, attempts: u32) {
        metrics::counter!(
            "hunyuan_provider_success_total",
            "operation" => operation.to_string()
        )
        .increment(1);
        metrics::histogram!(
            "hunyuan_provider_attempts_per_call",
            "operation" => operation.to_string(),
            "status" => "success"
        )
        .record(f64::from(attempts));
    }

    fn on_failure(&self, operation: &str, attempts: u32, error: &ProviderError) {
        metrics::counter!(
            "hunyuan_provider_failure_total",
            "operation" => operation.to_string(),
            "error_kind" => format!("{:?}", error.kind),
            "error_code" => error_code(error)
        )
        .increment(1);
        metrics::histogram!(
            "hunyuan_provider_attempts_per_call",
            "operation" => operation.to_string(),
            "status" => "failure"
        )
        .record(f64::from(attempts));
    }
}

impl ToolRuntimeHooks for MetricsObservabilityHooks {
    fn on_execution_start(&self, tool_call: &ToolCall, _context: &ToolExecutionContext) {
        metrics::counter!(
            "hunyuan_tool_executions_total",
            "tool_name" => tool_call.name.clone()
        )
        .increment(1);
    }

    fn on_execution_success(
        &self,
        tool_call: &ToolCall,
        _context: &ToolExecutionContext,
        _result: &ToolExecutionResult,
        elapsed: Duration,
    ) {
        metrics::histogram!(
            "hunyuan_tool_execution_duration_seconds",
            "tool_name" => tool_call.name.clone(),
            "status" => "success"
        )
        .record(elapsed.as_secs_f64());
    }

    fn on_execution_failure(
        &self,
        tool_call: &ToolCall,
        _context: &ToolExecutionContext,
        error: &ToolError,
        elapsed: Duration,
    ) {
        metrics::counter!(
            "hunyuan_tool_failures_total",
            "tool_name" => tool_call.name.clone(),
            "error_kind" => format!("{:?}", error.kind)
        )
        .increment(1);
        metrics::histogram!(
            "hunyuan_tool_execution_duration_seconds",
            "tool_name" => tool_call.name.clone(),
            "status" => "failure"
        )
        .record(elapsed.as_secs_f64());
    }
}
