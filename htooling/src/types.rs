//! Tool runtime context and execution result types.

use hcommon::MetadataMap;
use hprovider::{Message, ToolCall};

/// Where in an exchange a tool is being executed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ToolExecutionContext {
    /// Id of the response that requested the call.
    pub response_id: String,
    /// Zero-based tool round within the exchange.
    pub round: u32,
    pub metadata: MetadataMap,
}

impl ToolExecutionContext {
    pub fn new(response_id: impl Into<String>, round: u32) -> Self {
        Self {
            response_id: response_id.into(),
            round,
            metadata: MetadataMap::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolExecutionResult {
    pub tool_call_id: String,
    pub output: String,
}

impl ToolExecutionResult {
    pub fn new(tool_call_id: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            tool_call_id: tool_call_id.into(),
            output: output.into(),
        }
    }

    pub fn from_call(call: &ToolCall, output: impl Into<String>) -> Self {
        Self::new(call.id.clone(), output)
    }

    /// The `tool` turn that reports this result back to the model.
    pub fn into_message(self) -> Message {
        Message::tool_result(self.tool_call_id, self.output)
    }
}
