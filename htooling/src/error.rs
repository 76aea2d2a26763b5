//! Tool resolution and execution errors.

use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolErrorKind {
    NotFound,
    InvalidArguments,
    Execution,
    Timeout,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolError {
    pub kind: ToolErrorKind,
    pub message: String,
    pub retryable: bool,
    pub tool_name: Option<String>,
    pub tool_call_id: Option<String>,
}

impl ToolError {
    pub fn new(kind: ToolErrorKind, message: impl Into<String>, retryable: bool) -> Self {
        Self {
            kind,
            message: message.into(),
            retryable,
            tool_name: None,
            tool_call_id: None,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::NotFound, message, false)
    }

    pub fn invalid_arguments(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::InvalidArguments, message, false)
    }

    pub fn execution(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Execution, message, false)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Timeout, message, true)
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Other, message, false)
    }

    pub fn with_tool_name(mut self, tool_name: impl Into<String>) -> Self {
        self.tool_name = Some(tool_name.into());
        self
    }

    pub fn with_tool_call_id(mut self, tool_call_id: impl Into<String>) -> Self {
        self.tool_call_id = Some(tool_call_id.into());
        self
    }

    pub fn is_retryable(&self) -> bool {
        self.retryable
    }

    /// Errors caused by the caller's configuration or the model's arguments
    /// rather than the tool itself.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self.kind,
            ToolErrorKind::InvalidArguments | ToolErrorKind::NotFound
        )
    }
}

impl Display for ToolError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.kind)?;
        match (&self.tool_name, &self.tool_call_id) {
            (Some(tool_name), Some(tool_call_id)) => {
                write!(f, " [tool={tool_name}, call_id={tool_call_id}]")?
            }
            (Some(tool_name), None) => write!(f, " [tool={tool_name}]")?,
            (None, Some(tool_call_id)) => write!(f, " [call_id={tool_call_id}]")?,
            (None, None) => {}
        }
        write!(f, ": {}", self.message)
    }
}

impl Error for ToolError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeouts_are_retryable_and_not_user_errors() {
        let timeout = ToolError::timeout("slow");
        assert!(timeout.is_retryable());
        assert!(!timeout.is_user_error());

        let missing = ToolError::not_found("no such tool");
        assert!(!missing.is_retryable());
        assert!(missing.is_user_error());
    }

    #[test]
    fn display_includes_whichever_context_is_known() {
        let both = ToolError::execution("boom")
            .with_tool_name("get_weather")
            .with_tool_call_id("call-7");
        assert_eq!(both.to_string(), "Execution [tool=get_weather, call_id=call-7]: boom");

        let call_only = ToolError::timeout("late").with_tool_call_id("call-8");
        assert_eq!(call_only.to_string(), "Timeout [call_id=call-8]: late");

        assert_eq!(ToolError::other("odd").to_string(), "Other: odd");
    }
}
