//! Chat-layer errors and classification.

use std::error::Error;
use std::fmt::{Display, Formatter};

use hprovider::{ProviderError, ProviderErrorKind};
use htooling::ToolError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatErrorKind {
    Configuration,
    InvalidRequest,
    Provider,
    Tooling,
    ToolRoundLimit,
}

/// The lower-layer error a [`ChatError`] was raised from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatErrorSource {
    Provider(ProviderError),
    Tool(ToolError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatError {
    pub kind: ChatErrorKind,
    pub message: String,
    pub source: Option<ChatErrorSource>,
}

impl ChatError {
    pub fn new(kind: ChatErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::Configuration, message)
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::InvalidRequest, message)
    }

    pub fn tooling(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::Tooling, message)
    }

    pub fn tool_round_limit(max_rounds: u32) -> Self {
        Self::new(
            ChatErrorKind::ToolRoundLimit,
            format!("model kept requesting tools after {max_rounds} tool rounds"),
        )
    }

    /// A tool name enabled in the options that the runtime cannot resolve.
    pub fn unknown_tool(error: ToolError) -> Self {
        Self {
            kind: ChatErrorKind::InvalidRequest,
            message: error.message.clone(),
            source: Some(ChatErrorSource::Tool(error)),
        }
    }

    pub fn provider_error(&self) -> Option<&ProviderError> {
        match &self.source {
            Some(ChatErrorSource::Provider(error)) => Some(error),
            _ => None,
        }
    }

    pub fn tool_error(&self) -> Option<&ToolError> {
        match &self.source {
            Some(ChatErrorSource::Tool(error)) => Some(error),
            _ => None,
        }
    }

    pub fn is_retryable(&self) -> bool {
        match &self.source {
            Some(ChatErrorSource::Provider(error)) => error.is_retryable(),
            Some(ChatErrorSource::Tool(error)) => error.is_retryable(),
            None => false,
        }
    }

    /// Errors the caller can fix by changing its request or configuration.
    pub fn is_user_error(&self) -> bool {
        match self.kind {
            ChatErrorKind::Configuration | ChatErrorKind::InvalidRequest => true,
            ChatErrorKind::Tooling => self.tool_error().is_some_and(ToolError::is_user_error),
            ChatErrorKind::Provider | ChatErrorKind::ToolRoundLimit => false,
        }
    }
}

impl Display for ChatError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl Error for ChatError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.source {
            Some(ChatErrorSource::Provider(error)) => Some(error),
            Some(ChatErrorSource::Tool(error)) => Some(error),
            None => None,
        }
    }
}

impl From<ProviderError> for ChatError {
    fn from(value: ProviderError) -> Self {
        let kind = match value.kind {
            ProviderErrorKind::Configuration => ChatErrorKind::Configuration,
            _ => ChatErrorKind::Provider,
        };

        Self {
            kind,
            message: value.to_string(),
            source: Some(ChatErrorSource::Provider(value)),
        }
    }
}

impl From<ToolError> for ChatError {
    fn from(value: ToolError) -> Self {
        Self {
            kind: ChatErrorKind::Tooling,
            message: value.to_string(),
            source: Some(ChatErrorSource::Tool(value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_errors_are_kept_as_source() {
        let error = ChatError::from(ProviderError::timeout("request timed out"));

        assert_eq!(error.kind, ChatErrorKind::Provider);
        assert!(error.is_retryable());
        assert_eq!(
            error.provider_error().map(|source| source.kind),
            Some(ProviderErrorKind::Timeout)
        );
        assert!(Error::source(&error).is_some());
    }

    #[test]
    fn provider_configuration_errors_stay_configuration_errors() {
        let error = ChatError::from(ProviderError::configuration("secret key is empty"));
        assert_eq!(error.kind, ChatErrorKind::Configuration);
        assert!(error.is_user_error());
    }

    #[test]
    fn tool_errors_classify_by_tool_kind() {
        let bad_args = ChatError::from(ToolError::invalid_arguments("city is required"));
        assert_eq!(bad_args.kind, ChatErrorKind::Tooling);
        assert!(bad_args.is_user_error());

        let crashed = ChatError::from(ToolError::execution("backend down"));
        assert!(!crashed.is_user_error());
    }

    #[test]
    fn unknown_tools_are_invalid_requests() {
        let error = ChatError::unknown_tool(ToolError::not_found("no tool registered for: stocks"));
        assert_eq!(error.kind, ChatErrorKind::InvalidRequest);
        assert_eq!(error.message, "no tool registered for: stocks");
        assert!(error.tool_error().is_some());
    }

    #[test]
    fn round_limit_display() {
        let error = ChatError::tool_round_limit(3);
        assert_eq!(
            error.to_string(),
            "ToolRoundLimit: model kept requesting tools after 3 tool rounds"
        );
    }
}
