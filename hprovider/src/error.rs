//! Shared provider error kinds and error value helpers.
//!
//! ```rust
//! use hprovider::ProviderError;
//!
//! let auth = ProviderError::authentication("signature mismatch");
//! assert!(!auth.retryable);
//!
//! let limited = ProviderError::rate_limited("too many requests");
//! assert!(limited.retryable);
//! ```

use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorKind {
    Configuration,
    Authentication,
    RateLimited,
    InvalidRequest,
    Timeout,
    Transport,
    Unavailable,
    MalformedResponse,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderError {
    pub kind: ProviderErrorKind,
    pub message: String,
    pub retryable: bool,
    /// Service-side error code, e.g. `AuthFailure.SignatureFailure`.
    pub code: Option<String>,
}

impl ProviderError {
    pub fn new(kind: ProviderErrorKind, message: impl Into<String>, retryable: bool) -> Self {
        Self {
            kind,
            message: message.into(),
            retryable,
            code: None,
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Configuration, message, false)
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Authentication, message, false)
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::RateLimited, message, true)
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::InvalidRequest, message, false)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Timeout, message, true)
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Transport, message, true)
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Unavailable, message, true)
    }

    pub fn malformed_response(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::MalformedResponse, message, false)
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Other, message, false)
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn is_retryable(&self) -> bool {
        self.retryable
    }

    /// Maps a Tencent Cloud `Response.Error.Code` onto a provider error.
    pub fn from_service_code(code: &str, message: impl Into<String>) -> Self {
        let category = code.split('.').next().unwrap_or(code);
        let error = match category {
            "AuthFailure" | "UnauthorizedOperation" => Self::authentication(message),
            "RequestLimitExceeded" | "LimitExceeded" => Self::rate_limited(message),
            "InvalidParameter" | "InvalidParameterValue" | "MissingParameter"
            | "UnsupportedOperation" | "UnknownParameter" | "InvalidAction" => {
                Self::invalid_request(message)
            }
            "InternalError" | "ResourceUnavailable" | "ServiceUnavailable" => {
                Self::unavailable(message)
            }
            _ => Self::other(message),
        };

        error.with_code(code)
    }
}

impl Display for ProviderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.code {
            Some(code) => write!(f, "{:?} ({code}): {}", self.kind, self.message),
            None => write!(f, "{:?}: {}", self.kind, self.message),
        }
    }
}

impl Error for ProviderError {}
