//! Error types for LLM operations

use thiserror::Error;

/// Result type for LLM operations
pub type Result<T> = std::result::Result<T, LLMError>;

/// Errors raised while talking to a model provider
#[derive(Error, Debug)]
pub enum LLMError {
    /// The provider answered with a server-side failure
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// The credential was rejected
    #[error("Invalid API key or authentication failed")]
    AuthenticationFailed,

    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// The provider rejected the request as malformed
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    /// Transport-level failure (connect, timeout, TLS)
    #[cfg(feature = "openai")]
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// The reply did not have the expected shape
    #[error("Unexpected response format: {0}")]
    UnexpectedResponse(String),
}

impl LLMError {
    /// Whether retrying the same request may succeed
    ///
    /// Rate limits, server-side failures and transport errors are transient.
    /// Authentication, validation and parsing failures are not.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::RateLimitExceeded(_) | Self::RequestFailed(_) => true,
            #[cfg(feature = "openai")]
            Self::HttpError(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(LLMError::RateLimitExceeded("slow down".to_string()).is_transient());
        assert!(LLMError::RequestFailed("HTTP 503".to_string()).is_transient());
        assert!(!LLMError::AuthenticationFailed.is_transient());
        assert!(!LLMError::InvalidRequest("bad".to_string()).is_transient());
        assert!(!LLMError::ModelNotFound("gpt-x".to_string()).is_transient());
        assert!(!LLMError::UnexpectedResponse("??".to_string()).is_transient());
    }

    #[test]
    fn test_error_display() {
        let err = LLMError::ModelNotFound("gpt-x".to_string());
        assert_eq!(err.to_string(), "Model not found: gpt-x");
    }
}
