//! Generation Client Port - Interface for the review-writing LLM service.
//!
//! The dialogue hands over one fully assembled prompt and expects plain
//! review text back. Request shaping (system message, temperature, token
//! limit) belongs to the adapter.
//!
//! # Example
//!
//! ```ignore
//! use async_trait::async_trait;
//!
//! struct Canned;
//!
//! #[async_trait]
//! impl GenerationClient for Canned {
//!     async fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
//!         Ok("Friendly staff, short wait.".to_string())
//!     }
//! }
//! ```

use async_trait::async_trait;

/// Port for review text generation.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Generates review text for the assembled prompt.
    ///
    /// # Errors
    ///
    /// Any transport, authentication or quota failure. Callers treat every
    /// variant the same way.
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}

/// Generation failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    /// Rate limited or out of quota.
    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds until retry is allowed.
        retry_after_secs: u32,
    },

    /// Provider is unavailable.
    #[error("provider unavailable: {message}")]
    Unavailable {
        /// Error details.
        message: String,
    },

    /// API key rejected.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Network error during request.
    #[error("network error: {0}")]
    Network(String),

    /// Failed to parse provider response.
    #[error("parse error: {0}")]
    Parse(String),

    /// The provider answered but produced no text.
    #[error("provider returned an empty review")]
    EmptyResponse,

    /// Request timed out.
    #[error("request timed out after {timeout_secs}s")]
    Timeout {
        /// Configured timeout.
        timeout_secs: u64,
    },
}

impl GenerationError {
    pub fn rate_limited(retry_after_secs: u32) -> Self {
        Self::RateLimited { retry_after_secs }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Returns true if the adapter may retry the request.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            GenerationError::RateLimited { .. }
                | GenerationError::Unavailable { .. }
                | GenerationError::Network(_)
                | GenerationError::Timeout { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_errors_are_retryable() {
        assert!(GenerationError::rate_limited(5).is_retryable());
        assert!(GenerationError::unavailable("503").is_retryable());
        assert!(GenerationError::network("reset").is_retryable());
        assert!(GenerationError::Timeout { timeout_secs: 30 }.is_retryable());
    }

    #[test]
    fn permanent_errors_are_not_retryable() {
        assert!(!GenerationError::AuthenticationFailed.is_retryable());
        assert!(!GenerationError::parse("bad json").is_retryable());
        assert!(!GenerationError::EmptyResponse.is_retryable());
    }

    #[test]
    fn error_messages_are_readable() {
        assert_eq!(
            GenerationError::rate_limited(30).to_string(),
            "rate limited: retry after 30s"
        );
    }
}
