//! Sentiment classification errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from the sentiment model that are NOT rate-limit conditions.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "details")]
pub enum SentimentError {
    /// No API key configured for the sentiment model
    #[error("Sentiment model API key is not configured")]
    MissingApiKey,

    /// Transport failure (connect, timeout, TLS)
    #[error("Sentiment request failed: {message}")]
    Network { message: String },

    /// Non-success HTTP status that is not a rate-limit signal
    #[error("Sentiment model returned HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// Model returned text that is not a valid classification
    #[error("Invalid sentiment response: {message}")]
    InvalidResponse { message: String },

    /// Model returned no candidates / no text
    #[error("Sentiment model returned an empty response")]
    EmptyResponse,
}

impl SentimentError {
    /// Whether a later retry of the same request could succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network { .. } => true,
            Self::Http { status, .. } => *status >= 500,
            Self::MissingApiKey | Self::InvalidResponse { .. } | Self::EmptyResponse => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(SentimentError::Network { message: "connection reset".to_string() }.is_transient());
        assert!(SentimentError::Http { status: 503, message: "UNAVAILABLE".to_string() }.is_transient());
        assert!(!SentimentError::Http { status: 403, message: "PERMISSION_DENIED".to_string() }.is_transient());
        assert!(!SentimentError::MissingApiKey.is_transient());
        assert!(!SentimentError::EmptyResponse.is_transient());
    }
}
