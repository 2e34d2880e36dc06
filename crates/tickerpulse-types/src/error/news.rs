//! News retrieval errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from the news provider that are NOT rate-limit conditions.
///
/// A detected rate limit enters cooldown and is reported as a skip instead.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "details")]
pub enum NewsError {
    /// Transport failure (connect, timeout, TLS)
    #[error("News request failed: {message}")]
    Network { message: String },

    /// Non-success HTTP status other than 429
    #[error("News provider returned HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// Provider answered with an explicit error message
    #[error("News provider error: {message}")]
    Api { message: String },

    /// Body was not the JSON shape we expect
    #[error("Invalid news response: {message}")]
    InvalidResponse { message: String },
}

impl NewsError {
    /// Whether a later retry of the same request could succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network { .. } => true,
            Self::Http { status, .. } => *status >= 500,
            Self::Api { .. } | Self::InvalidResponse { .. } => false,
        }
    }
}
