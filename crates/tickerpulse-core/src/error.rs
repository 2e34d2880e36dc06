//! Unified error types for TickerPulse Core.

use serde::Serialize;
use thiserror::Error;
use tickerpulse_types::{ConfigError, NewsError, SentimentError, StoreError};

/// Main error type for core operations.
///
/// Cooldown skips never appear here; they are `GuardOutcome::Skipped` values.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum AppError {
    /// HTTP client could not be built or a request failed outside a client wrapper.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    News(#[from] NewsError),

    #[error("{0}")]
    Sentiment(#[from] SentimentError),

    #[error("{0}")]
    Store(#[from] StoreError),

    /// Configuration loading or validation failed.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A job of this kind is already running.
    #[error("Job already running: {0}")]
    JobRunning(String),
}

impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.to_string().as_str())
    }
}

/// Result type alias for core operations.
pub type AppResult<T> = Result<T, AppError>;
