//! Typed error definitions for TickerPulse.
//!
//! Cooldown skips are deliberately absent from this hierarchy: a service in
//! cooldown produces a skip outcome, not an error.

mod config;
mod news;
mod sentiment;
mod store;

pub use config::ConfigError;
pub use news::NewsError;
pub use sentiment::SentimentError;
pub use store::StoreError;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type that wraps all domain-specific errors.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "domain", content = "error")]
pub enum TypedError {
    /// Wraps a news retrieval error
    #[error("News error: {0}")]
    News(#[from] NewsError),

    /// Wraps a sentiment classification error
    #[error("Sentiment error: {0}")]
    Sentiment(#[from] SentimentError),

    /// Wraps a watchlist/news store error
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Wraps a configuration error
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Standard Result type using TypedError.
pub type Result<T> = std::result::Result<T, TypedError>;
