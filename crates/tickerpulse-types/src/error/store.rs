//! Watchlist and news store errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "details")]
pub enum StoreError {
    /// Ticker is not on the watchlist (or was removed)
    #[error("Ticker not found: {ticker}")]
    TickerNotFound { ticker: String },

    /// Ticker symbol failed validation
    #[error("Invalid ticker symbol '{ticker}': {reason}")]
    InvalidTicker { ticker: String, reason: String },

    /// News record id does not exist
    #[error("News item not found: {id}")]
    NewsNotFound { id: u64 },
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::TickerNotFound { .. } | Self::NewsNotFound { .. })
    }
}
