//! Watchlist ticker models.

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use super::sentiment::TickerSentiment;
use crate::error::StoreError;

fn ticker_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    #[allow(clippy::unwrap_used)]
    PATTERN.get_or_init(|| Regex::new(r"^[A-Z]{1,10}$").unwrap())
}

/// Upper-case and validate a ticker symbol (1-10 ASCII letters).
pub fn normalize_ticker(raw: &str) -> Result<String, StoreError> {
    let symbol = raw.trim().to_ascii_uppercase();
    if ticker_pattern().is_match(&symbol) {
        Ok(symbol)
    } else {
        Err(StoreError::InvalidTicker {
            ticker: raw.to_string(),
            reason: "must be 1-10 letters".to_string(),
        })
    }
}

/// A ticker on the watchlist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchlistTicker {
    pub id: u64,
    pub ticker: String,
    pub name: Option<String>,
    pub added_at: DateTime<Utc>,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<TickerSentiment>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_ticker() {
        assert_eq!(normalize_ticker("aapl").unwrap(), "AAPL");
        assert_eq!(normalize_ticker(" msft ").unwrap(), "MSFT");
        assert!(normalize_ticker("").is_err());
        assert!(normalize_ticker("BRK.B").is_err());
        assert!(normalize_ticker("ABCDEFGHIJK").is_err());
    }
}
