//! # TickerPulse Types
//!
//! Domain models and error definitions shared by every TickerPulse crate.
//!
//! - **`error`** - Typed error hierarchy for news retrieval, sentiment, storage and configuration
//! - **`models`** - Domain models (news, sentiment, tickers, tracked services, jobs)
//!
//! ## Architecture Role
//!
//! ```text
//!            tickerpulse-types (this crate)
//!                     │
//!                     ▼
//!             tickerpulse-core
//!                     │
//!                     ▼
//!            tickerpulse-server
//! ```
//!
//! Nothing in here performs I/O. All types are serializable for the HTTP API.

pub mod error;
pub mod models;

pub use error::{ConfigError, NewsError, Result, SentimentError, StoreError, TypedError};

pub use models::{
    normalize_ticker, CooldownStatus, JobInfo, JobKind, JobReport, JobStatus, NewsItem,
    NewsRecord, NewsStatus, SentimentAnalysis, SentimentCategory, ServiceStatusMap, SkipReason,
    TickerSentiment, TrackedService, TradingSignal, UnknownService, WatchlistTicker,
};
