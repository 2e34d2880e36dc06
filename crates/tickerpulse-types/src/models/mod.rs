//! Domain models.

mod job;
mod news;
mod sentiment;
mod service;
mod ticker;

pub use job::{JobInfo, JobKind, JobReport, JobStatus};
pub use news::{NewsItem, NewsRecord, NewsStatus, MAX_TITLE_LEN};
pub use sentiment::{SentimentAnalysis, SentimentCategory, TickerSentiment, TradingSignal};
pub use service::{CooldownStatus, ServiceStatusMap, SkipReason, TrackedService, UnknownService};
pub use ticker::{normalize_ticker, WatchlistTicker};
