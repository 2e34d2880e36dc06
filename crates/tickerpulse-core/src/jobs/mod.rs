//! Batch jobs run by the scheduler or triggered through the API.
//!
//! Every batch checks the relevant service's cooldown once before iterating,
//! so a service already known to be cooling down costs zero upstream calls.

mod analyze;
mod fetch;
mod tracker;


pub use analyze::{analyze_pending, analyze_pending_for_ticker, refresh_ticker_sentiment};
pub use fetch::{fetch_all_news, fetch_news_for_ticker};
pub use tracker::{JobRun, JobTracker};

use std::sync::Arc;

use crate::news::AlphaVantageClient;
use crate::rate_limit::RateLimitManager;
use crate::sentiment::GeminiClient;
use crate::store::NewsStore;

/// Everything a job needs, cheap to clone into spawned tasks.
#[derive(Clone)]
pub struct JobContext {
    pub limits: Arc<RateLimitManager>,
    pub store: Arc<dyn NewsStore>,
    pub news: Arc<AlphaVantageClient>,
    pub sentiment: Arc<GeminiClient>,
}
