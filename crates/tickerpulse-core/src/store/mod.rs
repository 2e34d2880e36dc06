//! Watchlist and news storage abstraction.

mod memory;


pub use memory::InMemoryNewsStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tickerpulse_types::{
    NewsItem, NewsRecord, NewsStatus, SentimentAnalysis, SentimentCategory, StoreError, TickerSentiment,
    WatchlistTicker,
};

pub type StoreResult<T> = Result<T, StoreError>;

/// Page selection for news listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewsQuery {
    pub status: Option<NewsStatus>,
    pub limit: usize,
    pub offset: usize,
}

impl Default for NewsQuery {
    fn default() -> Self {
        Self { status: None, limit: 50, offset: 0 }
    }
}

#[async_trait]
pub trait NewsStore: Send + Sync {
    /// Watchlist entries, optionally including deactivated ones.
    async fn list_tickers(&self, active_only: bool) -> StoreResult<Vec<WatchlistTicker>>;

    /// One active ticker with its latest aggregate attached.
    async fn get_ticker(&self, ticker: &str) -> StoreResult<WatchlistTicker>;

    /// Add a ticker, reactivating it if it was removed.
    /// Returns the entry and whether it was newly created.
    async fn add_ticker(&self, ticker: &str, name: Option<String>) -> StoreResult<(WatchlistTicker, bool)>;

    /// Deactivate a ticker. Its news and aggregate are kept.
    async fn remove_ticker(&self, ticker: &str) -> StoreResult<()>;

    /// Store fetched items for a ticker, skipping duplicates. Returns how many were saved.
    async fn save_news(&self, ticker: &str, items: Vec<NewsItem>) -> StoreResult<usize>;

    /// News for one ticker, newest first.
    async fn news_for_ticker(&self, ticker: &str, query: NewsQuery) -> StoreResult<Vec<NewsRecord>>;

    async fn count_news(&self, ticker: &str, status: Option<NewsStatus>) -> StoreResult<u32>;

    /// Pending items of active tickers, oldest first.
    async fn pending_news(&self, limit: usize) -> StoreResult<Vec<NewsRecord>>;

    async fn pending_news_for_ticker(&self, ticker: &str, limit: usize) -> StoreResult<Vec<NewsRecord>>;

    /// Mark one item analyzed.
    async fn record_analysis(&self, id: u64, analysis: &SentimentAnalysis, at: DateTime<Utc>) -> StoreResult<()>;

    /// Categories of every analyzed item of a ticker.
    async fn analyzed_sentiments(&self, ticker: &str) -> StoreResult<Vec<SentimentCategory>>;

    async fn ticker_sentiment(&self, ticker: &str) -> StoreResult<Option<TickerSentiment>>;

    async fn put_ticker_sentiment(&self, sentiment: TickerSentiment) -> StoreResult<()>;
}
