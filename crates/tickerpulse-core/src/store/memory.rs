use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap, HashSet};
use tickerpulse_types::{
    NewsItem, NewsRecord, NewsStatus, SentimentAnalysis, SentimentCategory, StoreError, TickerSentiment,
    WatchlistTicker,
};

use super::{NewsQuery, NewsStore, StoreResult};

#[derive(Default)]
struct Inner {
    tickers: BTreeMap<String, WatchlistTicker>,
    news: Vec<NewsRecord>,
    /// (ticker, dedup key) of every stored item
    seen: HashSet<(String, String)>,
    sentiments: HashMap<String, TickerSentiment>,
    next_ticker_id: u64,
    next_news_id: u64,
}

impl Inner {
    fn active(&self, ticker: &str) -> StoreResult<&WatchlistTicker> {
        self.tickers
            .get(ticker)
            .filter(|t| t.is_active)
            .ok_or_else(|| StoreError::TickerNotFound { ticker: ticker.to_string() })
    }

    fn with_sentiment(&self, entry: &WatchlistTicker) -> WatchlistTicker {
        let mut entry = entry.clone();
        entry.sentiment = self.sentiments.get(&entry.ticker).cloned();
        entry
    }

    fn is_active(&self, ticker: &str) -> bool {
        self.tickers.get(ticker).is_some_and(|t| t.is_active)
    }
}

/// URL when present, otherwise title + publication time.
fn dedup_key(item: &NewsItem) -> String {
    match &item.url {
        Some(url) if !url.trim().is_empty() => url.trim().to_string(),
        _ => format!("{}|{}", item.title, item.published_date),
    }
}

/// Process-local store. State is lost on restart.
#[derive(Default)]
pub struct InMemoryNewsStore {
    inner: RwLock<Inner>,
}

impl InMemoryNewsStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NewsStore for InMemoryNewsStore {
    async fn list_tickers(&self, active_only: bool) -> StoreResult<Vec<WatchlistTicker>> {
        let inner = self.inner.read();
        Ok(inner
            .tickers
            .values()
            .filter(|t| !active_only || t.is_active)
            .map(|t| inner.with_sentiment(t))
            .collect())
    }

    async fn get_ticker(&self, ticker: &str) -> StoreResult<WatchlistTicker> {
        let inner = self.inner.read();
        let entry = inner.active(ticker)?;
        Ok(inner.with_sentiment(entry))
    }

    async fn add_ticker(&self, ticker: &str, name: Option<String>) -> StoreResult<(WatchlistTicker, bool)> {
        let mut inner = self.inner.write();

        if let Some(existing) = inner.tickers.get_mut(ticker) {
            let reactivated = !existing.is_active;
            existing.is_active = true;
            if name.is_some() {
                existing.name = name;
            }
            let entry = existing.clone();
            return Ok((inner.with_sentiment(&entry), reactivated));
        }

        inner.next_ticker_id += 1;
        let entry = WatchlistTicker {
            id: inner.next_ticker_id,
            ticker: ticker.to_string(),
            name,
            added_at: Utc::now(),
            is_active: true,
            sentiment: None,
        };
        inner.tickers.insert(ticker.to_string(), entry.clone());
        inner.sentiments.insert(ticker.to_string(), TickerSentiment::empty(ticker));
        Ok((inner.with_sentiment(&entry), true))
    }

    async fn remove_ticker(&self, ticker: &str) -> StoreResult<()> {
        let mut inner = self.inner.write();
        match inner.tickers.get_mut(ticker) {
            Some(entry) if entry.is_active => {
                entry.is_active = false;
                Ok(())
            }
            _ => Err(StoreError::TickerNotFound { ticker: ticker.to_string() }),
        }
    }

    async fn save_news(&self, ticker: &str, items: Vec<NewsItem>) -> StoreResult<usize> {
        let mut inner = self.inner.write();
        if !inner.tickers.contains_key(ticker) {
            return Err(StoreError::TickerNotFound { ticker: ticker.to_string() });
        }

        let now = Utc::now();
        let mut saved = 0;
        for item in items {
            if !inner.seen.insert((ticker.to_string(), dedup_key(&item))) {
                continue;
            }
            inner.next_news_id += 1;
            let record = NewsRecord {
                id: inner.next_news_id,
                ticker: ticker.to_string(),
                title: item.title,
                summary: item.summary,
                published_date: item.published_date,
                source: item.source,
                url: item.url,
                relevance_score: item.relevance_score,
                status: NewsStatus::Pending,
                sentiment: None,
                justification: None,
                fetched_at: now,
                analyzed_at: None,
            };
            inner.news.push(record);
            saved += 1;
        }
        Ok(saved)
    }

    async fn news_for_ticker(&self, ticker: &str, query: NewsQuery) -> StoreResult<Vec<NewsRecord>> {
        let inner = self.inner.read();
        inner.active(ticker)?;

        let mut records: Vec<NewsRecord> = inner
            .news
            .iter()
            .filter(|n| n.ticker == ticker && query.status.map_or(true, |s| n.status == s))
            .cloned()
            .collect();
        records.sort_by(|a, b| b.published_date.cmp(&a.published_date).then(b.id.cmp(&a.id)));
        Ok(records.into_iter().skip(query.offset).take(query.limit).collect())
    }

    async fn count_news(&self, ticker: &str, status: Option<NewsStatus>) -> StoreResult<u32> {
        let inner = self.inner.read();
        let count = inner
            .news
            .iter()
            .filter(|n| n.ticker == ticker && status.map_or(true, |s| n.status == s))
            .count();
        Ok(count as u32)
    }

    async fn pending_news(&self, limit: usize) -> StoreResult<Vec<NewsRecord>> {
        let inner = self.inner.read();
        // Records are appended in id order, so iteration order is oldest first.
        Ok(inner
            .news
            .iter()
            .filter(|n| n.status == NewsStatus::Pending && inner.is_active(&n.ticker))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn pending_news_for_ticker(&self, ticker: &str, limit: usize) -> StoreResult<Vec<NewsRecord>> {
        let inner = self.inner.read();
        inner.active(ticker)?;
        Ok(inner
            .news
            .iter()
            .filter(|n| n.ticker == ticker && n.status == NewsStatus::Pending)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn record_analysis(&self, id: u64, analysis: &SentimentAnalysis, at: DateTime<Utc>) -> StoreResult<()> {
        let mut inner = self.inner.write();
        let record = inner.news.iter_mut().find(|n| n.id == id).ok_or(StoreError::NewsNotFound { id })?;
        record.status = NewsStatus::Analyzed;
        record.sentiment = Some(analysis.sentiment);
        record.justification = Some(analysis.justification.clone());
        record.analyzed_at = Some(at);
        Ok(())
    }

    async fn analyzed_sentiments(&self, ticker: &str) -> StoreResult<Vec<SentimentCategory>> {
        let inner = self.inner.read();
        Ok(inner
            .news
            .iter()
            .filter(|n| n.ticker == ticker && n.status == NewsStatus::Analyzed)
            .filter_map(|n| n.sentiment)
            .collect())
    }

    async fn ticker_sentiment(&self, ticker: &str) -> StoreResult<Option<TickerSentiment>> {
        Ok(self.inner.read().sentiments.get(ticker).cloned())
    }

    async fn put_ticker_sentiment(&self, sentiment: TickerSentiment) -> StoreResult<()> {
        self.inner.write().sentiments.insert(sentiment.ticker.clone(), sentiment);
        Ok(())
    }
}
