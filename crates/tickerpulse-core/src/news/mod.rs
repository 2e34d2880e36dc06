//! Alpha Vantage NEWS_SENTIMENT client, guarded by the `alpha_vantage` cooldown.

mod feed;


use chrono::{DateTime, Utc};
use std::sync::Arc;
use tickerpulse_types::{NewsError, NewsItem, TrackedService};

use crate::config::AlphaVantageSettings;
use crate::rate_limit::{detect_rate_limit, GuardOutcome, RateLimitManager};
use crate::upstream::{with_retry, CallPacer, RetryPolicy};

/// Provider timestamp format for `time_from` / `time_to`.
pub const TIME_FORMAT: &str = "%Y%m%dT%H%M";

/// Response fields the provider uses for throttling / usage notices.
const NOTICE_FIELDS: [&str; 2] = ["Note", "Information"];

pub struct AlphaVantageClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    limits: Arc<RateLimitManager>,
    pacer: CallPacer,
    retry: RetryPolicy,
}

impl AlphaVantageClient {
    pub fn new(settings: &AlphaVantageSettings, http: reqwest::Client, limits: Arc<RateLimitManager>) -> Self {
        Self {
            http,
            base_url: settings.base_url.clone(),
            api_key: settings.api_key.clone(),
            limits,
            pacer: CallPacer::per_minute("NewsFetcher", settings.calls_per_minute),
            retry: settings.retry,
        }
    }

    /// Fetch news published for `ticker` between `time_from` and `time_to`.
    ///
    /// Returns `Skipped` when the provider is cooling down or this very call
    /// hit its rate limit. Other failures are `NewsError`s and leave the
    /// cooldown untouched; transient ones (transport, 5xx) are retried with
    /// backoff first.
    pub async fn fetch_news(
        &self,
        ticker: &str,
        time_from: DateTime<Utc>,
        time_to: DateTime<Utc>,
    ) -> Result<GuardOutcome<Vec<NewsItem>>, NewsError> {
        let from = time_from.format(TIME_FORMAT).to_string();
        let to = time_to.format(TIME_FORMAT).to_string();
        let (from, to) = (from.as_str(), to.as_str());

        with_retry(self.retry, "NewsFetcher", NewsError::is_transient, move || self.fetch_once(ticker, from, to))
            .await
    }

    async fn fetch_once(&self, ticker: &str, from: &str, to: &str) -> Result<GuardOutcome<Vec<NewsItem>>, NewsError> {
        let guard = self.limits.guard(TrackedService::AlphaVantage);
        if let Err(reason) = guard.check() {
            return Ok(GuardOutcome::Skipped(reason));
        }
        // A long wait for a slot can outlast a cooldown started meanwhile
        if self.pacer.acquire().await {
            if let Err(reason) = guard.check() {
                return Ok(GuardOutcome::Skipped(reason));
            }
        }

        tracing::info!("[NewsFetcher] NEWS_SENTIMENT for {} ({} -> {})", ticker, from, to);

        let response = self
            .http
            .get(&self.base_url)
            .query(&[
                ("function", "NEWS_SENTIMENT"),
                ("tickers", ticker),
                ("apikey", self.api_key.as_str()),
                ("time_from", from),
                ("time_to", to),
            ])
            .send()
            .await
            .map_err(|e| NewsError::Network { message: e.to_string() })?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| NewsError::Network { message: e.to_string() })?;

        if !(200..300).contains(&status) {
            if let Some(signal) = detect_rate_limit(Some(status), &body) {
                return Ok(GuardOutcome::Skipped(guard.report(&signal)));
            }
            tracing::warn!("[NewsFetcher] HTTP {} for {}", status, ticker);
            return Err(NewsError::Http { status, message: truncate_body(&body) });
        }

        let data: serde_json::Value = serde_json::from_str(&body)
            .map_err(|e| NewsError::InvalidResponse { message: e.to_string() })?;

        if let Some(message) = data.get("Error Message").and_then(|v| v.as_str()) {
            return Err(NewsError::Api { message: message.to_string() });
        }

        for field in NOTICE_FIELDS {
            if let Some(notice) = data.get(field).and_then(|v| v.as_str()) {
                if let Some(signal) = detect_rate_limit(None, notice) {
                    return Ok(GuardOutcome::Skipped(guard.report(&signal)));
                }
                tracing::warn!("[NewsFetcher] API {}: {}", field, notice);
            }
        }

        let items = feed::parse_feed(&data);
        tracing::info!("[NewsFetcher] {} news items for {}", items.len(), ticker);
        Ok(GuardOutcome::Completed(items))
    }
}

fn truncate_body(body: &str) -> String {
    body.chars().take(300).collect()
}
