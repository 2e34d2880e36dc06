use chrono::{Duration, Utc};
use tickerpulse_types::{JobReport, TrackedService};

use super::JobContext;
use crate::error::AppResult;
use crate::rate_limit::GuardOutcome;

/// Fetch the last `hours` of news for every active ticker.
///
/// Stops at the first rate-limit skip: the remaining tickers would only be
/// skipped as well.
pub async fn fetch_all_news(ctx: &JobContext, hours: u32) -> AppResult<JobReport> {
    if let Err(reason) = ctx.limits.guard(TrackedService::AlphaVantage).check() {
        tracing::info!("[NewsFetcher] Batch skipped: {}", reason);
        return Ok(JobReport::skipped(reason));
    }

    let tickers = ctx.store.list_tickers(true).await?;
    if tickers.is_empty() {
        tracing::info!("[NewsFetcher] No active tickers to fetch");
        return Ok(JobReport::default());
    }

    tracing::info!("[NewsFetcher] Fetching news for {} tickers", tickers.len());
    let mut report = JobReport::default();

    for entry in tickers {
        match fetch_one(ctx, &entry.ticker, hours).await {
            Ok(GuardOutcome::Completed(saved)) => {
                report.processed += 1;
                report.succeeded += 1;
                report.saved += saved;
            }
            Ok(GuardOutcome::Skipped(reason)) => {
                tracing::warn!("[NewsFetcher] Stopping batch at {}: {}", entry.ticker, reason);
                report.skipped = Some(reason);
                break;
            }
            Err(e) => {
                report.processed += 1;
                report.errors += 1;
                tracing::error!("[NewsFetcher] Failed to fetch news for {}: {}", entry.ticker, e);
            }
        }
    }

    tracing::info!("[NewsFetcher] Batch finished: {}", report.summary());
    Ok(report)
}

/// Fetch the last `hours` of news for one watched ticker.
pub async fn fetch_news_for_ticker(ctx: &JobContext, ticker: &str, hours: u32) -> AppResult<JobReport> {
    ctx.store.get_ticker(ticker).await?;

    match fetch_one(ctx, ticker, hours).await? {
        GuardOutcome::Completed(saved) => {
            tracing::info!("[NewsFetcher] {}: {} new items saved", ticker, saved);
            Ok(JobReport { processed: 1, succeeded: 1, saved, ..Default::default() })
        }
        GuardOutcome::Skipped(reason) => Ok(JobReport::skipped(reason)),
    }
}

async fn fetch_one(ctx: &JobContext, ticker: &str, hours: u32) -> AppResult<GuardOutcome<u32>> {
    let time_to = Utc::now();
    let time_from = time_to - Duration::hours(i64::from(hours));

    let items = match ctx.news.fetch_news(ticker, time_from, time_to).await? {
        GuardOutcome::Completed(items) => items,
        GuardOutcome::Skipped(reason) => return Ok(GuardOutcome::Skipped(reason)),
    };
    let saved = ctx.store.save_news(ticker, items).await?;
    Ok(GuardOutcome::Completed(saved as u32))
}
