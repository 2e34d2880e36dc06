use chrono::Utc;
use std::collections::BTreeSet;
use tickerpulse_types::{JobReport, NewsRecord, NewsStatus, SentimentError, TickerSentiment, TrackedService};

use super::JobContext;
use crate::error::AppResult;
use crate::rate_limit::GuardOutcome;
use crate::scoring;
use crate::sentiment::news_text;

/// Classify up to `batch_size` pending items across all active tickers.
pub async fn analyze_pending(ctx: &JobContext, batch_size: usize) -> AppResult<JobReport> {
    if let Err(reason) = ctx.limits.guard(TrackedService::Gemini).check() {
        tracing::info!("[Analyzer] Batch skipped: {}", reason);
        return Ok(JobReport::skipped(reason));
    }
    let pending = ctx.store.pending_news(batch_size).await?;
    analyze_batch(ctx, pending).await
}

/// Classify up to `limit` pending items of one ticker.
pub async fn analyze_pending_for_ticker(ctx: &JobContext, ticker: &str, limit: usize) -> AppResult<JobReport> {
    ctx.store.get_ticker(ticker).await?;
    if let Err(reason) = ctx.limits.guard(TrackedService::Gemini).check() {
        tracing::info!("[Analyzer] {} skipped: {}", ticker, reason);
        return Ok(JobReport::skipped(reason));
    }
    let pending = ctx.store.pending_news_for_ticker(ticker, limit).await?;
    analyze_batch(ctx, pending).await
}

async fn analyze_batch(ctx: &JobContext, pending: Vec<NewsRecord>) -> AppResult<JobReport> {
    let mut report = JobReport::default();
    if pending.is_empty() {
        tracing::info!("[Analyzer] No pending news to analyze");
        return Ok(report);
    }

    tracing::info!("[Analyzer] Analyzing {} pending news items", pending.len());
    let mut touched = BTreeSet::new();

    for news in pending {
        let text = news_text(&news.title, &news.summary);
        match ctx.sentiment.classify(&news.ticker, &text).await {
            Ok(GuardOutcome::Completed(analysis)) => {
                report.processed += 1;
                ctx.store.record_analysis(news.id, &analysis, Utc::now()).await?;
                touched.insert(news.ticker);
                report.succeeded += 1;
            }
            Ok(GuardOutcome::Skipped(reason)) => {
                tracing::warn!("[Analyzer] Stopping batch: {}", reason);
                report.skipped = Some(reason);
                break;
            }
            Err(SentimentError::MissingApiKey) => {
                report.processed += 1;
                report.errors += 1;
                tracing::error!("[Analyzer] Sentiment model API key is not configured, stopping batch");
                break;
            }
            Err(e) => {
                report.processed += 1;
                report.errors += 1;
                tracing::error!("[Analyzer] Analysis failed for news {}: {}", news.id, e);
            }
        }
    }

    for ticker in &touched {
        if let Err(e) = refresh_ticker_sentiment(ctx, ticker).await {
            tracing::error!("[Analyzer] Failed to update sentiment for {}: {}", ticker, e);
        }
    }

    tracing::info!(
        "[Analyzer] Batch finished: {}, tickers updated: {}",
        report.summary(),
        touched.len()
    );
    Ok(report)
}

/// Recompute and store the aggregate for one ticker.
pub async fn refresh_ticker_sentiment(ctx: &JobContext, ticker: &str) -> AppResult<TickerSentiment> {
    let analyzed = ctx.store.analyzed_sentiments(ticker).await?;
    let pending = ctx.store.count_news(ticker, Some(NewsStatus::Pending)).await?;
    let sentiment = scoring::aggregate(ticker, &analyzed, pending, Utc::now());

    tracing::info!(
        "[Analyzer] Updated sentiment for {}: score={:.2}, signal={}",
        ticker,
        sentiment.normalized_score,
        sentiment.signal.map_or("n/a", |s| s.as_str())
    );
    ctx.store.put_ticker_sentiment(sentiment.clone()).await?;
    Ok(sentiment)
}
