use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};
use std::future::Future;

use super::{ApiError, ApiResult};
use crate::scheduler::SchedulerStatus;
use crate::state::AppState;
use tickerpulse_core::jobs::{self, JobContext};
use tickerpulse_core::AppResult;
use tickerpulse_types::{normalize_ticker, JobInfo, JobKind, JobReport, TrackedService};

const MAX_FETCH_HOURS: u32 = 168;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct JobAccepted {
    pub status: String,
    pub job: JobKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticker: Option<String>,
}

#[derive(Deserialize, Default)]
pub struct FetchParams {
    pub hours: Option<u32>,
}

/// Start `job` in the background.
///
/// Refused with 503 while `service` is cooling down, so a request that could
/// not reach the upstream API is never reported as started, and with 409 while
/// another run of the same kind is in progress.
fn spawn_job<F, Fut>(
    state: &AppState,
    kind: JobKind,
    service: TrackedService,
    ticker: Option<String>,
    job: F,
) -> ApiResult<(StatusCode, Json<JobAccepted>)>
where
    F: FnOnce(JobContext) -> Fut + Send + 'static,
    Fut: Future<Output = AppResult<JobReport>> + Send + 'static,
{
    state.limits().guard(service).check()?;
    let run = state.jobs().try_start(kind)?;

    let tracker = state.jobs().clone();
    let ctx = state.job_context();
    tokio::spawn(async move {
        let result = job(ctx).await;
        match &result {
            Ok(report) => tracing::info!("[API] {} finished: {}", kind.as_str(), report.summary()),
            Err(e) => tracing::error!("[API] {} failed: {}", kind.as_str(), e),
        }
        tracker.complete(run, &result);
    });

    tracing::info!("[API] Started {}", kind.as_str());
    Ok((StatusCode::ACCEPTED, Json(JobAccepted { status: "started".to_string(), job: kind, ticker })))
}

fn fetch_hours(state: &AppState, requested: Option<u32>) -> ApiResult<u32> {
    match requested {
        None => Ok(state.job_settings().fetch_window_hours),
        Some(hours) if (1..=MAX_FETCH_HOURS).contains(&hours) => Ok(hours),
        Some(hours) => Err(ApiError::BadRequest(format!(
            "hours must be between 1 and {}, got {}",
            MAX_FETCH_HOURS, hours
        ))),
    }
}

pub async fn trigger_fetch_all(State(state): State<AppState>) -> ApiResult<(StatusCode, Json<JobAccepted>)> {
    let hours = state.job_settings().fetch_window_hours;
    spawn_job(&state, JobKind::FetchAllNews, TrackedService::AlphaVantage, None, move |ctx| async move {
        jobs::fetch_all_news(&ctx, hours).await
    })
}

pub async fn fetch_ticker_news(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    Query(params): Query<FetchParams>,
) -> ApiResult<(StatusCode, Json<JobAccepted>)> {
    let ticker = normalize_ticker(&symbol)?;
    let hours = fetch_hours(&state, params.hours)?;
    state.store().get_ticker(&ticker).await?;

    let job_ticker = ticker.clone();
    spawn_job(&state, JobKind::FetchNewsTicker, TrackedService::AlphaVantage, Some(ticker), move |ctx| async move {
        jobs::fetch_news_for_ticker(&ctx, &job_ticker, hours).await
    })
}

pub async fn trigger_analyze(State(state): State<AppState>) -> ApiResult<(StatusCode, Json<JobAccepted>)> {
    let batch_size = state.job_settings().analyze_batch_size;
    spawn_job(&state, JobKind::AnalyzePending, TrackedService::Gemini, None, move |ctx| async move {
        jobs::analyze_pending(&ctx, batch_size).await
    })
}

/// Per-ticker analysis shares the analyzer's slot so both never classify the same items.
pub async fn analyze_ticker_news(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> ApiResult<(StatusCode, Json<JobAccepted>)> {
    let ticker = normalize_ticker(&symbol)?;
    state.store().get_ticker(&ticker).await?;

    let limit = state.job_settings().analyze_batch_size;
    let job_ticker = ticker.clone();
    spawn_job(&state, JobKind::AnalyzePending, TrackedService::Gemini, Some(ticker), move |ctx| async move {
        jobs::analyze_pending_for_ticker(&ctx, &job_ticker, limit).await
    })
}

/// Run a scheduled job now, addressed by its scheduler id.
pub async fn trigger_scheduled_job(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> ApiResult<(StatusCode, Json<JobAccepted>)> {
    match JobKind::from_id(job_id.trim()) {
        Some(JobKind::FetchAllNews) => trigger_fetch_all(State(state)).await,
        Some(JobKind::AnalyzePending) => trigger_analyze(State(state)).await,
        _ => Err(ApiError::NotFound(format!("Job {} not found", job_id))),
    }
}

pub async fn get_jobs_status(State(state): State<AppState>) -> Json<Vec<JobInfo>> {
    Json(state.jobs().all())
}

pub async fn get_scheduler_status(State(state): State<AppState>) -> Json<SchedulerStatus> {
    Json(state.scheduler().status())
}
