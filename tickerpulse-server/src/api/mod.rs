//! API Routes
//!
//! REST endpoints for the watchlist, the batch jobs and the upstream rate-limit status.

mod jobs;
mod status;
mod tickers;

#[cfg(test)]
mod jobs_tests;
#[cfg(test)]
mod router_tests;
#[cfg(test)]
mod tickers_tests;

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{delete, get, post},
    Router,
};

use crate::state::AppState;
use tickerpulse_core::AppError;
use tickerpulse_types::{SkipReason, StoreError};

pub fn router() -> Router<AppState> {
    Router::new()
        // Rate-limit status
        .route("/status", get(status::get_status))
        .route("/status/:service", delete(status::clear_service_cooldown))
        // Watchlist
        .route("/tickers", get(tickers::list_tickers).post(tickers::add_ticker))
        .route("/tickers/:symbol", get(tickers::get_ticker).delete(tickers::remove_ticker))
        .route("/tickers/:symbol/news", get(tickers::get_ticker_news))
        .route("/tickers/:symbol/sentiment", get(tickers::get_ticker_sentiment))
        .route("/tickers/:symbol/fetch", post(jobs::fetch_ticker_news))
        .route("/tickers/:symbol/analyze", post(jobs::analyze_ticker_news))
        // Jobs
        .route("/jobs/fetch-news", post(jobs::trigger_fetch_all))
        .route("/jobs/fetch-news/:symbol", post(jobs::fetch_ticker_news))
        .route("/jobs/analyze", post(jobs::trigger_analyze))
        .route("/jobs/status", get(jobs::get_jobs_status))
        // Scheduler
        .route("/scheduler/status", get(jobs::get_scheduler_status))
        .route("/scheduler/trigger/:job_id", post(jobs::trigger_scheduled_job))
        // API fallback: return 404 for unknown API endpoints
        .fallback(api_not_found)
}

async fn api_not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(serde_json::json!({"error": "Not found"})))
}

/// Error returned by every fallible handler.
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Conflict(String),
    /// The upstream service is cooling down; carries the skip for `Retry-After`.
    Unavailable(SkipReason),
    Upstream(String),
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<SkipReason> for ApiError {
    fn from(reason: SkipReason) -> Self {
        Self::Unavailable(reason)
    }
}

impl From<AppError> for ApiError {
    fn from(e: AppError) -> Self {
        match e {
            AppError::JobRunning(_) => Self::Conflict(e.to_string()),
            AppError::Store(ref store) if store.is_not_found() => Self::NotFound(e.to_string()),
            AppError::Store(_) | AppError::Config(_) => Self::BadRequest(e.to_string()),
            AppError::News(_) | AppError::Sentiment(_) | AppError::Network(_) => Self::Upstream(e.to_string()),
            _ => Self::Internal(e.to_string()),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        AppError::from(e).into()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match self {
            Self::Unavailable(reason) => {
                let retry_after = reason.retry_after_secs();
                let body = Json(serde_json::json!({
                    "error": reason.to_string(),
                    "service": reason.service(),
                    "retry_after_secs": retry_after,
                }));
                let mut response = (status, body).into_response();
                if let Ok(value) = HeaderValue::from_str(&retry_after.to_string()) {
                    response.headers_mut().insert(header::RETRY_AFTER, value);
                }
                response
            }
            Self::NotFound(msg)
            | Self::BadRequest(msg)
            | Self::Conflict(msg)
            | Self::Upstream(msg)
            | Self::Internal(msg) => {
                if status.is_server_error() {
                    tracing::error!("[API] {}", msg);
                }
                (status, Json(serde_json::json!({"error": msg}))).into_response()
            }
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
