use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{method, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::jobs::{
    analyze_ticker_news, fetch_ticker_news, get_jobs_status, get_scheduler_status, trigger_analyze,
    trigger_fetch_all, trigger_scheduled_job, FetchParams,
};
use super::ApiError;
use crate::state::AppState;
use crate::test_helpers::{test_app_state, test_app_state_with};
use tickerpulse_types::{JobKind, JobStatus, SkipReason, TrackedService};

async fn wait_until_idle(state: &AppState, kind: JobKind) {
    for _ in 0..100 {
        if !state.jobs().is_running(kind) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("{} still running", kind.as_str());
}

#[tokio::test]
async fn test_fetch_refused_during_cooldown() {
    let (state, _clock) = test_app_state();
    state.limits().alpha_vantage().enter_cooldown("Rate limit exceeded (429)", None);

    let err = trigger_fetch_all(State(state.clone())).await.unwrap_err();
    match err {
        ApiError::Unavailable(SkipReason::Cooldown { service, remaining_secs }) => {
            assert_eq!(service, TrackedService::AlphaVantage);
            assert_eq!(remaining_secs, 60);
        }
        other => panic!("unexpected error: {:?}", other),
    }
    // Refused before the tracker was touched
    assert_eq!(state.jobs().get(JobKind::FetchAllNews).unwrap().status, JobStatus::Idle);
}

#[tokio::test]
async fn test_analyze_refused_during_gemini_cooldown_only() {
    let (state, _clock) = test_app_state();
    state.limits().gemini().enter_cooldown("RESOURCE_EXHAUSTED", None);

    let err = trigger_analyze(State(state.clone())).await.unwrap_err();
    assert!(matches!(err, ApiError::Unavailable(_)));
    assert!(state.limits().alpha_vantage().is_available());
}

#[tokio::test]
async fn test_second_run_conflicts() {
    let (state, _clock) = test_app_state();
    let run = state.jobs().try_start(JobKind::AnalyzePending).unwrap();

    let err = trigger_analyze(State(state.clone())).await.unwrap_err();
    assert!(matches!(err, ApiError::Conflict(_)));

    state.jobs().complete(run, &Ok(Default::default()));
    assert!(!state.jobs().is_running(JobKind::AnalyzePending));
}

#[tokio::test]
async fn test_ticker_fetch_validates_input() {
    let (state, _clock) = test_app_state();

    let err = fetch_ticker_news(State(state.clone()), Path("ZZZZ".to_string()), Query(FetchParams::default()))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));

    state.store().add_ticker("AAPL", None).await.unwrap();
    let err = fetch_ticker_news(State(state.clone()), Path("AAPL".to_string()), Query(FetchParams { hours: Some(0) }))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::BadRequest(_)));

    let err = analyze_ticker_news(State(state), Path("1234".to_string())).await.unwrap_err();
    assert!(matches!(err, ApiError::BadRequest(_)));
}

#[tokio::test]
async fn test_fetch_all_runs_in_background() {
    let news_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("function", "NEWS_SENTIMENT"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "feed": [{
                "title": "Apple ships new chip",
                "summary": "Analysts expect strong demand.",
                "time_published": "20251230T150000",
                "source": "Reuters",
                "url": "https://news.example/apple-chip",
                "ticker_sentiment": [{ "ticker": "AAPL", "relevance_score": "0.9" }]
            }]
        })))
        .mount(&news_server)
        .await;

    let (state, _clock) = test_app_state_with(&news_server.uri(), "http://127.0.0.1:9");
    state.store().add_ticker("AAPL", None).await.unwrap();

    let (status, Json(accepted)) = trigger_fetch_all(State(state.clone())).await.unwrap();
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(accepted.job, JobKind::FetchAllNews);

    wait_until_idle(&state, JobKind::FetchAllNews).await;
    let info = state.jobs().get(JobKind::FetchAllNews).unwrap();
    assert_eq!(info.status, JobStatus::Idle);
    assert_eq!(info.last_result.unwrap().saved, 1);
    assert_eq!(state.store().count_news("AAPL", None).await.unwrap(), 1);
}

#[tokio::test]
async fn test_background_rate_limit_starts_cooldown() {
    let news_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429).set_body_string("Too Many Requests"))
        .mount(&news_server)
        .await;

    let (state, _clock) = test_app_state_with(&news_server.uri(), "http://127.0.0.1:9");
    state.store().add_ticker("TSLA", None).await.unwrap();

    trigger_fetch_all(State(state.clone())).await.unwrap();
    wait_until_idle(&state, JobKind::FetchAllNews).await;

    let info = state.jobs().get(JobKind::FetchAllNews).unwrap();
    assert!(info.last_result.unwrap().was_skipped());
    let status = state.limits().alpha_vantage().status();
    assert!(!status.available);
    assert_eq!(status.message.as_deref(), Some("Rate limit exceeded (429)"));

    // The next manual trigger is refused up front
    assert!(matches!(trigger_fetch_all(State(state)).await, Err(ApiError::Unavailable(_))));
}

#[tokio::test]
async fn test_jobs_and_scheduler_status() {
    let (state, _clock) = test_app_state();

    let Json(jobs) = get_jobs_status(State(state.clone())).await;
    let kinds: Vec<_> = jobs.iter().map(|j| j.kind).collect();
    assert_eq!(kinds, JobKind::ALL.to_vec());
    assert!(jobs.iter().all(|j| j.status == JobStatus::Idle));

    let Json(scheduler) = get_scheduler_status(State(state)).await;
    assert!(!scheduler.running);
    assert!(scheduler.jobs.is_empty());
}

#[tokio::test]
async fn test_trigger_scheduled_job_by_id() {
    let (state, _clock) = test_app_state();

    let (status, Json(accepted)) =
        trigger_scheduled_job(State(state.clone()), Path("analyze_pending".to_string())).await.unwrap();
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(accepted.job, JobKind::AnalyzePending);
    assert!(accepted.ticker.is_none());
    wait_until_idle(&state, JobKind::AnalyzePending).await;

    for job_id in ["fetch_news_ticker", "news_fetcher", ""] {
        let err = trigger_scheduled_job(State(state.clone()), Path(job_id.to_string())).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)), "{}", job_id);
    }
}

#[tokio::test]
async fn test_trigger_scheduled_job_respects_cooldown() {
    let (state, _clock) = test_app_state();
    state.limits().alpha_vantage().enter_cooldown("Rate limit exceeded (429)", None);

    let err = trigger_scheduled_job(State(state.clone()), Path("fetch_all_news".to_string())).await.unwrap_err();
    assert!(matches!(err, ApiError::Unavailable(SkipReason::Cooldown { service: TrackedService::AlphaVantage, .. })));
    assert!(!state.jobs().is_running(JobKind::FetchAllNews));
}
