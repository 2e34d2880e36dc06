//! Integration tests for the full router using axum-test

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::json;
use std::time::Duration;

use crate::router::build_router;
use crate::state::AppState;
use crate::test_helpers::test_app_state;
use tickerpulse_types::{ServiceStatusMap, TrackedService};

fn server(state: AppState) -> TestServer {
    TestServer::new(build_router(state)).unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let (state, _clock) = test_app_state();
    let response = server(state).get("/healthz").await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["scheduler"], false);
}

#[tokio::test]
async fn test_unknown_api_route_is_json_404() {
    let (state, _clock) = test_app_state();
    let response = server(state).get("/api/does-not-exist").await;

    response.assert_status(StatusCode::NOT_FOUND);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Not found");
}

#[tokio::test]
async fn test_status_shape_in_tracking_order() {
    let (state, _clock) = test_app_state();
    state.limits().alpha_vantage().enter_cooldown("Rate limit exceeded (429)", None);

    let response = server(state).get("/api/status").await;
    response.assert_status_ok();

    // `serde_json::Value` sorts object keys, so check the order on the typed map
    let typed: ServiceStatusMap = serde_json::from_str(&response.text()).unwrap();
    assert_eq!(typed.services(), vec![TrackedService::Gemini, TrackedService::AlphaVantage]);

    let body: serde_json::Value = response.json();
    assert_eq!(
        body["gemini"],
        json!({ "available": true, "cooldown_until": null, "message": null })
    );
    assert_eq!(
        body["alpha_vantage"],
        json!({
            "available": false,
            "cooldown_until": "2025-12-30T15:30:00Z",
            "message": "Rate limit exceeded (429)"
        })
    );
}

#[tokio::test]
async fn test_status_after_expiry_keeps_message() {
    let (state, clock) = test_app_state();
    state.limits().gemini().enter_cooldown("quota exceeded", Some(Duration::from_secs(10)));
    clock.advance(Duration::from_secs(11));

    let body: serde_json::Value = server(state).get("/api/status").await.json();
    assert_eq!(body["gemini"]["available"], true);
    assert_eq!(body["gemini"]["cooldown_until"], serde_json::Value::Null);
    assert_eq!(body["gemini"]["message"], "quota exceeded");
}

#[tokio::test]
async fn test_delete_status_clears_cooldown() {
    let (state, _clock) = test_app_state();
    state.limits().alpha_vantage().enter_cooldown("Rate limit exceeded (429)", None);
    let server = server(state.clone());

    let response = server.delete("/api/status/alpha_vantage").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["alpha_vantage"]["available"], true);
    assert!(state.limits().alpha_vantage().is_available());

    server.delete("/api/status/twitter").await.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_manual_trigger_in_cooldown_is_503_with_retry_after() {
    let (state, clock) = test_app_state();
    state.limits().alpha_vantage().enter_cooldown("Rate limit exceeded (429)", None);
    clock.advance(Duration::from_millis(20_500));

    let response = server(state).post("/api/jobs/fetch-news").await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.header("retry-after"), "40");
    let body: serde_json::Value = response.json();
    assert_eq!(body["service"], "alpha_vantage");
    assert_eq!(body["retry_after_secs"], 40);
}

#[tokio::test]
async fn test_running_job_is_409() {
    let (state, _clock) = test_app_state();
    let _run = state.jobs().try_start(tickerpulse_types::JobKind::AnalyzePending).unwrap();

    server(state).post("/api/jobs/analyze").await.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_watchlist_round_trip() {
    let (state, _clock) = test_app_state();
    let server = server(state);

    server
        .post("/api/tickers")
        .json(&json!({ "ticker": "aapl", "name": "Apple" }))
        .await
        .assert_status(StatusCode::CREATED);

    let body: serde_json::Value = server.get("/api/tickers/AAPL").await.json();
    assert_eq!(body["ticker"], "AAPL");
    assert_eq!(body["is_active"], true);

    server.get("/api/tickers/AAPL/news?status=pending&limit=5").await.assert_status_ok();
    server.delete("/api/tickers/AAPL").await.assert_status(StatusCode::NO_CONTENT);
    server.get("/api/tickers/AAPL").await.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_scheduler_trigger_route() {
    let (state, _clock) = test_app_state();
    let _run = state.jobs().try_start(tickerpulse_types::JobKind::FetchAllNews).unwrap();
    let server = server(state);

    server.post("/api/scheduler/trigger/fetch_all_news").await.assert_status(StatusCode::CONFLICT);

    let response = server.post("/api/scheduler/trigger/news_sync").await;
    response.assert_status(StatusCode::NOT_FOUND);
    let body: serde_json::Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("news_sync"));
}
