use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;

use super::tickers::{
    add_ticker, get_ticker, get_ticker_news, get_ticker_sentiment, list_tickers, remove_ticker, AddTickerRequest,
    NewsParams,
};
use super::ApiError;
use crate::test_helpers::test_app_state;
use tickerpulse_types::{NewsItem, NewsStatus};

fn item(i: usize) -> NewsItem {
    NewsItem {
        title: format!("Headline {}", i),
        summary: "Shares moved.".to_string(),
        published_date: format!("20251230T1{}0000", i),
        source: Some("Reuters".to_string()),
        url: Some(format!("https://news.example/{}", i)),
        relevance_score: Some(0.5),
    }
}

fn add_request(ticker: &str) -> Json<AddTickerRequest> {
    Json(AddTickerRequest { ticker: ticker.to_string(), name: Some(" Apple Inc. ".to_string()) })
}

#[tokio::test]
async fn test_add_ticker_normalizes_symbol() {
    let (state, _clock) = test_app_state();
    let (status, Json(entry)) = add_ticker(State(state.clone()), add_request(" aapl ")).await.unwrap();
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(entry.ticker, "AAPL");
    assert_eq!(entry.name.as_deref(), Some("Apple Inc."));

    let (status, _) = add_ticker(State(state.clone()), add_request("AAPL")).await.unwrap();
    assert_eq!(status, StatusCode::OK);

    let Json(tickers) = list_tickers(State(state)).await.unwrap();
    assert_eq!(tickers.len(), 1);
}

#[tokio::test]
async fn test_add_invalid_ticker_rejected() {
    let (state, _clock) = test_app_state();
    let err = add_ticker(State(state), add_request("BRK.B")).await.unwrap_err();
    assert!(matches!(err, ApiError::BadRequest(_)));
}

#[tokio::test]
async fn test_remove_then_get_is_not_found() {
    let (state, _clock) = test_app_state();
    add_ticker(State(state.clone()), add_request("MSFT")).await.unwrap();

    let status = remove_ticker(State(state.clone()), Path("msft".to_string())).await.unwrap();
    assert_eq!(status, StatusCode::NO_CONTENT);

    let err = get_ticker(State(state.clone()), Path("MSFT".to_string())).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));

    let err = remove_ticker(State(state), Path("MSFT".to_string())).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}

#[tokio::test]
async fn test_ticker_news_paging_and_filter() {
    let (state, _clock) = test_app_state();
    add_ticker(State(state.clone()), add_request("AAPL")).await.unwrap();
    state.store().save_news("AAPL", (0..5).map(item).collect()).await.unwrap();

    let params = NewsParams { status: Some("pending".to_string()), limit: Some(2), offset: Some(1) };
    let Json(page) = get_ticker_news(State(state.clone()), Path("aapl".to_string()), Query(params)).await.unwrap();
    assert_eq!(page.total, 5);
    assert_eq!(page.news.len(), 2);
    // Newest first, skipping the newest one
    assert_eq!(page.news[0].title, "Headline 3");
    assert!(page.news.iter().all(|n| n.status == NewsStatus::Pending));

    let params = NewsParams { status: Some("analyzed".to_string()), ..Default::default() };
    let Json(page) = get_ticker_news(State(state), Path("AAPL".to_string()), Query(params)).await.unwrap();
    assert_eq!(page.total, 0);
    assert!(page.news.is_empty());
}

#[tokio::test]
async fn test_ticker_news_bad_status() {
    let (state, _clock) = test_app_state();
    add_ticker(State(state.clone()), add_request("AAPL")).await.unwrap();

    let params = NewsParams { status: Some("unknown".to_string()), ..Default::default() };
    let err = get_ticker_news(State(state), Path("AAPL".to_string()), Query(params)).await.unwrap_err();
    assert!(matches!(err, ApiError::BadRequest(_)));
}

#[tokio::test]
async fn test_sentiment_of_new_ticker_is_empty() {
    let (state, _clock) = test_app_state();
    add_ticker(State(state.clone()), add_request("NVDA")).await.unwrap();

    let Json(sentiment) = get_ticker_sentiment(State(state), Path("NVDA".to_string())).await.unwrap();
    assert_eq!(sentiment.ticker, "NVDA");
    assert_eq!(sentiment.total_analyzed, 0);
    assert!(sentiment.signal.is_none());
}
