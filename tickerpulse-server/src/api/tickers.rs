use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};

use super::{ApiError, ApiResult};
use crate::state::AppState;
use tickerpulse_core::store::NewsQuery;
use tickerpulse_types::{normalize_ticker, NewsRecord, NewsStatus, TickerSentiment, WatchlistTicker};

const MAX_NEWS_PAGE: usize = 200;

#[derive(Deserialize)]
pub struct AddTickerRequest {
    pub ticker: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Deserialize, Default)]
pub struct NewsParams {
    pub status: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct NewsPage {
    pub ticker: String,
    pub total: u32,
    pub limit: usize,
    pub offset: usize,
    pub news: Vec<NewsRecord>,
}

pub async fn list_tickers(State(state): State<AppState>) -> ApiResult<Json<Vec<WatchlistTicker>>> {
    Ok(Json(state.store().list_tickers(true).await?))
}

pub async fn get_ticker(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> ApiResult<Json<WatchlistTicker>> {
    let ticker = normalize_ticker(&symbol)?;
    Ok(Json(state.store().get_ticker(&ticker).await?))
}

/// 201 when the ticker was added or reactivated, 200 when it was already watched.
pub async fn add_ticker(
    State(state): State<AppState>,
    Json(payload): Json<AddTickerRequest>,
) -> ApiResult<(StatusCode, Json<WatchlistTicker>)> {
    let ticker = normalize_ticker(&payload.ticker)?;
    let name = payload.name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty());
    let (entry, created) = state.store().add_ticker(&ticker, name).await?;
    if created {
        tracing::info!("[API] Added {} to the watchlist", ticker);
        Ok((StatusCode::CREATED, Json(entry)))
    } else {
        Ok((StatusCode::OK, Json(entry)))
    }
}

pub async fn remove_ticker(State(state): State<AppState>, Path(symbol): Path<String>) -> ApiResult<StatusCode> {
    let ticker = normalize_ticker(&symbol)?;
    state.store().remove_ticker(&ticker).await?;
    tracing::info!("[API] Removed {} from the watchlist", ticker);
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_ticker_news(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    Query(params): Query<NewsParams>,
) -> ApiResult<Json<NewsPage>> {
    let ticker = normalize_ticker(&symbol)?;
    let status = params
        .status
        .as_deref()
        .map(str::parse::<NewsStatus>)
        .transpose()
        .map_err(ApiError::BadRequest)?;

    let defaults = NewsQuery::default();
    let query = NewsQuery {
        status,
        limit: params.limit.unwrap_or(defaults.limit).clamp(1, MAX_NEWS_PAGE),
        offset: params.offset.unwrap_or(0),
    };

    state.store().get_ticker(&ticker).await?;
    let total = state.store().count_news(&ticker, status).await?;
    let news = state.store().news_for_ticker(&ticker, query).await?;

    Ok(Json(NewsPage { ticker, total, limit: query.limit, offset: query.offset, news }))
}

pub async fn get_ticker_sentiment(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> ApiResult<Json<TickerSentiment>> {
    let ticker = normalize_ticker(&symbol)?;
    state.store().get_ticker(&ticker).await?;
    let sentiment = state.store().ticker_sentiment(&ticker).await?;
    Ok(Json(sentiment.unwrap_or_else(|| TickerSentiment::empty(&ticker))))
}
