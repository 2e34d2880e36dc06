//! TickerPulse Server - Headless Daemon
//!
//! A pure Rust HTTP server that:
//! - Fetches news for a watchlist of tickers from Alpha Vantage
//! - Classifies each item with Gemini and aggregates per-ticker signals
//! - Backs off from either upstream API while it is rate limiting us
//! - Provides a REST API for the watchlist, jobs and cooldown status on /api/*
//!
//! Access via: http://localhost:8000

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::panic))]

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod api;
mod cli;
mod commands;
mod router;
mod scheduler;
mod server_utils;
mod state;

#[cfg(test)]
mod test_helpers;

use cli::{Cli, Commands, ServeArgs};
use state::AppState;
use tickerpulse_core::http::build_http_client;
use tickerpulse_core::news::AlphaVantageClient;
use tickerpulse_core::sentiment::GeminiClient;
use tickerpulse_core::store::InMemoryNewsStore;
use tickerpulse_core::{AppSettings, RateLimitManager};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    match cli.command {
        Some(Commands::Status { url, json }) => commands::handle_status(&url, json).await,
        Some(Commands::Serve) | None => run_server(cli.serve).await,
    }
}

async fn run_server(args: ServeArgs) -> Result<()> {
    let settings = AppSettings::validate(args.raw_settings())?;
    info!("🚀 TickerPulse v{} starting on {}:{}...", env!("CARGO_PKG_VERSION"), args.host, args.port);

    // One manager for the whole process; every upstream caller shares it.
    let limits = Arc::new(RateLimitManager::new(settings.cooldowns));
    let http = build_http_client(settings.http_timeout)?;

    let news = AlphaVantageClient::new(&settings.alpha_vantage, http.clone(), Arc::clone(&limits));
    let sentiment = GeminiClient::new(&settings.gemini, http, Arc::clone(&limits));
    if !sentiment.is_configured() {
        tracing::warn!("⚠️ GEMINI_API_KEY not set, sentiment analysis is disabled");
    }

    let state = AppState::new_with_components(
        limits,
        Arc::new(InMemoryNewsStore::new()),
        Arc::new(news),
        Arc::new(sentiment),
        settings.jobs,
    );
    info!(
        "✅ Application state initialized (cooldowns: gemini {}s, alpha_vantage {}s)",
        settings.cooldowns.gemini.as_secs(),
        settings.cooldowns.alpha_vantage.as_secs()
    );

    let scheduler = if args.no_scheduler {
        info!("⏸️ Background schedulers disabled");
        None
    } else {
        Some(scheduler::start(state.clone()))
    };

    let app = router::build_router(state);
    let listener = server_utils::create_listener(&args.host, args.port).await?;
    info!("🔌 API available at http://{}:{}/api/", args.host, args.port);

    axum::serve(listener, app).with_graceful_shutdown(server_utils::shutdown_signal()).await?;

    if let Some(scheduler) = scheduler {
        scheduler.shutdown().await;
    }
    info!("👋 TickerPulse stopped");
    Ok(())
}
