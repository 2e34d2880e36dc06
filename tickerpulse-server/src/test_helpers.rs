//! Test helpers for tickerpulse-server unit tests.

use chrono::{TimeZone, Utc};
use std::sync::Arc;
use std::time::Duration;

use tickerpulse_core::config::{AlphaVantageSettings, GeminiSettings, JobSettings};
use tickerpulse_core::news::AlphaVantageClient;
use tickerpulse_core::rate_limit::ManualClock;
use tickerpulse_core::sentiment::GeminiClient;
use tickerpulse_core::store::InMemoryNewsStore;
use tickerpulse_core::upstream::RetryPolicy;
use tickerpulse_core::{CooldownSettings, RateLimitManager};

use crate::state::AppState;

/// Nothing listens here; jobs started by tests fail fast instead of reaching the internet.
const UNREACHABLE: &str = "http://127.0.0.1:9";

/// Create a minimal `AppState` whose upstream clients point at nothing.
///
/// The returned clock drives every cooldown in the state.
pub fn test_app_state() -> (AppState, Arc<ManualClock>) {
    test_app_state_with(UNREACHABLE, UNREACHABLE)
}

/// Like [`test_app_state`], with the news and model APIs at the given base URLs.
pub fn test_app_state_with(news_url: &str, model_url: &str) -> (AppState, Arc<ManualClock>) {
    let start = Utc.with_ymd_and_hms(2025, 12, 30, 15, 29, 0).single().unwrap_or_else(Utc::now);
    let clock = Arc::new(ManualClock::new(start));
    let limits = Arc::new(RateLimitManager::with_clock(CooldownSettings::default(), clock.clone()));
    let http = reqwest::Client::new();

    let news = AlphaVantageClient::new(
        &AlphaVantageSettings {
            api_key: "demo".to_string(),
            base_url: news_url.to_string(),
            calls_per_minute: 1_000,
            retry: RetryPolicy::none(),
        },
        http.clone(),
        Arc::clone(&limits),
    );
    let sentiment = GeminiClient::new(
        &GeminiSettings {
            api_key: Some("test-key".to_string()),
            base_url: model_url.to_string(),
            model: "gemini-2.5-flash-lite".to_string(),
            calls_per_minute: 1_000,
            retry: RetryPolicy::none(),
        },
        http,
        Arc::clone(&limits),
    );

    let job_settings = JobSettings {
        fetch_interval: Duration::from_secs(1800),
        analyze_interval: Duration::from_secs(300),
        analyze_batch_size: 10,
        fetch_window_hours: 6,
    };

    let state = AppState::new_with_components(
        limits,
        Arc::new(InMemoryNewsStore::new()),
        Arc::new(news),
        Arc::new(sentiment),
        job_settings,
    );
    (state, clock)
}
