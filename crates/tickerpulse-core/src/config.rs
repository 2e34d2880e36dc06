//! Validated runtime settings.
//!
//! The binary collects raw values (flags / environment) and hands them to
//! [`AppSettings::validate`]; everything downstream works with plain,
//! already-checked values.

use std::time::Duration;
use tickerpulse_types::ConfigError;

use crate::rate_limit::CooldownSettings;
use crate::upstream::RetryPolicy;

pub const DEFAULT_ALPHA_VANTAGE_URL: &str = "https://www.alphavantage.co/query";
pub const DEFAULT_GEMINI_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash-lite";

/// Raw setting values, before validation.
#[derive(Debug, Clone)]
pub struct RawSettings {
    pub alpha_vantage_api_key: Option<String>,
    pub alpha_vantage_base_url: String,
    pub gemini_api_key: Option<String>,
    pub gemini_base_url: String,
    pub gemini_model: String,
    pub alpha_vantage_cooldown_secs: u64,
    pub gemini_cooldown_secs: u64,
    pub fetch_interval_minutes: u64,
    pub analyze_interval_minutes: u64,
    pub analyze_batch_size: usize,
    pub fetch_window_hours: u32,
    pub http_timeout_secs: u64,
    pub alpha_vantage_calls_per_minute: u32,
    pub gemini_calls_per_minute: u32,
    pub upstream_retry_attempts: u32,
}

impl Default for RawSettings {
    fn default() -> Self {
        Self {
            alpha_vantage_api_key: None,
            alpha_vantage_base_url: DEFAULT_ALPHA_VANTAGE_URL.to_string(),
            gemini_api_key: None,
            gemini_base_url: DEFAULT_GEMINI_URL.to_string(),
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            alpha_vantage_cooldown_secs: 60,
            gemini_cooldown_secs: 60,
            fetch_interval_minutes: 30,
            analyze_interval_minutes: 5,
            analyze_batch_size: 10,
            fetch_window_hours: 6,
            http_timeout_secs: 30,
            alpha_vantage_calls_per_minute: 5,
            gemini_calls_per_minute: 15,
            upstream_retry_attempts: 3,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AlphaVantageSettings {
    pub api_key: String,
    pub base_url: String,
    pub calls_per_minute: u32,
    pub retry: RetryPolicy,
}

#[derive(Debug, Clone)]
pub struct GeminiSettings {
    /// `None` disables classification; each call then fails with `MissingApiKey`.
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub calls_per_minute: u32,
    pub retry: RetryPolicy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobSettings {
    pub fetch_interval: Duration,
    pub analyze_interval: Duration,
    pub analyze_batch_size: usize,
    pub fetch_window_hours: u32,
}

#[derive(Debug, Clone)]
pub struct AppSettings {
    pub alpha_vantage: AlphaVantageSettings,
    pub gemini: GeminiSettings,
    pub cooldowns: CooldownSettings,
    pub jobs: JobSettings,
    pub http_timeout: Duration,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn require_url(field: &str, value: &str) -> Result<String, ConfigError> {
    let value = value.trim().trim_end_matches('/');
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(value.to_string())
    } else {
        Err(ConfigError::invalid(field, format!("'{}' is not an http(s) URL", value)))
    }
}

fn require_positive(field: &str, value: u64) -> Result<u64, ConfigError> {
    if value == 0 {
        return Err(ConfigError::invalid(field, "must be greater than zero"));
    }
    Ok(value)
}

impl AppSettings {
    pub fn validate(raw: RawSettings) -> Result<Self, ConfigError> {
        let api_key = non_empty(raw.alpha_vantage_api_key)
            .ok_or_else(|| ConfigError::Missing { field: "ALPHA_VANTAGE_API_KEY".to_string() })?;

        let gemini_model = raw.gemini_model.trim().to_string();
        if gemini_model.is_empty() {
            return Err(ConfigError::invalid("GEMINI_MODEL", "must not be empty"));
        }

        let av_cooldown = require_positive("ALPHA_VANTAGE_COOLDOWN_SECS", raw.alpha_vantage_cooldown_secs)?;
        let gemini_cooldown = require_positive("GEMINI_COOLDOWN_SECS", raw.gemini_cooldown_secs)?;
        let fetch_minutes = require_positive("FETCH_INTERVAL_MINUTES", raw.fetch_interval_minutes)?;
        let analyze_minutes = require_positive("ANALYZE_INTERVAL_MINUTES", raw.analyze_interval_minutes)?;
        let timeout = require_positive("HTTP_TIMEOUT_SECS", raw.http_timeout_secs)?;
        require_positive("ALPHA_VANTAGE_CALLS_PER_MINUTE", raw.alpha_vantage_calls_per_minute.into())?;
        require_positive("GEMINI_CALLS_PER_MINUTE", raw.gemini_calls_per_minute.into())?;

        if raw.upstream_retry_attempts == 0 || raw.upstream_retry_attempts > 10 {
            return Err(ConfigError::invalid("UPSTREAM_RETRY_ATTEMPTS", "must be between 1 and 10"));
        }
        let retry = RetryPolicy::default().with_attempts(raw.upstream_retry_attempts);

        if raw.analyze_batch_size == 0 || raw.analyze_batch_size > 100 {
            return Err(ConfigError::invalid("ANALYZE_BATCH_SIZE", "must be between 1 and 100"));
        }
        if raw.fetch_window_hours == 0 || raw.fetch_window_hours > 168 {
            return Err(ConfigError::invalid("FETCH_WINDOW_HOURS", "must be between 1 and 168"));
        }

        Ok(Self {
            alpha_vantage: AlphaVantageSettings {
                api_key,
                base_url: require_url("ALPHA_VANTAGE_BASE_URL", &raw.alpha_vantage_base_url)?,
                calls_per_minute: raw.alpha_vantage_calls_per_minute,
                retry,
            },
            gemini: GeminiSettings {
                api_key: non_empty(raw.gemini_api_key),
                base_url: require_url("GEMINI_BASE_URL", &raw.gemini_base_url)?,
                model: gemini_model,
                calls_per_minute: raw.gemini_calls_per_minute,
                retry,
            },
            cooldowns: CooldownSettings {
                gemini: Duration::from_secs(gemini_cooldown),
                alpha_vantage: Duration::from_secs(av_cooldown),
            },
            jobs: JobSettings {
                fetch_interval: Duration::from_secs(fetch_minutes * 60),
                analyze_interval: Duration::from_secs(analyze_minutes * 60),
                analyze_batch_size: raw.analyze_batch_size,
                fetch_window_hours: raw.fetch_window_hours,
            },
            http_timeout: Duration::from_secs(timeout),
        })
    }
}
