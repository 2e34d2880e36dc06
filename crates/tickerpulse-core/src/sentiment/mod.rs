//! Gemini sentiment classifier, guarded by the `gemini` cooldown.

mod prompt;


pub use prompt::{build_prompt, news_text};

use serde_json::{json, Value};
use std::sync::Arc;
use tickerpulse_types::{SentimentAnalysis, SentimentError, TrackedService};

use crate::config::GeminiSettings;
use crate::rate_limit::{detect_rate_limit, GuardOutcome, RateLimitManager};
use crate::upstream::{with_retry, CallPacer, RetryPolicy};

pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
    limits: Arc<RateLimitManager>,
    pacer: CallPacer,
    retry: RetryPolicy,
}

impl GeminiClient {
    pub fn new(settings: &GeminiSettings, http: reqwest::Client, limits: Arc<RateLimitManager>) -> Self {
        Self {
            http,
            base_url: settings.base_url.clone(),
            model: settings.model.clone(),
            api_key: settings.api_key.clone(),
            limits,
            pacer: CallPacer::per_minute("Analyzer", settings.calls_per_minute),
            retry: settings.retry,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Classify one news text for `ticker`.
    ///
    /// `Skipped` means "no analysis this round" (cooldown or a fresh rate-limit
    /// detection); the item stays pending. Transport errors and 5xx answers
    /// are retried with backoff before they surface.
    pub async fn classify(
        &self,
        ticker: &str,
        text: &str,
    ) -> Result<GuardOutcome<SentimentAnalysis>, SentimentError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(SentimentError::MissingApiKey);
        };

        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let body = json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": build_prompt(ticker, text) }]
            }],
            "generationConfig": { "responseMimeType": "application/json" }
        });
        let (url, body) = (url.as_str(), &body);

        with_retry(self.retry, "Analyzer", SentimentError::is_transient, move || {
            self.classify_once(ticker, api_key, url, body)
        })
        .await
    }

    async fn classify_once(
        &self,
        ticker: &str,
        api_key: &str,
        url: &str,
        body: &Value,
    ) -> Result<GuardOutcome<SentimentAnalysis>, SentimentError> {
        let guard = self.limits.guard(TrackedService::Gemini);
        if let Err(reason) = guard.check() {
            return Ok(GuardOutcome::Skipped(reason));
        }
        if self.pacer.acquire().await {
            if let Err(reason) = guard.check() {
                return Ok(GuardOutcome::Skipped(reason));
            }
        }

        tracing::debug!("[Analyzer] Gemini sentiment analysis for {}", ticker);
        let response = self
            .http
            .post(url)
            .query(&[("key", api_key)])
            .json(body)
            .send()
            .await
            .map_err(|e| SentimentError::Network { message: e.to_string() })?;

        let status = response.status().as_u16();
        let raw = response.text().await.map_err(|e| SentimentError::Network { message: e.to_string() })?;

        if !(200..300).contains(&status) {
            let message = error_message(&raw);
            if let Some(signal) = detect_rate_limit(Some(status), &message) {
                return Ok(GuardOutcome::Skipped(guard.report(&signal)));
            }
            tracing::warn!("[Analyzer] Gemini HTTP {} for {}: {}", status, ticker, message);
            return Err(SentimentError::Http { status, message });
        }

        let data: Value = serde_json::from_str(&raw)
            .map_err(|e| SentimentError::InvalidResponse { message: e.to_string() })?;
        let text = candidate_text(&data).ok_or(SentimentError::EmptyResponse)?;

        parse_analysis(&text).map(GuardOutcome::Completed)
    }
}

/// `error.message` (plus `error.status`) from a Gemini error body, or the raw body.
fn error_message(raw: &str) -> String {
    let Ok(data) = serde_json::from_str::<Value>(raw) else {
        return raw.chars().take(300).collect();
    };
    let error = &data["error"];
    match (error["status"].as_str(), error["message"].as_str()) {
        (Some(status), Some(message)) => format!("{}: {}", status, message),
        (None, Some(message)) => message.to_string(),
        _ => raw.chars().take(300).collect(),
    }
}

fn candidate_text(data: &Value) -> Option<String> {
    let parts = data["candidates"].get(0)?["content"]["parts"].as_array()?;
    let text: String = parts.iter().filter_map(|p| p["text"].as_str()).collect();
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Parse the model's JSON answer, tolerating a surrounding markdown fence.
pub fn parse_analysis(text: &str) -> Result<SentimentAnalysis, SentimentError> {
    let trimmed = text.trim();
    let unfenced = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|s| s.strip_suffix("```"))
        .unwrap_or(trimmed)
        .trim();

    let mut analysis: SentimentAnalysis = serde_json::from_str(unfenced)
        .map_err(|e| SentimentError::InvalidResponse { message: e.to_string() })?;
    analysis.justification = analysis.justification.trim().to_string();
    Ok(analysis)
}
