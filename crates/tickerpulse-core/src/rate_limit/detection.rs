//! Recognizing upstream quota / rate-limit responses.
//!
//! Detection is textual and therefore fragile against upstream wording
//! changes; all matching lives here so it can be hardened in one place.

/// Case-insensitive markers that identify a quota or rate-limit condition.
const RATE_LIMIT_MARKERS: &[&str] = &[
    "rate limit",
    "quota exceeded",
    "quota",
    "resource_exhausted",
    "too many requests",
    "call frequency",
    "429",
];

/// A recognized rate-limit condition, ready to be turned into a cooldown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitSignal {
    status: Option<u16>,
    detail: String,
}

impl RateLimitSignal {
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    /// Human-readable reason stored as the cooldown message.
    pub fn message(&self) -> String {
        if self.status == Some(429) {
            return "Rate limit exceeded (429)".to_string();
        }
        let detail = self.detail.trim();
        if detail.is_empty() {
            "Rate limit exceeded".to_string()
        } else {
            format!("Rate limit exceeded: {}", truncate(detail, 200))
        }
    }
}

/// Classify a response (or error text) as a rate-limit signal.
///
/// `status` is the HTTP status when one is known. `text` is a response body,
/// an informational field or an error message.
pub fn detect_rate_limit(status: Option<u16>, text: &str) -> Option<RateLimitSignal> {
    if status == Some(429) {
        return Some(RateLimitSignal { status, detail: text.to_string() });
    }
    if contains_rate_limit_marker(text) {
        return Some(RateLimitSignal { status, detail: text.to_string() });
    }
    None
}

pub fn contains_rate_limit_marker(text: &str) -> bool {
    if text.is_empty() {
        return false;
    }
    let lower = text.to_lowercase();
    RATE_LIMIT_MARKERS.iter().any(|marker| lower.contains(marker))
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_429_status_always_detected() {
        let signal = detect_rate_limit(Some(429), "").unwrap();
        assert_eq!(signal.message(), "Rate limit exceeded (429)");
        assert_eq!(signal.status(), Some(429));
    }

    #[test]
    fn test_marker_detection_is_case_insensitive() {
        assert!(detect_rate_limit(None, "Quota Exceeded for project").is_some());
        assert!(detect_rate_limit(Some(400), "RESOURCE_EXHAUSTED").is_some());
        assert!(detect_rate_limit(
            None,
            "Thank you for using Alpha Vantage! Our standard API call frequency is 5 calls per minute"
        )
        .is_some());
        assert!(detect_rate_limit(None, "Error 429 Too Many Requests").is_some());
    }

    #[test]
    fn test_ordinary_failures_not_detected() {
        assert!(detect_rate_limit(Some(500), "internal error").is_none());
        assert!(detect_rate_limit(None, "connection refused").is_none());
        assert!(detect_rate_limit(Some(401), "API key not valid").is_none());
        assert!(detect_rate_limit(None, "").is_none());
    }

    #[test]
    fn test_message_carries_detail() {
        let signal = detect_rate_limit(None, "  daily quota reached ").unwrap();
        assert_eq!(signal.message(), "Rate limit exceeded: daily quota reached");

        let long = format!("quota {}", "x".repeat(500));
        let msg = detect_rate_limit(None, &long).unwrap().message();
        assert!(msg.ends_with("..."));
        assert!(msg.chars().count() < 240);
    }
}
