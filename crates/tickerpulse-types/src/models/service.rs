//! Tracked upstream services and their cooldown status snapshots.

use chrono::{DateTime, Utc};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// External APIs whose call budget is protected by a cooldown.
///
/// The set is closed: adding a service means adding a variant, and every
/// `match` over it must be updated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackedService {
    /// Sentiment model (Google Gemini)
    Gemini,
    /// News provider (Alpha Vantage NEWS_SENTIMENT)
    AlphaVantage,
}

impl TrackedService {
    /// Tracking order. Status output follows this order.
    pub const ALL: [TrackedService; 2] = [TrackedService::Gemini, TrackedService::AlphaVantage];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::AlphaVantage => "alpha_vantage",
        }
    }

    /// Human-readable name used in log lines and user-facing messages.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Gemini => "Gemini",
            Self::AlphaVantage => "Alpha Vantage",
        }
    }
}

impl fmt::Display for TrackedService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when parsing a service name that is not tracked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownService(pub String);

impl fmt::Display for UnknownService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown service '{}'", self.0)
    }
}

impl std::error::Error for UnknownService {}

impl FromStr for TrackedService {
    type Err = UnknownService;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" => Ok(Self::Gemini),
            "alpha_vantage" | "alpha-vantage" | "alphavantage" => Ok(Self::AlphaVantage),
            _ => Err(UnknownService(s.to_string())),
        }
    }
}

/// Point-in-time cooldown state of one service.
///
/// All three fields come from a single lock acquisition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CooldownStatus {
    pub available: bool,
    pub cooldown_until: Option<DateTime<Utc>>,
    /// Reason for the most recent cooldown; survives natural expiry.
    pub message: Option<String>,
}

impl CooldownStatus {
    pub fn available() -> Self {
        Self { available: true, cooldown_until: None, message: None }
    }
}

/// Status of every tracked service, serialized as a JSON object in tracking order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ServiceStatusMap(Vec<(TrackedService, CooldownStatus)>);

impl ServiceStatusMap {
    pub fn new(entries: Vec<(TrackedService, CooldownStatus)>) -> Self {
        Self(entries)
    }

    pub fn get(&self, service: TrackedService) -> Option<&CooldownStatus> {
        self.0.iter().find(|(s, _)| *s == service).map(|(_, status)| status)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(TrackedService, CooldownStatus)> {
        self.0.iter()
    }

    pub fn services(&self) -> Vec<TrackedService> {
        self.0.iter().map(|(s, _)| *s).collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when every service currently accepts calls.
    pub fn all_available(&self) -> bool {
        self.0.iter().all(|(_, status)| status.available)
    }
}

impl Serialize for ServiceStatusMap {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (service, status) in &self.0 {
            map.serialize_entry(service.as_str(), status)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ServiceStatusMap {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct StatusMapVisitor;

        impl<'de> Visitor<'de> for StatusMapVisitor {
            type Value = ServiceStatusMap;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of service name to cooldown status")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(2));
                while let Some((service, status)) =
                    access.next_entry::<TrackedService, CooldownStatus>()?
                {
                    entries.push((service, status));
                }
                Ok(ServiceStatusMap(entries))
            }
        }

        deserializer.deserialize_map(StatusMapVisitor)
    }
}

/// Why a guarded call did not reach the upstream service.
///
/// Skips are expected, recoverable outcomes and are never surfaced as errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkipReason {
    /// Service was already cooling down when the call was attempted.
    Cooldown { service: TrackedService, remaining_secs: u64 },
    /// The call itself hit a rate limit and started a fresh cooldown.
    RateLimitDetected { service: TrackedService, message: String, cooldown_secs: u64 },
}

impl SkipReason {
    pub fn service(&self) -> TrackedService {
        match self {
            Self::Cooldown { service, .. } | Self::RateLimitDetected { service, .. } => *service,
        }
    }

    /// Approximate wait before the service accepts calls again.
    pub fn retry_after_secs(&self) -> u64 {
        match self {
            Self::Cooldown { remaining_secs, .. } => *remaining_secs,
            Self::RateLimitDetected { cooldown_secs, .. } => *cooldown_secs,
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cooldown { service, remaining_secs } => write!(
                f,
                "{} temporarily unavailable due to upstream rate limiting, retry after approximately {}s",
                service.display_name(),
                remaining_secs
            ),
            Self::RateLimitDetected { service, message, cooldown_secs } => write!(
                f,
                "{} rate limit detected ({}), retry after approximately {}s",
                service.display_name(),
                message,
                cooldown_secs
            ),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_service_names() {
        assert_eq!(TrackedService::Gemini.as_str(), "gemini");
        assert_eq!(TrackedService::AlphaVantage.as_str(), "alpha_vantage");
        assert_eq!("alpha_vantage".parse::<TrackedService>(), Ok(TrackedService::AlphaVantage));
        assert_eq!("Gemini".parse::<TrackedService>(), Ok(TrackedService::Gemini));
        assert!("reddit".parse::<TrackedService>().is_err());
    }

    #[test]
    fn test_skip_reason_user_message() {
        let reason = SkipReason::Cooldown { service: TrackedService::AlphaVantage, remaining_secs: 42 };
        assert_eq!(reason.retry_after_secs(), 42);
        let msg = reason.to_string();
        assert!(msg.contains("Alpha Vantage"));
        assert!(msg.contains("retry after approximately 42s"));
    }

    #[test]
    fn test_status_map_serializes_in_tracking_order() {
        let map = ServiceStatusMap::new(vec![
            (TrackedService::Gemini, CooldownStatus::available()),
            (
                TrackedService::AlphaVantage,
                CooldownStatus {
                    available: false,
                    cooldown_until: None,
                    message: Some("Rate limit exceeded (429)".to_string()),
                },
            ),
        ]);

        let json = serde_json::to_string(&map).unwrap();
        let gemini_pos = json.find("\"gemini\"").unwrap();
        let alpha_pos = json.find("\"alpha_vantage\"").unwrap();
        assert!(gemini_pos < alpha_pos);
        assert!(json.contains("\"message\":\"Rate limit exceeded (429)\""));
        assert!(json.contains("\"cooldown_until\":null"));

        let back: ServiceStatusMap = serde_json::from_str(&json).unwrap();
        assert_eq!(back, map);
        assert!(!back.all_available());
    }
}
