use std::sync::Arc;
use std::time::Duration;
use tickerpulse_types::{ServiceStatusMap, TrackedService};

use super::clock::{Clock, SystemClock};
use super::guard::CallGuard;
use super::record::CooldownRecord;
use super::DEFAULT_COOLDOWN;

/// Per-service default cooldown windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CooldownSettings {
    pub gemini: Duration,
    pub alpha_vantage: Duration,
}

impl Default for CooldownSettings {
    fn default() -> Self {
        Self { gemini: DEFAULT_COOLDOWN, alpha_vantage: DEFAULT_COOLDOWN }
    }
}

/// Owns exactly one [`CooldownRecord`] per [`TrackedService`].
///
/// Built once by the composition root and shared as `Arc<RateLimitManager>`
/// with request handlers, upstream clients and schedulers.
#[derive(Debug)]
pub struct RateLimitManager {
    gemini: CooldownRecord,
    alpha_vantage: CooldownRecord,
}

impl RateLimitManager {
    pub fn new(settings: CooldownSettings) -> Self {
        Self::with_clock(settings, Arc::new(SystemClock))
    }

    pub fn with_clock(settings: CooldownSettings, clock: Arc<dyn Clock>) -> Self {
        Self {
            gemini: CooldownRecord::new(TrackedService::Gemini, settings.gemini, Arc::clone(&clock)),
            alpha_vantage: CooldownRecord::new(TrackedService::AlphaVantage, settings.alpha_vantage, clock),
        }
    }

    pub fn record(&self, service: TrackedService) -> &CooldownRecord {
        match service {
            TrackedService::Gemini => &self.gemini,
            TrackedService::AlphaVantage => &self.alpha_vantage,
        }
    }

    pub fn gemini(&self) -> &CooldownRecord {
        &self.gemini
    }

    pub fn alpha_vantage(&self) -> &CooldownRecord {
        &self.alpha_vantage
    }

    pub fn guard(&self, service: TrackedService) -> CallGuard<'_> {
        CallGuard::new(self.record(service))
    }

    /// Snapshot of every tracked service in tracking order.
    pub fn all_status(&self) -> ServiceStatusMap {
        ServiceStatusMap::new(
            TrackedService::ALL
                .iter()
                .map(|service| (*service, self.record(*service).status()))
                .collect(),
        )
    }
}

impl Default for RateLimitManager {
    fn default() -> Self {
        Self::new(CooldownSettings::default())
    }
}
