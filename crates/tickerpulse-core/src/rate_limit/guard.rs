use tickerpulse_types::{SkipReason, TrackedService};

use super::detection::RateLimitSignal;
use super::duration_to_secs_ceil;
use super::record::CooldownRecord;

/// Result of a guarded upstream call.
///
/// `Skipped` is an expected outcome (service cooling down), not a failure.
#[derive(Debug, Clone, PartialEq)]
pub enum GuardOutcome<T> {
    Completed(T),
    Skipped(SkipReason),
}

impl<T> GuardOutcome<T> {
    pub fn completed(self) -> Option<T> {
        match self {
            Self::Completed(value) => Some(value),
            Self::Skipped(_) => None,
        }
    }

    pub fn skip_reason(&self) -> Option<&SkipReason> {
        match self {
            Self::Completed(_) => None,
            Self::Skipped(reason) => Some(reason),
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> GuardOutcome<U> {
        match self {
            Self::Completed(value) => GuardOutcome::Completed(f(value)),
            Self::Skipped(reason) => GuardOutcome::Skipped(reason),
        }
    }
}

/// Check-then-act wrapper around one service's cooldown record.
///
/// Success never touches the record; only `report` mutates it.
#[derive(Debug, Clone, Copy)]
pub struct CallGuard<'a> {
    record: &'a CooldownRecord,
}

impl<'a> CallGuard<'a> {
    pub fn new(record: &'a CooldownRecord) -> Self {
        Self { record }
    }

    pub fn service(&self) -> TrackedService {
        self.record.service()
    }

    /// `Err(SkipReason::Cooldown)` when the service must not be called now.
    pub fn check(&self) -> Result<(), SkipReason> {
        let Some(remaining) = self.record.active_cooldown() else {
            return Ok(());
        };
        let remaining_secs = duration_to_secs_ceil(remaining).max(1);
        tracing::info!(
            service = %self.service(),
            remaining_secs,
            "[RateLimit] Skipping {} call: in cooldown, {}s remaining",
            self.service().display_name(),
            remaining_secs
        );
        Err(SkipReason::Cooldown { service: self.service(), remaining_secs })
    }

    /// Record a detected rate limit: start a cooldown and produce the skip.
    pub fn report(&self, signal: &RateLimitSignal) -> SkipReason {
        let message = signal.message();
        tracing::warn!(
            service = %self.service(),
            status = ?signal.status(),
            "[RateLimit] Rate limit detected on {} call",
            self.service().display_name()
        );
        self.record.enter_cooldown(message.clone(), None);
        SkipReason::RateLimitDetected {
            service: self.service(),
            message,
            cooldown_secs: duration_to_secs_ceil(self.record.default_cooldown()),
        }
    }
}
