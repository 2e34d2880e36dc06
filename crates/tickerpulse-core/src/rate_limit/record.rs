use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tickerpulse_types::{CooldownStatus, TrackedService};

use super::clock::Clock;
use super::{duration_to_secs_ceil, DEFAULT_COOLDOWN};

#[derive(Debug, Default)]
struct CooldownState {
    cooldown_until: Option<DateTime<Utc>>,
    last_message: Option<String>,
}

impl CooldownState {
    /// Lazy expiry: drops a passed deadline, keeps the message.
    /// Returns true when the deadline was dropped by this call.
    fn expire(&mut self, now: DateTime<Utc>) -> bool {
        match self.cooldown_until {
            Some(until) if now >= until => {
                self.cooldown_until = None;
                true
            }
            _ => false,
        }
    }

    fn remaining(&self, now: DateTime<Utc>) -> Duration {
        self.cooldown_until
            .and_then(|until| (until - now).to_std().ok())
            .unwrap_or(Duration::ZERO)
    }
}

/// Cooldown state of one tracked service.
///
/// Every operation takes the record's single lock for its whole duration, so
/// operations on one record are linearizable and `status()` is never torn.
pub struct CooldownRecord {
    service: TrackedService,
    default_cooldown: Duration,
    clock: Arc<dyn Clock>,
    state: Mutex<CooldownState>,
}

impl CooldownRecord {
    pub fn new(service: TrackedService, default_cooldown: Duration, clock: Arc<dyn Clock>) -> Self {
        // A zero window could never be "strictly in the future".
        let default_cooldown =
            if default_cooldown.is_zero() { DEFAULT_COOLDOWN } else { default_cooldown };
        Self { service, default_cooldown, clock, state: Mutex::new(CooldownState::default()) }
    }

    pub fn service(&self) -> TrackedService {
        self.service
    }

    pub fn default_cooldown(&self) -> Duration {
        self.default_cooldown
    }

    /// True unless a cooldown deadline is still ahead of now.
    pub fn is_available(&self) -> bool {
        let now = self.clock.now();
        let expired = {
            let mut state = self.state.lock();
            let expired = state.expire(now);
            if state.cooldown_until.is_some() {
                return false;
            }
            expired
        };
        if expired {
            tracing::debug!(service = %self.service, "[RateLimit] Cooldown expired");
        }
        true
    }

    /// Start (or restart) a cooldown window and record why.
    ///
    /// `None` or a zero duration uses the record's default. The new deadline
    /// replaces any existing one; windows never stack. Returns the deadline.
    pub fn enter_cooldown(&self, message: impl Into<String>, duration: Option<Duration>) -> DateTime<Utc> {
        let message = message.into();
        let window = duration.filter(|d| !d.is_zero()).unwrap_or(self.default_cooldown);
        let step = chrono::Duration::from_std(window).unwrap_or(chrono::Duration::seconds(60));

        let until = {
            let mut state = self.state.lock();
            let now = self.clock.now();
            let until = now.checked_add_signed(step).unwrap_or(DateTime::<Utc>::MAX_UTC);
            state.cooldown_until = Some(until);
            state.last_message = Some(message.clone());
            until
        };

        tracing::warn!(
            service = %self.service,
            cooldown_secs = duration_to_secs_ceil(window),
            until = %until.to_rfc3339(),
            "[RateLimit] {} entering cooldown: {}",
            self.service.display_name(),
            message
        );
        until
    }

    /// Make the service available now. Keeps the last message. Idempotent.
    pub fn clear_cooldown(&self) {
        let was_active = {
            let mut state = self.state.lock();
            let now = self.clock.now();
            let active = state.cooldown_until.is_some_and(|until| until > now);
            state.cooldown_until = None;
            active
        };
        if was_active {
            tracing::info!(service = %self.service, "[RateLimit] Cooldown cleared for {}", self.service.display_name());
        }
    }

    /// Time left in the current cooldown, zero when available.
    pub fn remaining_cooldown(&self) -> Duration {
        let now = self.clock.now();
        let mut state = self.state.lock();
        state.expire(now);
        state.remaining(now)
    }

    /// Time left in an active cooldown, `None` when available.
    ///
    /// Availability and remaining time come from one locked read, so a
    /// concurrent clear or expiry can't yield an active cooldown of zero.
    pub fn active_cooldown(&self) -> Option<Duration> {
        let now = self.clock.now();
        let mut state = self.state.lock();
        state.expire(now);
        state.cooldown_until.map(|_| state.remaining(now))
    }

    /// Whole seconds left, rounded up so an active cooldown never reports 0.
    pub fn remaining_cooldown_secs(&self) -> u64 {
        duration_to_secs_ceil(self.remaining_cooldown())
    }

    /// Consistent snapshot of all three fields, taken under one lock.
    pub fn status(&self) -> CooldownStatus {
        let now = self.clock.now();
        let mut state = self.state.lock();
        state.expire(now);
        CooldownStatus {
            available: state.cooldown_until.is_none(),
            cooldown_until: state.cooldown_until,
            message: state.last_message.clone(),
        }
    }

    pub fn last_message(&self) -> Option<String> {
        self.state.lock().last_message.clone()
    }
}

impl std::fmt::Debug for CooldownRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CooldownRecord")
            .field("service", &self.service)
            .field("default_cooldown", &self.default_cooldown)
            .field("state", &*self.state.lock())
            .finish()
    }
}
