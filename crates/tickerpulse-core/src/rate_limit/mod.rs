//! Cross-service rate-limit coordination.
//!
//! One [`CooldownRecord`] per tracked upstream service, owned by a
//! [`RateLimitManager`]. Expiry is lazy: availability is a pure function of the
//! stored deadline and the current time, evaluated at query time. There is no
//! background timer.
//!
//! Every outbound call path goes through a [`CallGuard`]: check before the call,
//! report a detected rate limit after it.

mod clock;
mod detection;
mod guard;
mod manager;
mod record;


pub use clock::{Clock, ManualClock, SystemClock};
pub use detection::{contains_rate_limit_marker, detect_rate_limit, RateLimitSignal};
pub use guard::{CallGuard, GuardOutcome};
pub use manager::{CooldownSettings, RateLimitManager};
pub use record::CooldownRecord;

use std::time::Duration;

/// Cooldown applied when no per-service override is configured.
pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(60);

pub(crate) fn duration_to_secs_ceil(d: Duration) -> u64 {
    let secs = d.as_secs();
    if d.subsec_nanos() > 0 {
        secs + 1
    } else {
        secs
    }
}
