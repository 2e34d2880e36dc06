use std::fmt;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info};

/// Bounded exponential backoff for transient upstream failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, the first call included. `1` disables retrying.
    pub max_attempts: u32,
    /// Delay after the first failure, in milliseconds.
    pub base_ms: u64,
    /// Ceiling for any single delay, in milliseconds.
    pub max_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_attempts: 3, base_ms: 1_000, max_ms: 10_000 }
    }
}

impl RetryPolicy {
    pub const fn none() -> Self {
        Self { max_attempts: 1, base_ms: 0, max_ms: 0 }
    }

    pub fn with_attempts(self, max_attempts: u32) -> Self {
        Self { max_attempts: max_attempts.max(1), ..self }
    }

    /// Delay before the next attempt, after `failures` failed ones.
    pub fn delay_after(&self, failures: u32) -> Duration {
        let exponent = failures.saturating_sub(1);
        let ms = self.base_ms.saturating_mul(2_u64.saturating_pow(exponent)).min(self.max_ms);
        Duration::from_millis(ms)
    }
}

/// Run `attempt` until it succeeds, fails permanently, or attempts run out.
///
/// Only `Err` values accepted by `is_transient` are retried; any `Ok` value
/// (a skipped call included) ends the loop. The last error is returned as is.
pub async fn with_retry<T, E, F, Fut>(
    policy: RetryPolicy,
    label: &str,
    is_transient: impl Fn(&E) -> bool,
    mut attempt: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: fmt::Display,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut failures = 0_u32;
    loop {
        match attempt().await {
            Err(e) if is_transient(&e) && failures + 1 < max_attempts => {
                failures += 1;
                let delay = policy.delay_after(failures);
                info!(
                    "[{}] Retry with exponential backoff: attempt={}/{}, delay={}ms, error={}",
                    label,
                    failures + 1,
                    max_attempts,
                    delay.as_millis(),
                    e
                );
                sleep(delay).await;
            }
            Err(e) => {
                if failures > 0 {
                    debug!("[{}] Giving up after {} attempts: {}", label, failures + 1, e);
                }
                return Err(e);
            }
            ok => return ok,
        }
    }
}
