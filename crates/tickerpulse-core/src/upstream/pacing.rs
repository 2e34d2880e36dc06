use parking_lot::Mutex;
use std::collections::VecDeque;
use std::time::Duration;
use tokio::time::{sleep, Instant};

/// Sliding-window limit on outbound calls: at most `max_calls` per `period`.
///
/// `acquire` waits for a free slot instead of failing, so callers are slowed
/// down rather than rejected.
#[derive(Debug)]
pub struct CallPacer {
    label: &'static str,
    max_calls: usize,
    period: Duration,
    calls: Mutex<VecDeque<Instant>>,
}

impl CallPacer {
    pub fn new(label: &'static str, max_calls: u32, period: Duration) -> Self {
        let max_calls = (max_calls as usize).max(1);
        Self { label, max_calls, period, calls: Mutex::new(VecDeque::with_capacity(max_calls)) }
    }

    pub fn per_minute(label: &'static str, max_calls: u32) -> Self {
        Self::new(label, max_calls, Duration::from_secs(60))
    }

    /// Take a slot now, or report how long until the oldest one frees up.
    fn reserve(&self) -> Result<(), Duration> {
        let now = Instant::now();
        let mut calls = self.calls.lock();
        while calls.front().is_some_and(|&at| now.duration_since(at) >= self.period) {
            calls.pop_front();
        }
        if calls.len() < self.max_calls {
            calls.push_back(now);
            return Ok(());
        }
        let oldest = calls.front().copied().unwrap_or(now);
        Err(self.period.saturating_sub(now.duration_since(oldest)))
    }

    /// Wait for a slot. Returns true when the caller had to wait.
    pub async fn acquire(&self) -> bool {
        let mut waited = false;
        while let Err(wait) = self.reserve() {
            tracing::debug!(
                "[{}] {} calls per {}s reached, waiting {}ms",
                self.label,
                self.max_calls,
                self.period.as_secs(),
                wait.as_millis()
            );
            waited = true;
            sleep(wait).await;
        }
        waited
    }

    /// Calls counted in the current window.
    pub fn in_window(&self) -> usize {
        let now = Instant::now();
        self.calls.lock().iter().filter(|&&at| now.duration_since(at) < self.period).count()
    }
}
