//! Call discipline shared by the upstream clients.
//!
//! Each client paces its own requests with a [`CallPacer`] and retries
//! transient failures under a [`RetryPolicy`]. Both sit inside the cooldown
//! guard: a skipped call is never paced, never retried.

mod pacing;
mod retry;


pub use pacing::CallPacer;
pub use retry::{with_retry, RetryPolicy};
