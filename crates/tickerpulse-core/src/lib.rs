//! # TickerPulse Core
//!
//! Rate-limit coordination and the upstream call paths it protects.
//!
//! ```text
//! tickerpulse-core/src/
//! ├── rate_limit/   # cooldown records, manager, detection, call guard
//! ├── news/         # Alpha Vantage NEWS_SENTIMENT client (guarded)
//! ├── sentiment/    # Gemini classifier (guarded)
//! ├── upstream/     # retry with backoff, per-service call pacing
//! ├── scoring.rs    # per-ticker aggregation and trading signal
//! ├── store/        # watchlist + news store
//! ├── jobs/         # fetch / analyze batches, job tracker
//! └── config.rs     # validated settings
//! ```
//!
//! One `RateLimitManager` per process, built by the binary and passed as
//! `Arc<RateLimitManager>` to everything that calls an upstream service.

#![cfg_attr(
    test,
    allow(clippy::panic, clippy::print_stdout, clippy::float_cmp, clippy::assertions_on_result_states)
)]

pub mod config;
pub mod error;
pub mod http;
pub mod jobs;
pub mod news;
pub mod rate_limit;
pub mod scoring;
pub mod sentiment;
pub mod store;
pub mod upstream;

pub use config::AppSettings;
pub use error::{AppError, AppResult};
pub use rate_limit::{CallGuard, CooldownRecord, CooldownSettings, GuardOutcome, RateLimitManager};
