//! Application State
//!
//! Holds the process-wide rate-limit manager and every component that shares it.

use std::sync::Arc;

use tickerpulse_core::config::JobSettings;
use tickerpulse_core::jobs::{JobContext, JobTracker};
use tickerpulse_core::news::AlphaVantageClient;
use tickerpulse_core::sentiment::GeminiClient;
use tickerpulse_core::store::NewsStore;
use tickerpulse_core::RateLimitManager;

use crate::scheduler::SchedulerState;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub(crate) inner: Arc<AppStateInner>,
}

pub struct AppStateInner {
    pub limits: Arc<RateLimitManager>,
    pub store: Arc<dyn NewsStore>,
    pub news: Arc<AlphaVantageClient>,
    pub sentiment: Arc<GeminiClient>,
    pub jobs: Arc<JobTracker>,
    pub job_settings: JobSettings,
    pub scheduler: Arc<SchedulerState>,
}

impl AppState {
    pub fn new_with_components(
        limits: Arc<RateLimitManager>,
        store: Arc<dyn NewsStore>,
        news: Arc<AlphaVantageClient>,
        sentiment: Arc<GeminiClient>,
        job_settings: JobSettings,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                limits,
                store,
                news,
                sentiment,
                jobs: Arc::new(JobTracker::new()),
                job_settings,
                scheduler: Arc::new(SchedulerState::new()),
            }),
        }
    }

    pub fn limits(&self) -> &RateLimitManager {
        &self.inner.limits
    }

    pub fn store(&self) -> &dyn NewsStore {
        self.inner.store.as_ref()
    }

    pub fn jobs(&self) -> &Arc<JobTracker> {
        &self.inner.jobs
    }

    pub fn job_settings(&self) -> JobSettings {
        self.inner.job_settings
    }

    pub fn scheduler(&self) -> &SchedulerState {
        &self.inner.scheduler
    }

    pub fn job_context(&self) -> JobContext {
        JobContext {
            limits: Arc::clone(&self.inner.limits),
            store: Arc::clone(&self.inner.store),
            news: Arc::clone(&self.inner.news),
            sentiment: Arc::clone(&self.inner.sentiment),
        }
    }
}
