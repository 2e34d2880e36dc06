use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use std::time::Duration;
use tickerpulse_types::JobKind;

#[derive(Debug, Clone, Serialize)]
pub struct ScheduledJobStatus {
    pub id: JobKind,
    pub name: &'static str,
    pub interval_secs: u64,
    pub next_run: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SchedulerStatus {
    pub running: bool,
    pub jobs: Vec<ScheduledJobStatus>,
}

#[derive(Default)]
struct Inner {
    running: bool,
    jobs: Vec<ScheduledJobStatus>,
}

/// What the scheduler loops report about themselves.
#[derive(Default)]
pub struct SchedulerState {
    inner: RwLock<Inner>,
}

impl SchedulerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub(super) fn register(&self, id: JobKind, name: &'static str, interval: Duration) {
        let mut inner = self.inner.write();
        inner.running = true;
        inner.jobs.retain(|job| job.id != id);
        inner.jobs.push(ScheduledJobStatus { id, name, interval_secs: interval.as_secs(), next_run: None });
    }

    pub(super) fn set_next_run(&self, id: JobKind, next_run: DateTime<Utc>) {
        if let Some(job) = self.inner.write().jobs.iter_mut().find(|job| job.id == id) {
            job.next_run = Some(next_run);
        }
    }

    pub(super) fn mark_stopped(&self) {
        let mut inner = self.inner.write();
        inner.running = false;
        for job in &mut inner.jobs {
            job.next_run = None;
        }
    }

    pub fn status(&self) -> SchedulerStatus {
        let inner = self.inner.read();
        SchedulerStatus { running: inner.running, jobs: inner.jobs.clone() }
    }

    pub fn is_running(&self) -> bool {
        self.inner.read().running
    }
}
