use chrono::Utc;
use dashmap::DashMap;
use std::time::Instant;
use tickerpulse_types::{JobInfo, JobKind, JobReport, JobStatus};

use crate::error::{AppError, AppResult};

/// Proof that a job was started; hand it back to [`JobTracker::complete`].
#[derive(Debug)]
pub struct JobRun {
    kind: JobKind,
    started: Instant,
}

impl JobRun {
    pub fn kind(&self) -> JobKind {
        self.kind
    }
}

/// Tracks the fixed set of jobs. At most one run per kind at a time.
pub struct JobTracker {
    jobs: DashMap<JobKind, JobInfo>,
}

impl JobTracker {
    pub fn new() -> Self {
        let jobs = DashMap::new();
        for kind in JobKind::ALL {
            jobs.insert(kind, JobInfo::idle(kind));
        }
        Self { jobs }
    }

    /// Mark `kind` running, or fail if a run is already in progress.
    pub fn try_start(&self, kind: JobKind) -> AppResult<JobRun> {
        let mut info = self.jobs.entry(kind).or_insert_with(|| JobInfo::idle(kind));
        if info.status == JobStatus::Running {
            return Err(AppError::JobRunning(kind.as_str().to_string()));
        }
        info.status = JobStatus::Running;
        info.last_run = Some(Utc::now());
        info.last_error = None;
        Ok(JobRun { kind, started: Instant::now() })
    }

    pub fn complete(&self, run: JobRun, result: &AppResult<JobReport>) {
        let duration = run.started.elapsed().as_secs_f64();
        let mut info = self.jobs.entry(run.kind).or_insert_with(|| JobInfo::idle(run.kind));
        info.last_duration_secs = Some(duration);
        match result {
            Ok(report) => {
                info.status = JobStatus::Idle;
                info.last_result = Some(report.clone());
                info.last_error = None;
            }
            Err(e) => {
                info.status = JobStatus::Failed;
                info.last_result = None;
                info.last_error = Some(e.to_string());
            }
        }
    }

    pub fn is_running(&self, kind: JobKind) -> bool {
        self.jobs.get(&kind).is_some_and(|info| info.status == JobStatus::Running)
    }

    pub fn get(&self, kind: JobKind) -> Option<JobInfo> {
        self.jobs.get(&kind).map(|info| info.clone())
    }

    /// All jobs in declaration order.
    pub fn all(&self) -> Vec<JobInfo> {
        JobKind::ALL.iter().filter_map(|kind| self.get(*kind)).collect()
    }
}

impl Default for JobTracker {
    fn default() -> Self {
        Self::new()
    }
}
