//! Background Schedulers
//!
//! ## News Fetcher
//! Every `fetch_interval`, fetches the recent news window for all active tickers.
//!
//! ## Analyzer
//! Every `analyze_interval`, classifies one batch of pending news items.
//!
//! Both loops share the job tracker with the API (a manual run of the same job
//! makes the scheduled tick a no-op) and stop when the shutdown signal fires.
//! Cooldown skips are handled inside the jobs; the loops never sleep them out.

mod state;

pub use state::{SchedulerState, SchedulerStatus};

use chrono::Utc;
use std::future::Future;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::state::AppState;
use tickerpulse_core::jobs::{self, JobTracker};
use tickerpulse_core::AppResult;
use tickerpulse_types::{JobKind, JobReport};

/// Running scheduler loops and the signal that stops them.
pub struct SchedulerHandle {
    shutdown: watch::Sender<bool>,
    tasks: Vec<JoinHandle<()>>,
    state: AppState,
}

impl SchedulerHandle {
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        for task in self.tasks {
            if let Err(e) = task.await {
                tracing::warn!("[Scheduler] Task ended abnormally: {}", e);
            }
        }
        self.state.scheduler().mark_stopped();
        tracing::info!("[Scheduler] Stopped");
    }
}

/// Run a job under the tracker, unless a run of the same kind is in progress.
pub async fn run_tracked<F>(tracker: &JobTracker, kind: JobKind, job: F) -> Option<AppResult<JobReport>>
where
    F: Future<Output = AppResult<JobReport>>,
{
    let run = match tracker.try_start(kind) {
        Ok(run) => run,
        Err(e) => {
            tracing::info!("[Scheduler] Skipping tick: {}", e);
            return None;
        }
    };
    let result = job.await;
    match &result {
        Ok(report) => tracing::info!("[Scheduler] {} finished: {}", kind.as_str(), report.summary()),
        Err(e) => tracing::error!("[Scheduler] {} failed: {}", kind.as_str(), e),
    }
    tracker.complete(run, &result);
    Some(result)
}

pub fn start(state: AppState) -> SchedulerHandle {
    let (shutdown, _) = watch::channel(false);
    let settings = state.job_settings();

    let fetcher = spawn_loop(
        state.clone(),
        shutdown.subscribe(),
        JobKind::FetchAllNews,
        "News Fetcher",
        settings.fetch_interval,
        move |state| async move {
            let ctx = state.job_context();
            run_tracked(state.jobs(), JobKind::FetchAllNews, jobs::fetch_all_news(&ctx, settings.fetch_window_hours))
                .await;
        },
    );

    let analyzer = spawn_loop(
        state.clone(),
        shutdown.subscribe(),
        JobKind::AnalyzePending,
        "News Analyzer",
        settings.analyze_interval,
        move |state| async move {
            let ctx = state.job_context();
            run_tracked(state.jobs(), JobKind::AnalyzePending, jobs::analyze_pending(&ctx, settings.analyze_batch_size))
                .await;
        },
    );

    tracing::info!(
        "[Scheduler] Started: news fetch every {}s, analysis every {}s",
        settings.fetch_interval.as_secs(),
        settings.analyze_interval.as_secs()
    );
    SchedulerHandle { shutdown, tasks: vec![fetcher, analyzer], state }
}

fn spawn_loop<F, Fut>(
    state: AppState,
    mut shutdown: watch::Receiver<bool>,
    kind: JobKind,
    name: &'static str,
    every: Duration,
    tick: F,
) -> JoinHandle<()>
where
    F: Fn(AppState) -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    state.scheduler().register(kind, name, every);
    tokio::spawn(async move {
        tracing::info!("[Scheduler] {} started", name);
        // First run immediately, then every `every`
        let mut ticker = interval_at(Instant::now(), every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    tick(state.clone()).await;
                    let next = chrono::Duration::from_std(every).map(|d| Utc::now() + d);
                    if let Ok(next) = next {
                        state.scheduler().set_next_run(kind, next);
                    }
                }
                _ = shutdown.changed() => {
                    tracing::info!("[Scheduler] {} stopping", name);
                    break;
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::test_app_state;

    #[tokio::test]
    async fn test_run_tracked_skips_while_running() {
        let tracker = JobTracker::new();
        let run = tracker.try_start(JobKind::FetchAllNews).unwrap();

        let outcome = run_tracked(&tracker, JobKind::FetchAllNews, async { Ok(JobReport::default()) }).await;
        assert!(outcome.is_none());

        tracker.complete(run, &Ok(JobReport::default()));
        let outcome = run_tracked(&tracker, JobKind::FetchAllNews, async { Ok(JobReport::default()) }).await;
        assert!(outcome.is_some_and(|r| r.is_ok()));
        assert!(tracker.get(JobKind::FetchAllNews).unwrap().last_result.is_some());
    }

    #[tokio::test]
    async fn test_start_and_shutdown() {
        let (state, _clock) = test_app_state();
        let handle = start(state.clone());

        let status = state.scheduler().status();
        assert!(status.running);
        let ids: Vec<_> = status.jobs.iter().map(|j| j.id).collect();
        assert_eq!(ids, vec![JobKind::FetchAllNews, JobKind::AnalyzePending]);
        assert_eq!(status.jobs[0].interval_secs, 1800);

        handle.shutdown().await;
        let status = state.scheduler().status();
        assert!(!status.running);
        assert!(status.jobs.iter().all(|j| j.next_run.is_none()));
    }
}
