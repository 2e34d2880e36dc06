//! Background/manual job bookkeeping models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::service::SkipReason;

/// Jobs that can be triggered manually or by the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobKind {
    FetchAllNews,
    FetchNewsTicker,
    AnalyzePending,
}

impl JobKind {
    pub const ALL: [JobKind; 3] = [JobKind::FetchAllNews, JobKind::FetchNewsTicker, JobKind::AnalyzePending];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FetchAllNews => "fetch_all_news",
            Self::FetchNewsTicker => "fetch_news_ticker",
            Self::AnalyzePending => "analyze_pending",
        }
    }

    /// Inverse of [`JobKind::as_str`].
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Idle,
    Running,
    Failed,
}

/// Result of one job run.
///
/// `processed` counts work items attempted (tickers for a fetch, news items
/// for an analysis) and `succeeded` those that completed. `saved` is the number
/// of new news items stored by a fetch.
///
/// A run skipped because of an upstream cooldown is a normal, successful
/// outcome carrying `skipped`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobReport {
    pub processed: u32,
    pub succeeded: u32,
    pub errors: u32,
    pub saved: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skipped: Option<SkipReason>,
}

impl JobReport {
    pub fn skipped(reason: SkipReason) -> Self {
        Self { skipped: Some(reason), ..Default::default() }
    }

    pub fn was_skipped(&self) -> bool {
        self.skipped.is_some()
    }

    fn counts(&self) -> String {
        let mut out = format!("{} processed, {} ok, {} errors", self.processed, self.succeeded, self.errors);
        if self.saved > 0 {
            out.push_str(&format!(", {} saved", self.saved));
        }
        out
    }

    pub fn summary(&self) -> String {
        match &self.skipped {
            Some(reason) if self.processed == 0 => format!("skipped: {}", reason),
            Some(reason) => format!("{} (stopped early: {})", self.counts(), reason),
            None => self.counts(),
        }
    }
}

/// Tracked state of one job kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobInfo {
    pub kind: JobKind,
    pub status: JobStatus,
    pub last_run: Option<DateTime<Utc>>,
    pub last_duration_secs: Option<f64>,
    pub last_result: Option<JobReport>,
    pub last_error: Option<String>,
}

impl JobInfo {
    pub fn idle(kind: JobKind) -> Self {
        Self {
            kind,
            status: JobStatus::Idle,
            last_run: None,
            last_duration_secs: None,
            last_result: None,
            last_error: None,
        }
    }
}
