//! News item models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::sentiment::SentimentCategory;

pub const MAX_TITLE_LEN: usize = 500;

/// A news item as returned by the news provider, before persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    pub summary: String,
    /// Publication time in the provider's own format (e.g. `20251230T153000`)
    pub published_date: String,
    pub source: Option<String>,
    pub url: Option<String>,
    /// Ticker relevance in `[0, 1]`
    pub relevance_score: Option<f64>,
}

impl NewsItem {
    /// Trim text fields and validate lengths/ranges.
    ///
    /// Returns `None` for items that cannot be stored (empty title or summary,
    /// oversized title, relevance outside `[0, 1]`).
    pub fn normalized(mut self) -> Option<Self> {
        self.title = self.title.trim().to_string();
        self.summary = self.summary.trim().to_string();

        if self.title.is_empty() || self.summary.is_empty() {
            return None;
        }
        if self.title.chars().count() > MAX_TITLE_LEN {
            return None;
        }
        if let Some(score) = self.relevance_score {
            if !(0.0..=1.0).contains(&score) {
                return None;
            }
        }
        Some(self)
    }
}

/// Analysis lifecycle of a stored news item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NewsStatus {
    Pending,
    Analyzed,
}

impl std::str::FromStr for NewsStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "analyzed" => Ok(Self::Analyzed),
            other => Err(format!("unknown news status '{}'", other)),
        }
    }
}

/// A persisted news item with analysis tracking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsRecord {
    pub id: u64,
    pub ticker: String,
    pub title: String,
    pub summary: String,
    pub published_date: String,
    pub source: Option<String>,
    pub url: Option<String>,
    pub relevance_score: Option<f64>,
    pub status: NewsStatus,
    pub sentiment: Option<SentimentCategory>,
    pub justification: Option<String>,
    pub fetched_at: DateTime<Utc>,
    pub analyzed_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(title: &str, summary: &str, relevance: Option<f64>) -> NewsItem {
        NewsItem {
            title: title.to_string(),
            summary: summary.to_string(),
            published_date: "20251230T153000".to_string(),
            source: None,
            url: None,
            relevance_score: relevance,
        }
    }

    #[test]
    fn test_normalized_trims_whitespace() {
        let n = item("  Apple beats  ", "\tRecord quarter\n", Some(0.9)).normalized();
        let n = n.expect("valid item");
        assert_eq!(n.title, "Apple beats");
        assert_eq!(n.summary, "Record quarter");
    }

    #[test]
    fn test_normalized_rejects_invalid_items() {
        assert!(item("   ", "summary", None).normalized().is_none());
        assert!(item("title", "", None).normalized().is_none());
        assert!(item("title", "summary", Some(1.5)).normalized().is_none());
        assert!(item(&"x".repeat(MAX_TITLE_LEN + 1), "summary", None).normalized().is_none());
    }
}
