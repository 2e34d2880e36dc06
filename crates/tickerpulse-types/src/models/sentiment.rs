//! Sentiment classification and aggregate signal models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The five categories the sentiment model may answer with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SentimentCategory {
    #[serde(rename = "Highly Negative")]
    HighlyNegative,
    #[serde(rename = "Negative")]
    Negative,
    #[serde(rename = "Neutral")]
    Neutral,
    #[serde(rename = "Positive")]
    Positive,
    #[serde(rename = "Highly Positive")]
    HighlyPositive,
}

impl SentimentCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HighlyNegative => "Highly Negative",
            Self::Negative => "Negative",
            Self::Neutral => "Neutral",
            Self::Positive => "Positive",
            Self::HighlyPositive => "Highly Positive",
        }
    }

    /// Contribution of one analyzed item to the ticker score, in `[-1, 1]`.
    pub fn score(&self) -> f64 {
        match self {
            Self::HighlyNegative => -1.0,
            Self::Negative => -0.5,
            Self::Neutral => 0.0,
            Self::Positive => 0.5,
            Self::HighlyPositive => 1.0,
        }
    }

    /// Label for a normalized score in `[-1, 1]`.
    pub fn from_normalized(score: f64) -> Self {
        if score >= 0.5 {
            Self::HighlyPositive
        } else if score >= 0.2 {
            Self::Positive
        } else if score >= -0.2 {
            Self::Neutral
        } else if score >= -0.5 {
            Self::Negative
        } else {
            Self::HighlyNegative
        }
    }
}

impl fmt::Display for SentimentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single classification as returned by the model.
///
/// The model is instructed to answer `{"SENTIMENT": ..., "JUSTIFICATION": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentAnalysis {
    #[serde(alias = "SENTIMENT")]
    pub sentiment: SentimentCategory,
    #[serde(alias = "JUSTIFICATION")]
    pub justification: String,
}

/// Trading signal derived from the aggregated score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradingSignal {
    #[serde(rename = "STRONG BUY")]
    StrongBuy,
    #[serde(rename = "BUY")]
    Buy,
    #[serde(rename = "HOLD")]
    Hold,
    #[serde(rename = "SELL")]
    Sell,
    #[serde(rename = "STRONG SELL")]
    StrongSell,
}

impl TradingSignal {
    pub fn from_normalized(score: f64) -> Self {
        if score >= 0.5 {
            Self::StrongBuy
        } else if score >= 0.2 {
            Self::Buy
        } else if score >= -0.2 {
            Self::Hold
        } else if score >= -0.5 {
            Self::Sell
        } else {
            Self::StrongSell
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StrongBuy => "STRONG BUY",
            Self::Buy => "BUY",
            Self::Hold => "HOLD",
            Self::Sell => "SELL",
            Self::StrongSell => "STRONG SELL",
        }
    }
}

/// Aggregated sentiment for one ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerSentiment {
    pub ticker: String,
    /// Sum of category scores
    pub score: f64,
    /// Mean category score in `[-1, 1]`
    pub normalized_score: f64,
    pub sentiment_label: Option<SentimentCategory>,
    pub signal: Option<TradingSignal>,
    /// Share of the dominant polarity in `[0, 1]`
    pub confidence: f64,
    pub positive_count: u32,
    pub negative_count: u32,
    pub neutral_count: u32,
    pub total_analyzed: u32,
    pub total_pending: u32,
    pub updated_at: Option<DateTime<Utc>>,
}

impl TickerSentiment {
    /// Empty aggregate created alongside a freshly watched ticker.
    pub fn empty(ticker: &str) -> Self {
        Self {
            ticker: ticker.to_string(),
            score: 0.0,
            normalized_score: 0.0,
            sentiment_label: None,
            signal: None,
            confidence: 0.0,
            positive_count: 0,
            negative_count: 0,
            neutral_count: 0,
            total_analyzed: 0,
            total_pending: 0,
            updated_at: None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_accepts_model_keys() {
        let raw = r#"{"SENTIMENT": "Highly Positive", "JUSTIFICATION": "Record earnings."}"#;
        let analysis: SentimentAnalysis = serde_json::from_str(raw).unwrap();
        assert_eq!(analysis.sentiment, SentimentCategory::HighlyPositive);
        assert_eq!(analysis.justification, "Record earnings.");
    }

    #[test]
    fn test_analysis_rejects_unknown_category() {
        let raw = r#"{"SENTIMENT": "Bullish", "JUSTIFICATION": "x"}"#;
        assert!(serde_json::from_str::<SentimentAnalysis>(raw).is_err());
    }

    #[test]
    fn test_signal_thresholds() {
        assert_eq!(TradingSignal::from_normalized(0.5), TradingSignal::StrongBuy);
        assert_eq!(TradingSignal::from_normalized(0.2), TradingSignal::Buy);
        assert_eq!(TradingSignal::from_normalized(0.0), TradingSignal::Hold);
        assert_eq!(TradingSignal::from_normalized(-0.2), TradingSignal::Hold);
        assert_eq!(TradingSignal::from_normalized(-0.3), TradingSignal::Sell);
        assert_eq!(TradingSignal::from_normalized(-0.75), TradingSignal::StrongSell);
        assert_eq!(serde_json::to_string(&TradingSignal::StrongBuy).unwrap(), "\"STRONG BUY\"");
    }
}
