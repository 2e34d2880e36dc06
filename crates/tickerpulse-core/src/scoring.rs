//! Aggregation of per-item sentiment into a ticker score and trading signal.

use chrono::{DateTime, Utc};
use tickerpulse_types::{SentimentCategory, TickerSentiment, TradingSignal};

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// Aggregate the analyzed sentiments of one ticker.
///
/// With nothing analyzed the result has zero scores and no label or signal.
pub fn aggregate(
    ticker: &str,
    analyzed: &[SentimentCategory],
    pending_count: u32,
    now: DateTime<Utc>,
) -> TickerSentiment {
    let mut result = TickerSentiment::empty(ticker);
    result.total_pending = pending_count;
    result.updated_at = Some(now);

    if analyzed.is_empty() {
        return result;
    }

    let n = analyzed.len() as f64;
    let total: f64 = analyzed.iter().map(SentimentCategory::score).sum();
    let normalized = round4(total / n);

    for category in analyzed {
        match category {
            SentimentCategory::Positive | SentimentCategory::HighlyPositive => result.positive_count += 1,
            SentimentCategory::Negative | SentimentCategory::HighlyNegative => result.negative_count += 1,
            SentimentCategory::Neutral => result.neutral_count += 1,
        }
    }

    let dominant = result.positive_count.max(result.negative_count).max(result.neutral_count);

    result.score = round4(total);
    result.normalized_score = normalized;
    result.sentiment_label = Some(SentimentCategory::from_normalized(normalized));
    result.signal = Some(TradingSignal::from_normalized(normalized));
    result.confidence = round4(f64::from(dominant) / n);
    result.total_analyzed = analyzed.len() as u32;
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use SentimentCategory::*;

    #[test]
    fn test_empty_aggregate() {
        let now = Utc::now();
        let result = aggregate("AAPL", &[], 4, now);
        assert_eq!(result.total_analyzed, 0);
        assert_eq!(result.total_pending, 4);
        assert_eq!(result.normalized_score, 0.0);
        assert!(result.signal.is_none());
        assert_eq!(result.updated_at, Some(now));
    }

    #[test]
    fn test_mixed_aggregate() {
        let result = aggregate("AAPL", &[HighlyPositive, Positive, Neutral, Negative], 0, Utc::now());
        // 1.0 + 0.5 + 0 - 0.5 = 1.0 over 4
        assert_eq!(result.score, 1.0);
        assert_eq!(result.normalized_score, 0.25);
        assert_eq!(result.sentiment_label, Some(Positive));
        assert_eq!(result.signal, Some(TradingSignal::Buy));
        assert_eq!(result.positive_count, 2);
        assert_eq!(result.negative_count, 1);
        assert_eq!(result.neutral_count, 1);
        assert_eq!(result.confidence, 0.5);
    }

    #[test]
    fn test_rounding_and_strong_sell() {
        let result = aggregate("TSLA", &[HighlyNegative, HighlyNegative, Negative], 1, Utc::now());
        assert_eq!(result.normalized_score, -0.8333);
        assert_eq!(result.sentiment_label, Some(HighlyNegative));
        assert_eq!(result.signal, Some(TradingSignal::StrongSell));
        assert_eq!(result.confidence, 1.0);
    }
}
