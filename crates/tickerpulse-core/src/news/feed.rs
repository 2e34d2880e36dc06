use serde_json::Value;
use tickerpulse_types::NewsItem;

fn str_field(item: &Value, key: &str) -> Option<String> {
    item.get(key).and_then(|v| v.as_str()).map(str::to_string)
}

/// Relevance of the first `ticker_sentiment` entry. The provider sends it as a
/// string ("0.912345"), occasionally as a number.
fn relevance(item: &Value) -> Option<f64> {
    let first = item.get("ticker_sentiment")?.as_array()?.first()?;
    match first.get("relevance_score")? {
        Value::String(s) => s.trim().parse().ok(),
        Value::Number(n) => n.as_f64(),
        _ => None,
    }
}

/// Map the `feed` array to news items. Invalid entries are dropped.
pub(super) fn parse_feed(data: &Value) -> Vec<NewsItem> {
    let Some(feed) = data.get("feed").and_then(|v| v.as_array()) else {
        tracing::warn!("[NewsFetcher] Response has no feed");
        return Vec::new();
    };

    feed.iter()
        .filter_map(|item| {
            let parsed = NewsItem {
                title: str_field(item, "title").unwrap_or_else(|| "Title Not Available".to_string()),
                summary: str_field(item, "summary").unwrap_or_else(|| "Summary Not Available".to_string()),
                published_date: str_field(item, "time_published")
                    .unwrap_or_else(|| "Date Not Available".to_string()),
                source: str_field(item, "source"),
                url: str_field(item, "url"),
                relevance_score: relevance(item),
            };
            let title = parsed.title.clone();
            let normalized = parsed.normalized();
            if normalized.is_none() {
                tracing::warn!("[NewsFetcher] Skipping invalid news item: {:.60}", title);
            }
            normalized
        })
        .collect()
}
