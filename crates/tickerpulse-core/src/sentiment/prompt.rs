/// Analyst prompt asking for a strict JSON classification.
pub fn build_prompt(ticker: &str, news_text: &str) -> String {
    format!(
        r#"Act as a quantitative market analyst specialized in short-term trading.
Evaluate the news text provided about the stock {ticker} to classify its sentiment and potential short-term price impact.

Format the response strictly as a JSON object with two fields:
1. "SENTIMENT" (Use only one of these categories: 'Highly Negative', 'Negative', 'Neutral', 'Positive', 'Highly Positive').
2. "JUSTIFICATION" (A concise 1-2 sentence summary explaining the main reason for the impact).

TEXT TO ANALYZE:
---
{news_text}
---
"#
    )
}

/// Text sent for one news record: title and summary.
pub fn news_text(title: &str, summary: &str) -> String {
    format!("{}\n\n{}", title, summary)
}
