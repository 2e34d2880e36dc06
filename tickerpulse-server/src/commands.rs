use anyhow::{Context, Result};
use chrono::Utc;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, Color, Table};

use tickerpulse_types::{CooldownStatus, ServiceStatusMap};

/// Query a running instance and print its upstream rate-limit status.
pub async fn handle_status(url: &str, json: bool) -> Result<()> {
    let endpoint = format!("{}/api/status", url.trim_end_matches('/'));
    let response = reqwest::get(&endpoint)
        .await
        .with_context(|| format!("Failed to reach TickerPulse at {}", url))?;

    if !response.status().is_success() {
        anyhow::bail!("{} returned {}", endpoint, response.status());
    }
    let statuses: ServiceStatusMap = response.json().await.context("Failed to parse status response")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&statuses)?);
        return Ok(());
    }

    println!("{}", "TickerPulse Upstream Status".cyan().bold());
    println!("{}", status_table(&statuses));

    if statuses.all_available() {
        println!("{} All services available", "✓".green());
    } else {
        println!("{} Some services are cooling down", "!".yellow());
    }
    Ok(())
}

fn status_table(statuses: &ServiceStatusMap) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Service", "Available", "Cooldown until", "Remaining", "Message"]);

    for (service, status) in statuses.iter() {
        let available = if status.available {
            Cell::new("yes").fg(Color::Green)
        } else {
            Cell::new("no").fg(Color::Red)
        };
        table.add_row(vec![
            Cell::new(service.display_name()),
            available,
            Cell::new(status.cooldown_until.map_or_else(|| "-".to_string(), |t| t.to_rfc3339())),
            Cell::new(remaining(status)),
            Cell::new(status.message.as_deref().unwrap_or("-")),
        ]);
    }
    table
}

fn remaining(status: &CooldownStatus) -> String {
    match status.cooldown_until {
        Some(until) if !status.available => {
            let secs = (until - Utc::now()).num_seconds().max(0);
            format!("{}s", secs)
        }
        _ => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tickerpulse_types::TrackedService;

    #[test]
    fn test_status_table_lists_every_service() {
        let statuses = ServiceStatusMap::new(vec![
            (TrackedService::Gemini, CooldownStatus::available()),
            (
                TrackedService::AlphaVantage,
                CooldownStatus {
                    available: false,
                    cooldown_until: Some(Utc::now() + chrono::Duration::seconds(30)),
                    message: Some("Rate limit exceeded (429)".to_string()),
                },
            ),
        ]);

        let rendered = status_table(&statuses).to_string();
        assert!(rendered.contains("Gemini"));
        assert!(rendered.contains("Alpha Vantage"));
        assert!(rendered.contains("Rate limit exceeded (429)"));
    }

    #[test]
    fn test_remaining_is_dash_when_available() {
        assert_eq!(remaining(&CooldownStatus::available()), "-");
    }
}
