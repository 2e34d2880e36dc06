use clap::{Args, Parser, Subcommand};

use tickerpulse_core::config::{
    RawSettings, DEFAULT_ALPHA_VANTAGE_URL, DEFAULT_GEMINI_MODEL, DEFAULT_GEMINI_URL,
};

#[derive(Parser)]
#[command(
    name = "tickerpulse",
    about = "TickerPulse - news sentiment signals for a stock watchlist",
    version = env!("CARGO_PKG_VERSION"),
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[arg(short, long, env = "RUST_LOG", default_value = "info", global = true)]
    pub log_level: String,

    #[command(flatten)]
    pub serve: ServeArgs,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Start the API server and schedulers (default if no command specified)")]
    Serve,

    #[command(about = "Show upstream rate-limit status of a running server")]
    Status {
        #[arg(long, env = "TICKERPULSE_URL", default_value = "http://127.0.0.1:8000")]
        url: String,

        #[arg(short, long, help = "Output as JSON")]
        json: bool,
    },
}

#[derive(Args, Clone)]
pub struct ServeArgs {
    #[arg(short, long, env = "TICKERPULSE_PORT", default_value = "8000")]
    pub port: u16,

    #[arg(long, env = "TICKERPULSE_HOST", default_value = "127.0.0.1")]
    pub host: String,

    #[arg(long, env = "ALPHA_VANTAGE_API_KEY", hide_env_values = true)]
    pub alpha_vantage_api_key: Option<String>,

    #[arg(long, env = "ALPHA_VANTAGE_BASE_URL", default_value = DEFAULT_ALPHA_VANTAGE_URL)]
    pub alpha_vantage_base_url: String,

    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub gemini_api_key: Option<String>,

    #[arg(long, env = "GEMINI_BASE_URL", default_value = DEFAULT_GEMINI_URL)]
    pub gemini_base_url: String,

    #[arg(long, env = "GEMINI_MODEL", default_value = DEFAULT_GEMINI_MODEL)]
    pub gemini_model: String,

    #[arg(long, env = "ALPHA_VANTAGE_COOLDOWN_SECS", default_value = "60")]
    pub alpha_vantage_cooldown_secs: u64,

    #[arg(long, env = "GEMINI_COOLDOWN_SECS", default_value = "60")]
    pub gemini_cooldown_secs: u64,

    #[arg(long, env = "FETCH_INTERVAL_MINUTES", default_value = "30")]
    pub fetch_interval_minutes: u64,

    #[arg(long, env = "ANALYZE_INTERVAL_MINUTES", default_value = "5")]
    pub analyze_interval_minutes: u64,

    #[arg(long, env = "ANALYZE_BATCH_SIZE", default_value = "10")]
    pub analyze_batch_size: usize,

    #[arg(long, env = "FETCH_WINDOW_HOURS", default_value = "6")]
    pub fetch_window_hours: u32,

    #[arg(long, env = "HTTP_TIMEOUT_SECS", default_value = "30")]
    pub http_timeout_secs: u64,

    #[arg(long, env = "ALPHA_VANTAGE_CALLS_PER_MINUTE", default_value = "5")]
    pub alpha_vantage_calls_per_minute: u32,

    #[arg(long, env = "GEMINI_CALLS_PER_MINUTE", default_value = "15")]
    pub gemini_calls_per_minute: u32,

    #[arg(long, env = "UPSTREAM_RETRY_ATTEMPTS", default_value = "3", help = "Attempts per upstream call, the first included")]
    pub upstream_retry_attempts: u32,

    #[arg(long, help = "Serve the API without background jobs")]
    pub no_scheduler: bool,
}

impl ServeArgs {
    pub fn raw_settings(&self) -> RawSettings {
        RawSettings {
            alpha_vantage_api_key: self.alpha_vantage_api_key.clone(),
            alpha_vantage_base_url: self.alpha_vantage_base_url.clone(),
            gemini_api_key: self.gemini_api_key.clone(),
            gemini_base_url: self.gemini_base_url.clone(),
            gemini_model: self.gemini_model.clone(),
            alpha_vantage_cooldown_secs: self.alpha_vantage_cooldown_secs,
            gemini_cooldown_secs: self.gemini_cooldown_secs,
            fetch_interval_minutes: self.fetch_interval_minutes,
            analyze_interval_minutes: self.analyze_interval_minutes,
            analyze_batch_size: self.analyze_batch_size,
            fetch_window_hours: self.fetch_window_hours,
            http_timeout_secs: self.http_timeout_secs,
            alpha_vantage_calls_per_minute: self.alpha_vantage_calls_per_minute,
            gemini_calls_per_minute: self.gemini_calls_per_minute,
            upstream_retry_attempts: self.upstream_retry_attempts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_subcommand() {
        let cli = Cli::try_parse_from(["tickerpulse", "--alpha-vantage-api-key", "demo"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.serve.port, 8000);
        assert_eq!(cli.serve.gemini_cooldown_secs, 60);
        assert_eq!(cli.serve.raw_settings().alpha_vantage_calls_per_minute, 5);
        assert_eq!(cli.serve.raw_settings().alpha_vantage_api_key.as_deref(), Some("demo"));
    }

    #[test]
    fn test_status_subcommand() {
        let cli = Cli::try_parse_from(["tickerpulse", "status", "--json"]).unwrap();
        match cli.command {
            Some(Commands::Status { json, url }) => {
                assert!(json);
                assert_eq!(url, "http://127.0.0.1:8000");
            }
            _ => panic!("expected status command"),
        }
    }
}
