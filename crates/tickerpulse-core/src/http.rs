use std::time::Duration;

use crate::error::AppResult;

/// Build the shared HTTP client used by every upstream wrapper.
pub fn build_http_client(timeout: Duration) -> AppResult<reqwest::Client> {
    let client = reqwest::Client::builder()
        .timeout(timeout.max(Duration::from_secs(5)))
        .connect_timeout(Duration::from_secs(10))
        .tcp_nodelay(true)
        .user_agent(concat!("tickerpulse/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}
