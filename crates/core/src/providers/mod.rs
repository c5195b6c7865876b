use anyhow::{Context, Result};
use std::time::Duration;

pub mod market;
pub mod news;
pub mod voice;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

// Shared client constructor; each provider names its own timeout env knob.
pub(crate) fn build_http_client(timeout_env: &str) -> Result<reqwest::Client> {
    let timeout_secs = std::env::var(timeout_env)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(DEFAULT_TIMEOUT_SECS);

    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .context("failed to build provider http client")
}
