//! Centralized configuration (environment variables + defaults).

use anyhow::Context;
use std::str::FromStr;
use std::time::Duration;

use crate::infra::http::RetryPolicy;

pub const DEFAULT_API_ENDPOINT: &str = "https://api.openaq.org";
pub const DEFAULT_BATCH_SIZE: u64 = 1000;
pub const DEFAULT_HTTP_RETRY_COUNT: u32 = 3;
pub const DEFAULT_RETRY_WAIT_MIN_SECS: u64 = 5;
pub const DEFAULT_RETRY_WAIT_MAX_SECS: u64 = 30;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_SYNC_INTERVAL_SECS: u64 = 3600;

fn parse_var<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => v
            .trim()
            .parse::<T>()
            .with_context(|| format!("{} has an invalid value: {:?}", name, v)),
        _ => Ok(default),
    }
}

/// Base URL of the air-quality API (no trailing slash).
pub fn api_endpoint() -> String {
    let v = std::env::var("AQ_API_ENDPOINT").unwrap_or_else(|_| DEFAULT_API_ENDPOINT.to_string());
    v.trim_end_matches('/').to_string()
}

/// Results requested per page.
pub fn batch_size() -> anyhow::Result<u64> {
    Ok(parse_var("BATCH_SIZE", DEFAULT_BATCH_SIZE)?.max(1))
}

/// Maximum number of retries per HTTP request.
pub fn http_retry_count() -> anyhow::Result<u32> {
    parse_var("HTTP_RETRY_COUNT", DEFAULT_HTTP_RETRY_COUNT)
}

pub fn retry_wait_min() -> anyhow::Result<Duration> {
    Ok(Duration::from_secs(parse_var(
        "HTTP_RETRY_WAIT_MIN_SECS",
        DEFAULT_RETRY_WAIT_MIN_SECS,
    )?))
}

pub fn retry_wait_max() -> anyhow::Result<Duration> {
    Ok(Duration::from_secs(parse_var(
        "HTTP_RETRY_WAIT_MAX_SECS",
        DEFAULT_RETRY_WAIT_MAX_SECS,
    )?))
}

pub fn http_timeout() -> anyhow::Result<Duration> {
    Ok(Duration::from_secs(parse_var(
        "HTTP_TIMEOUT_SECS",
        DEFAULT_HTTP_TIMEOUT_SECS,
    )?))
}

/// Interval between two sync ticks.
pub fn sync_interval() -> anyhow::Result<Duration> {
    Ok(Duration::from_secs(
        parse_var("SYNC_INTERVAL_SECS", DEFAULT_SYNC_INTERVAL_SECS)?.max(1),
    ))
}

/// Database URL must be provided (no default) for safety.
pub fn database_url() -> anyhow::Result<String> {
    std::env::var("DATABASE_URL").context("DATABASE_URL must be set")
}

/// Everything the sync binary needs, read once at startup.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub api_endpoint: String,
    pub batch_size: u64,
    pub retry: RetryPolicy,
    pub http_timeout: Duration,
    pub database_url: String,
    pub sync_interval: Duration,
}

impl SyncConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();
        let retry = RetryPolicy {
            max_retries: http_retry_count()?,
            wait_min: retry_wait_min()?,
            wait_max: retry_wait_max()?,
        };
        Ok(Self {
            api_endpoint: api_endpoint(),
            batch_size: batch_size()?,
            retry,
            http_timeout: http_timeout()?,
            database_url: database_url()?,
            sync_interval: sync_interval()?,
        })
    }
}
