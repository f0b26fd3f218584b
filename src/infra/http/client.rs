// Responsible for all communication with the upstream HTTP API.

use super::HttpTransport;
use async_trait::async_trait;
use reqwest::StatusCode;
use std::time::Duration;

/// Bounded retry with exponential backoff between `wait_min` and `wait_max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt; total attempts = `max_retries + 1`.
    pub max_retries: u32,
    pub wait_min: Duration,
    pub wait_max: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            wait_min: Duration::from_secs(5),
            wait_max: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// Delay before retry number `attempt + 1`. Never shorter than `wait_min`.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 1u32 << attempt.min(16);
        self.wait_min
            .saturating_mul(factor)
            .min(self.wait_max)
            .max(self.wait_min)
    }
}

fn is_retryable_status(status: StatusCode) -> bool {
    status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS
}

/// `reqwest` client wrapped with [`RetryPolicy`].
#[derive(Clone)]
pub struct RetryingClient {
    client: reqwest::Client,
    policy: RetryPolicy,
}

impl RetryingClient {
    pub fn new(policy: RetryPolicy, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("aq-dbsync/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(client, policy))
    }

    pub fn with_client(client: reqwest::Client, policy: RetryPolicy) -> Self {
        Self { client, policy }
    }

    /// One attempt. `Err((retryable, error))` on failure.
    async fn try_get(&self, url: &str) -> Result<Vec<u8>, (bool, anyhow::Error)> {
        let resp = match self.client.get(url).send().await {
            Ok(resp) => resp,
            Err(e) => {
                let retryable = !e.is_builder();
                return Err((retryable, anyhow::Error::new(e)));
            }
        };

        let status = resp.status();
        if !status.is_success() {
            return Err((
                is_retryable_status(status),
                anyhow::anyhow!("unexpected HTTP status {}", status),
            ));
        }

        match resp.bytes().await {
            Ok(body) => Ok(body.to_vec()),
            Err(e) => Err((true, anyhow::Error::new(e).context("failed to read response body"))),
        }
    }
}

#[async_trait]
impl HttpTransport for RetryingClient {
    async fn get(&self, url: &str) -> anyhow::Result<Vec<u8>> {
        let mut attempt: u32 = 0;
        loop {
            let err = match self.try_get(url).await {
                Ok(body) => return Ok(body),
                Err((false, err)) => return Err(err),
                Err((true, err)) => err,
            };

            if attempt >= self.policy.max_retries {
                return Err(err.context(format!("giving up after {} attempt(s)", attempt + 1)));
            }

            let wait = self.policy.backoff(attempt);
            tracing::warn!(
                url,
                attempt = attempt + 1,
                wait_ms = wait.as_millis() as u64,
                error = %err,
                "GET failed, retrying"
            );
            tokio::time::sleep(wait).await;
            attempt += 1;
        }
    }
}
