pub mod client;

pub use client::{RetryPolicy, RetryingClient};

use async_trait::async_trait;

/// GET capability the page fetcher depends on.
///
/// Implementations own their retry policy: by the time `get` returns an
/// error, the request has failed permanently.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Returns the body of a successful (2xx) response.
    async fn get(&self, url: &str) -> anyhow::Result<Vec<u8>>;
}
