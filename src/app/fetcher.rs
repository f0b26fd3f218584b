//! Page fetcher: one GET per page, decoded into a result array plus a total-count hint.

use crate::domain::model::EntityKind;
use crate::error::SyncError;
use crate::infra::http::HttpTransport;
use serde_json::value::RawValue;
use std::collections::HashMap;
use std::sync::Arc;

/// One undecoded entry of the `results` array.
pub type RawRecord = Box<RawValue>;

/// A decoded page.
#[derive(Debug)]
pub struct PageEnvelope {
    pub results: Vec<RawRecord>,
    /// `meta.found`. `None` when the metadata is missing or not a number;
    /// callers treat that as "nothing beyond this page".
    pub total_count: Option<u64>,
}

impl PageEnvelope {
    pub fn total_or_zero(&self) -> u64 {
        self.total_count.unwrap_or(0)
    }
}

/// `<base>/v1/<resource>?limit=<batch_size>&page=<page>`
pub fn page_url(base_url: &str, kind: EntityKind, batch_size: u64, page: u64) -> String {
    format!(
        "{}/v1/{}?limit={}&page={}",
        base_url.trim_end_matches('/'),
        kind.resource(),
        batch_size,
        page
    )
}

/// Splits a response body into its records and total count.
pub fn decode_envelope(url: &str, body: &[u8]) -> Result<PageEnvelope, SyncError> {
    // Top level must be an object; its members stay undecoded until needed.
    let mut envelope: HashMap<String, Box<RawValue>> =
        serde_json::from_slice(body).map_err(|e| SyncError::MalformedResponse {
            url: url.to_string(),
            cause: e.to_string(),
        })?;

    let results = envelope
        .remove("results")
        .and_then(|raw| serde_json::from_str::<Vec<RawRecord>>(raw.get()).ok())
        .ok_or_else(|| SyncError::MissingResultsField {
            url: url.to_string(),
        })?;

    let total_count = envelope
        .remove("meta")
        .and_then(|raw| serde_json::from_str::<HashMap<String, Box<RawValue>>>(raw.get()).ok())
        .and_then(|mut meta| meta.remove("found"))
        .and_then(|raw| serde_json::from_str::<f64>(raw.get()).ok())
        .filter(|found| found.is_finite() && *found >= 0.0)
        .map(|found| found as u64);

    if total_count.is_none() {
        tracing::warn!(url, condition = "missing_metadata", "no numeric meta.found; pagination stops after this page");
    }

    Ok(PageEnvelope {
        results,
        total_count,
    })
}

/// Fetches pages through an injected [`HttpTransport`].
#[derive(Clone)]
pub struct PageFetcher {
    transport: Arc<dyn HttpTransport>,
}

impl PageFetcher {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport }
    }

    pub async fn fetch_page(&self, url: &str) -> Result<PageEnvelope, SyncError> {
        let body = self
            .transport
            .get(url)
            .await
            .map_err(|e| SyncError::TransportFailure {
                url: url.to_string(),
                cause: format!("{:#}", e),
            })?;
        decode_envelope(url, &body)
    }
}
