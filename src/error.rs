//! Error taxonomy of the sync pipeline.
//!
//! Every variant is fatal to the page it happened on and halts the run of the
//! entity kind being processed. Other kinds in the same tick still run.
//! A missing `meta.found` is not an error: see [`crate::app::fetcher::PageEnvelope`].

/// A failed page or batch, labelled by the stage that produced it.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// The HTTP transport gave up (retries exhausted or non-retryable status).
    #[error("transport failure for {url}: {cause}")]
    TransportFailure { url: String, cause: String },

    /// The response body was not a JSON object.
    #[error("malformed response from {url}: {cause}")]
    MalformedResponse { url: String, cause: String },

    /// The response had no `results` array.
    #[error("response from {url} has no `results` array")]
    MissingResultsField { url: String },

    /// The storage boundary rejected the page's batch.
    #[error("batch write to `{collection}` failed: {cause:#}")]
    StorageWriteFailed {
        collection: String,
        cause: anyhow::Error,
    },
}

impl SyncError {
    /// Short stable label used as a structured log field.
    pub fn label(&self) -> &'static str {
        match self {
            SyncError::TransportFailure { .. } => "transport_failure",
            SyncError::MalformedResponse { .. } => "malformed_response",
            SyncError::MissingResultsField { .. } => "missing_results_field",
            SyncError::StorageWriteFailed { .. } => "storage_write_failed",
        }
    }
}
