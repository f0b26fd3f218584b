//! Storage boundary: ordered batches of replace-by-natural-key writes.

use crate::domain::model::Document;
use async_trait::async_trait;

pub mod memory;
pub mod postgres;

pub use memory::MemoryDocumentStore;
pub use postgres::PgDocumentStore;

/// Replace the document matching `{key_field: key_value}`, or insert it if none matches.
#[derive(Debug, Clone, PartialEq)]
pub struct UpsertOp {
    pub key_field: &'static str,
    pub key_value: String,
    pub document: Document,
}

/// Outcome counts of one submitted batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteSummary {
    pub inserted: u64,
    pub replaced: u64,
    /// Matched an existing document with identical content.
    pub unchanged: u64,
}

impl WriteSummary {
    pub fn total(&self) -> u64 {
        self.inserted + self.replaced + self.unchanged
    }

    pub fn add(&mut self, other: WriteSummary) {
        self.inserted += other.inserted;
        self.replaced += other.replaced;
        self.unchanged += other.unchanged;
    }
}

/// A store that can bulk-apply upserts.
///
/// Operations run in order and the first failure aborts the rest of the
/// batch. Whether the ops before the failure stay applied is up to the
/// implementation.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn submit_batch(&self, collection: &str, ops: &[UpsertOp]) -> anyhow::Result<WriteSummary>;
}
