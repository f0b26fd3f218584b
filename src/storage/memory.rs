//! In-process document store.
//!
//! Mirrors a document database collection: a filter on one field, replace
//! on match, insert otherwise. Used by tests and local dry runs.

use super::{DocumentStore, UpsertOp, WriteSummary};
use async_trait::async_trait;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone, Default)]
pub struct MemoryDocumentStore {
    collections: Arc<Mutex<HashMap<String, Vec<JsonValue>>>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents in `collection` (0 if it was never written).
    pub async fn count(&self, collection: &str) -> usize {
        let collections = self.collections.lock().await;
        collections.get(collection).map(Vec::len).unwrap_or(0)
    }

    /// Snapshot of `collection` in insertion order.
    pub async fn documents(&self, collection: &str) -> Vec<JsonValue> {
        let collections = self.collections.lock().await;
        collections.get(collection).cloned().unwrap_or_default()
    }

    /// First document whose `field` equals `value`.
    pub async fn find_one(&self, collection: &str, field: &str, value: &str) -> Option<JsonValue> {
        let collections = self.collections.lock().await;
        collections
            .get(collection)?
            .iter()
            .find(|doc| matches_filter(doc, field, value))
            .cloned()
    }
}

fn matches_filter(doc: &JsonValue, field: &str, value: &str) -> bool {
    doc.get(field).and_then(JsonValue::as_str) == Some(value)
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn submit_batch(&self, collection: &str, ops: &[UpsertOp]) -> anyhow::Result<WriteSummary> {
        let mut collections = self.collections.lock().await;
        let docs = collections.entry(collection.to_string()).or_default();
        let mut summary = WriteSummary::default();

        for (idx, op) in ops.iter().enumerate() {
            let replacement = op
                .document
                .to_json()
                .map_err(|e| anyhow::anyhow!("op #{} ({}): {}", idx, op.key_value, e))?;

            match docs
                .iter_mut()
                .find(|doc| matches_filter(doc, op.key_field, &op.key_value))
            {
                Some(existing) if *existing == replacement => summary.unchanged += 1,
                Some(existing) => {
                    *existing = replacement;
                    summary.replaced += 1;
                }
                None => {
                    docs.push(replacement);
                    summary.inserted += 1;
                }
            }
        }

        Ok(summary)
    }
}
