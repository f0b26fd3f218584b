//! Upsert writer: entities -> ordered replace-by-natural-key batch.

use crate::domain::model::Entity;
use crate::error::SyncError;
use crate::storage::{DocumentStore, UpsertOp, WriteSummary};

/// One op per entity, filtered on the kind's natural key field.
pub fn build_ops<E: Entity>(entities: Vec<E>) -> Vec<UpsertOp> {
    let key_field = E::KIND.natural_key_field();
    entities
        .into_iter()
        .map(|entity| UpsertOp {
            key_field,
            key_value: entity.natural_key().to_string(),
            document: entity.into_document(),
        })
        .collect()
}

/// Submits `ops` as a single ordered batch. An empty batch is a no-op.
pub async fn submit(
    store: &dyn DocumentStore,
    collection: &str,
    ops: &[UpsertOp],
) -> Result<WriteSummary, SyncError> {
    if ops.is_empty() {
        return Ok(WriteSummary::default());
    }
    store
        .submit_batch(collection, ops)
        .await
        .map_err(|cause| SyncError::StorageWriteFailed {
            collection: collection.to_string(),
            cause,
        })
}
