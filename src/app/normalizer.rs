//! Entity normalizer: raw wire record -> typed entity with derived fields.

use crate::app::fetcher::RawRecord;
use crate::domain::model::Entity;
use serde_json::value::RawValue;

/// Decodes one record into `E` and computes its derived fields.
///
/// Returns `None` only when the record is not a JSON object; missing or
/// mistyped fields inside an object fall back to zero values.
pub fn normalize<E: Entity>(raw: &RawValue) -> Option<E> {
    // serde would also accept a positional array for a struct.
    if !raw.get().trim_start().starts_with('{') {
        tracing::warn!(kind = %E::KIND, "skipping record that is not an object");
        return None;
    }
    match serde_json::from_str::<E>(raw.get()) {
        Ok(mut entity) => {
            entity.enrich();
            Some(entity)
        }
        Err(e) => {
            tracing::warn!(kind = %E::KIND, error = %e, "skipping undecodable record");
            None
        }
    }
}

/// Normalizes a page, preserving record order.
pub fn normalize_page<E: Entity>(records: &[RawRecord]) -> Vec<E> {
    records.iter().filter_map(|raw| normalize::<E>(raw)).collect()
}
