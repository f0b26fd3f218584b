// Canonical content hashing of stored documents.

use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

// Domain separation so a document hash never collides with other hashed material.
const DOCUMENT_DOMAIN: &[u8] = b"AQDOC";

/// A helper function to sort a JSON object's keys recursively.
/// This is essential for canonical serialization.
fn sort_json_value(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let sorted_map: BTreeMap<String, Value> = map
                .iter()
                .map(|(k, v)| (k.clone(), sort_json_value(v)))
                .collect();
            Value::Object(sorted_map.into_iter().collect())
        }
        Value::Array(arr) => Value::Array(arr.iter().map(sort_json_value).collect()),
        _ => value.clone(),
    }
}

/// Hex SHA-256 of the canonical (key-sorted) serialization of `value`.
///
/// Two documents that differ only in key order hash the same.
pub fn content_hash(value: &Value) -> String {
    let sorted_value = sort_json_value(value);
    // Value -> String cannot fail: keys are strings and numbers are finite.
    let canonical_string = sorted_value.to_string();

    let mut hasher = Sha256::new();
    hasher.update(DOCUMENT_DOMAIN);
    hasher.update(canonical_string.as_bytes());
    hex::encode(hasher.finalize())
}
