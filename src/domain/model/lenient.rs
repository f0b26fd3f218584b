//! Permissive field decoders for the upstream feed.
//!
//! The feed is loosely typed: fields go missing, numbers arrive as strings
//! or floats, nested objects are sometimes `null`. Each decoder here accepts
//! whatever is on the wire and falls back to the zero value instead of
//! failing the whole record. Use with `#[serde(deserialize_with = ...)]` on
//! a `#[serde(default)]` struct.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value as JsonValue;

pub fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let v = JsonValue::deserialize(deserializer)?;
    Ok(match v {
        JsonValue::String(s) => s,
        _ => String::new(),
    })
}

/// Integers, floats (truncated toward zero) and numeric strings; anything else is 0.
pub fn int<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let v = JsonValue::deserialize(deserializer)?;
    Ok(int_from_json(&v))
}

pub fn float<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let v = JsonValue::deserialize(deserializer)?;
    Ok(match &v {
        JsonValue::Number(n) => n.as_f64().unwrap_or_default(),
        JsonValue::String(s) => s.trim().parse::<f64>().unwrap_or_default(),
        _ => 0.0,
    })
}

/// RFC3339 timestamps; unparseable or missing values become `None`.
pub fn timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = JsonValue::deserialize(deserializer)?;
    Ok(v.as_str()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc)))
}

/// Arrays of records; elements that do not decode are dropped, a non-array is empty.
pub fn seq<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let v = JsonValue::deserialize(deserializer)?;
    Ok(match v {
        JsonValue::Array(items) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

/// Nested object; anything that does not decode is `T::default()`.
pub fn object<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let v = JsonValue::deserialize(deserializer)?;
    Ok(serde_json::from_value(v).unwrap_or_default())
}

fn int_from_json(v: &JsonValue) -> i64 {
    match v {
        JsonValue::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .unwrap_or_default(),
        JsonValue::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(|f| f.trunc() as i64))
                .unwrap_or_default()
        }
        _ => 0,
    }
}
