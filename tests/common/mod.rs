//! Shared fakes and fixtures for the integration tests.
#![allow(dead_code)]

use anyhow::anyhow;
use aq_dbsync::{DocumentStore, HttpTransport, MemoryDocumentStore, UpsertOp, WriteSummary};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

pub const BASE_URL: &str = "http://aq.test";

/// Transport that serves canned bodies by exact URL and records every request.
#[derive(Default)]
pub struct ScriptedTransport {
    pages: HashMap<String, Result<String, String>>,
    requests: Mutex<Vec<String>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.pages.insert(url.into(), Ok(body.into()));
        self
    }

    pub fn with_failure(mut self, url: impl Into<String>, message: impl Into<String>) -> Self {
        self.pages.insert(url.into(), Err(message.into()));
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn get(&self, url: &str) -> anyhow::Result<Vec<u8>> {
        self.requests.lock().unwrap().push(url.to_string());
        match self.pages.get(url) {
            Some(Ok(body)) => Ok(body.clone().into_bytes()),
            Some(Err(message)) => Err(anyhow!("{}", message)),
            None => Err(anyhow!("unexpected HTTP status 404 Not Found")),
        }
    }
}

/// Wraps a [`ScriptedTransport`] so every GET takes `delay` and tracks how
/// many requests were in flight at once.
pub struct SlowTransport {
    pub inner: ScriptedTransport,
    delay: Duration,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl SlowTransport {
    pub fn new(inner: ScriptedTransport, delay: Duration) -> Self {
        Self {
            inner,
            delay,
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HttpTransport for SlowTransport {
    async fn get(&self, url: &str) -> anyhow::Result<Vec<u8>> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        let body = self.inner.get(url).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        body
    }
}

/// Memory store that rejects batches for one collection, optionally only
/// after a number of successful batches to that collection.
pub struct FailingStore {
    pub inner: MemoryDocumentStore,
    fail_collection: String,
    succeed_first: usize,
    batches: AtomicUsize,
}

impl FailingStore {
    pub fn new(fail_collection: &str, succeed_first: usize) -> Self {
        Self {
            inner: MemoryDocumentStore::new(),
            fail_collection: fail_collection.to_string(),
            succeed_first,
            batches: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl DocumentStore for FailingStore {
    async fn submit_batch(&self, collection: &str, ops: &[UpsertOp]) -> anyhow::Result<WriteSummary> {
        if collection == self.fail_collection {
            let seen = self.batches.fetch_add(1, Ordering::SeqCst);
            if seen >= self.succeed_first {
                return Err(anyhow!("VERY BAD ERROR"));
            }
        }
        self.inner.submit_batch(collection, ops).await
    }
}

pub fn url(resource: &str, batch_size: u64, page: u64) -> String {
    format!("{}/v1/{}?limit={}&page={}", BASE_URL, resource, batch_size, page)
}

/// Response envelope as served by the API. `found: None` omits `meta.found`.
pub fn page_body(results: Vec<Value>, found: Option<u64>) -> String {
    let meta = match found {
        Some(found) => json!({ "name": "openaq-api", "license": "CC BY 4.0", "found": found }),
        None => json!({ "name": "openaq-api", "license": "CC BY 4.0" }),
    };
    json!({ "meta": meta, "results": results }).to_string()
}

/// The Ulaanbaatar record from the public API docs.
pub fn ulaanbaatar() -> Value {
    json!({
        "location": "1-r khoroolol",
        "city": "Ulaanbaatar",
        "country": "MN",
        "distance": 6563510.382773982,
        "measurements": [
            { "parameter": "pm10", "value": 199, "lastUpdated": "2019-03-13T21:45:00.000Z", "unit": "µg/m³", "sourceName": "Agaar.mn" },
            { "parameter": "pm25", "value": 217, "lastUpdated": "2019-03-13T21:45:00.000Z", "unit": "µg/m³", "sourceName": "Agaar.mn" },
            { "parameter": "so2", "value": 21, "lastUpdated": "2019-03-13T21:45:00.000Z", "unit": "µg/m³", "sourceName": "Agaar.mn" },
            { "parameter": "no2", "value": 30, "lastUpdated": "2019-03-13T21:45:00.000Z", "unit": "µg/m³", "sourceName": "Agaar.mn" },
            { "parameter": "co", "value": 57, "lastUpdated": "2019-03-13T21:45:00.000Z", "unit": "µg/m³", "sourceName": "Agaar.mn" }
        ],
        "coordinates": { "latitude": 47.91798, "longitude": 106.84806 }
    })
}

pub fn location(name: &str, pm25: i64) -> Value {
    json!({
        "location": name,
        "city": "Utrecht",
        "country": "NL",
        "measurements": [
            { "parameter": "pm25", "value": pm25, "lastUpdated": "2020-06-01T10:00:00Z", "unit": "µg/m³" }
        ],
        "coordinates": { "latitude": 52.09, "longitude": 5.12 }
    })
}

/// One single-page tick: every kind answers page 1 without `meta.found`.
pub fn single_page_upstream() -> ScriptedTransport {
    ScriptedTransport::new()
        .with_page(url("latest", 1000, 1), page_body(vec![location("a", 5)], None))
        .with_page(url("cities", 1000, 1), page_body(vec![city("Utrecht", "NL")], None))
        .with_page(url("countries", 1000, 1), page_body(vec![country("NL", "Netherlands")], None))
}

pub fn city(name: &str, country: &str) -> Value {
    json!({ "name": name, "country": country, "count": 1000, "locations": 4 })
}

pub fn country(code: &str, name: &str) -> Value {
    json!({ "code": code, "name": name, "count": 50000, "cities": 12, "locations": 40 })
}
