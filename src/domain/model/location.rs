use super::{lenient, Document, Entity, EntityKind};
use crate::domain::quality;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Latest readings of one measurement location (`/v1/latest`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeasurementLocation {
    #[serde(deserialize_with = "lenient::string")]
    pub location: String,
    #[serde(deserialize_with = "lenient::string")]
    pub city: String,
    #[serde(deserialize_with = "lenient::string")]
    pub country: String,
    #[serde(deserialize_with = "lenient::seq")]
    pub measurements: Vec<Measurement>,
    #[serde(deserialize_with = "lenient::object")]
    pub coordinates: Coordinates,
}

/// One pollutant reading. `quality_index` is never read from the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Measurement {
    #[serde(deserialize_with = "lenient::string")]
    pub parameter: String,
    /// Floats on the wire are truncated toward zero and numeric strings parsed.
    #[serde(deserialize_with = "lenient::int")]
    pub value: i64,
    #[serde(deserialize_with = "lenient::string")]
    pub unit: String,
    #[serde(
        rename(serialize = "updated_at", deserialize = "lastUpdated"),
        deserialize_with = "lenient::timestamp"
    )]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(skip_deserializing)]
    pub quality_index: u8,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Coordinates {
    #[serde(deserialize_with = "lenient::float")]
    pub latitude: f64,
    #[serde(deserialize_with = "lenient::float")]
    pub longitude: f64,
}

impl Measurement {
    pub fn classify(&mut self) {
        self.quality_index = quality::classify(&self.parameter, self.value, &self.unit);
    }
}

impl Entity for MeasurementLocation {
    const KIND: EntityKind = EntityKind::Location;

    fn natural_key(&self) -> &str {
        &self.location
    }

    fn enrich(&mut self) {
        for m in &mut self.measurements {
            m.classify();
        }
    }

    fn into_document(self) -> Document {
        Document::Location(self)
    }
}
