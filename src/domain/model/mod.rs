//! Entity shapes persisted by the sync pipeline.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::fmt;

pub mod city;
pub mod country;
pub mod lenient;
pub mod location;

pub use city::City;
pub use country::Country;
pub use location::{Coordinates, Measurement, MeasurementLocation};

/// The three kinds of entity the upstream API serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Location,
    City,
    Country,
}

impl EntityKind {
    /// Processing order of one tick.
    pub const ALL: [EntityKind; 3] = [EntityKind::Location, EntityKind::City, EntityKind::Country];

    /// Path segment under `/v1/` on the upstream API.
    pub fn resource(self) -> &'static str {
        match self {
            EntityKind::Location => "latest",
            EntityKind::City => "cities",
            EntityKind::Country => "countries",
        }
    }

    /// Name of the collection (table) the entities are stored in.
    pub fn collection(self) -> &'static str {
        match self {
            EntityKind::Location => "measurements",
            EntityKind::City => "cities",
            EntityKind::Country => "countries",
        }
    }

    /// Document field holding the natural key.
    pub fn natural_key_field(self) -> &'static str {
        match self {
            EntityKind::Location => "location",
            EntityKind::City => "name",
            EntityKind::Country => "code",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.resource())
    }
}

/// Contract every stored entity shape fulfils.
///
/// Implementations decode permissively from the upstream wire record
/// (missing or mistyped fields fall back to zero values) and serialize into
/// the stored document shape.
pub trait Entity: DeserializeOwned + Serialize + Send + Sync + 'static {
    const KIND: EntityKind;

    /// Value of the natural key field ([`EntityKind::natural_key_field`]).
    fn natural_key(&self) -> &str;

    /// Derived fields computed once, right after decoding.
    fn enrich(&mut self) {}

    fn into_document(self) -> Document;
}

/// A normalized entity on its way to the store.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Document {
    Location(MeasurementLocation),
    City(City),
    Country(Country),
}

impl Document {
    pub fn kind(&self) -> EntityKind {
        match self {
            Document::Location(_) => EntityKind::Location,
            Document::City(_) => EntityKind::City,
            Document::Country(_) => EntityKind::Country,
        }
    }

    pub fn natural_key(&self) -> &str {
        match self {
            Document::Location(loc) => loc.natural_key(),
            Document::City(city) => city.natural_key(),
            Document::Country(country) => country.natural_key(),
        }
    }

    /// Stored JSON form of the document.
    pub fn to_json(&self) -> serde_json::Result<JsonValue> {
        serde_json::to_value(self)
    }
}
