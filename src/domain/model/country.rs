use super::{lenient, Document, Entity, EntityKind};
use serde::{Deserialize, Serialize};

/// Country summary (`/v1/countries`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Country {
    #[serde(deserialize_with = "lenient::string")]
    pub code: String,
    #[serde(deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(deserialize_with = "lenient::int")]
    pub count: i64,
    #[serde(deserialize_with = "lenient::int")]
    pub cities: i64,
    #[serde(deserialize_with = "lenient::int")]
    pub locations: i64,
}

impl Entity for Country {
    const KIND: EntityKind = EntityKind::Country;

    fn natural_key(&self) -> &str {
        &self.code
    }

    fn into_document(self) -> Document {
        Document::Country(self)
    }
}
