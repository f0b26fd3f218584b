use super::{lenient, Document, Entity, EntityKind};
use serde::{Deserialize, Serialize};

/// City summary (`/v1/cities`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct City {
    #[serde(deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(deserialize_with = "lenient::string")]
    pub country: String,
    #[serde(deserialize_with = "lenient::int")]
    pub count: i64,
    #[serde(deserialize_with = "lenient::int")]
    pub locations: i64,
}

impl Entity for City {
    const KIND: EntityKind = EntityKind::City;

    fn natural_key(&self) -> &str {
        &self.name
    }

    fn into_document(self) -> Document {
        Document::City(self)
    }
}
