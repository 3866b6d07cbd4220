use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A letter template: a named category with an opaque metadata schema.
///
/// `meta_schema` describes the expected shape of a letter's
/// `custom_properties`. It is stored and served verbatim; nothing validates
/// letters against it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LetterType {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub meta_schema: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create payload for a letter type. The slug is derived from `name`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewLetterType {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub meta_schema: Option<serde_json::Value>,
}

/// Partial update payload for a letter type.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateLetterType {
    pub name: Option<String>,
    pub description: Option<String>,
    pub meta_schema: Option<serde_json::Value>,
}
