use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::block::{ContentBlock, NewContentBlock};
use super::letter_type::LetterType;
use super::user::User;

/// A recipient-addressed letter with ordered content blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Letter {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub recipient_name: String,
    pub slug: String,
    pub letter_type: LetterType,
    pub custom_properties: serde_json::Value,
    pub content_blocks: Vec<ContentBlock>,
    pub is_published: bool,
    pub published_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<User>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_url: Option<String>,
}

impl Letter {
    /// The public projection: admin-only fields stripped.
    #[must_use]
    pub fn into_public(self) -> LetterPublic {
        LetterPublic {
            id: self.id,
            title: self.title,
            description: self.description,
            recipient_name: self.recipient_name,
            slug: self.slug,
            letter_type: self.letter_type,
            custom_properties: self.custom_properties,
            content_blocks: self.content_blocks,
            created_at: self.created_at,
        }
    }
}

/// What anonymous recipients see when they open a shared link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LetterPublic {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub recipient_name: String,
    pub slug: String,
    pub letter_type: LetterType,
    pub custom_properties: serde_json::Value,
    pub content_blocks: Vec<ContentBlock>,
    pub created_at: DateTime<Utc>,
}

/// Create payload for a letter. The slug is derived from `title`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewLetter {
    pub title: String,
    pub description: String,
    pub recipient_name: String,
    pub letter_type_id: Uuid,
    #[serde(default)]
    pub custom_properties: Option<serde_json::Value>,
    #[serde(default)]
    pub content_blocks: Vec<NewContentBlock>,
}

/// Partial update payload for a letter.
///
/// When `content_blocks` is present, the letter's blocks are replaced
/// wholesale; absent means "leave blocks untouched".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateLetter {
    pub title: Option<String>,
    pub description: Option<String>,
    pub recipient_name: Option<String>,
    pub letter_type_id: Option<Uuid>,
    pub custom_properties: Option<serde_json::Value>,
    pub is_published: Option<bool>,
    pub content_blocks: Option<Vec<NewContentBlock>>,
}
