use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use uuid::Uuid;

use crate::error::CoreError;

/// The three content block kinds. Only `text` is rendered by the reveal
/// engine; `image` and `rich_text` are carried through as inert data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockType {
    Text,
    Image,
    RichText,
}

impl BlockType {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Image => "image",
            Self::RichText => "rich_text",
        }
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlockType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "image" => Ok(Self::Image),
            "rich_text" => Ok(Self::RichText),
            _ => Err(CoreError::InvalidBlockType(s.to_string())),
        }
    }
}

/// An ordered, typed unit of letter content.
///
/// `content` shape varies by `block_type`:
/// text: `{"text": "..."}`, image: `{"url": "...", "caption": "..."}`,
/// rich_text: `{"html": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentBlock {
    pub id: Uuid,
    pub block_type: BlockType,
    pub order: i64,
    pub content: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl ContentBlock {
    /// The literal text of a `text` block, when present and well-formed.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        if self.block_type != BlockType::Text {
            return None;
        }
        self.content.get("text").and_then(serde_json::Value::as_str)
    }
}

/// Block payload accepted on letter create/update (no server-side fields).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewContentBlock {
    pub block_type: BlockType,
    pub order: i64,
    pub content: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::{BlockType, ContentBlock};
    use chrono::Utc;
    use serde_json::json;
    use std::str::FromStr;
    use uuid::Uuid;

    #[test]
    fn block_type_json_roundtrips() {
        assert_eq!(serde_json::to_string(&BlockType::Text).unwrap(), "\"text\"");
        assert_eq!(
            serde_json::to_string(&BlockType::RichText).unwrap(),
            "\"rich_text\""
        );
        assert_eq!(
            serde_json::from_str::<BlockType>("\"image\"").unwrap(),
            BlockType::Image
        );
    }

    #[test]
    fn block_type_display_parse_roundtrips() {
        for value in [BlockType::Text, BlockType::Image, BlockType::RichText] {
            let rendered = value.to_string();
            let reparsed = BlockType::from_str(&rendered).unwrap();
            assert_eq!(value, reparsed);
        }
    }

    #[test]
    fn parse_rejects_unknown_block_type() {
        assert!(BlockType::from_str("video").is_err());
    }

    fn block(block_type: BlockType, content: serde_json::Value) -> ContentBlock {
        ContentBlock {
            id: Uuid::new_v4(),
            block_type,
            order: 0,
            content,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn text_accessor_only_reads_text_blocks() {
        let text = block(BlockType::Text, json!({"text": "Hello"}));
        assert_eq!(text.text(), Some("Hello"));

        let image = block(BlockType::Image, json!({"url": "x.png"}));
        assert_eq!(image.text(), None);

        let malformed = block(BlockType::Text, json!({"body": "nope"}));
        assert_eq!(malformed.text(), None);
    }
}
