//! Turn a fetched letter into the viewer's renderable reveal list.
//!
//! Each content block becomes one [`RevealItem`] keyed by the block id.
//! Items are rebuilt from scratch whenever a new letter is loaded, so
//! unlock state from one letter can never bleed into another.

use missive_core::model::{BlockType, ContentBlock, LetterPublic};

/// One revealable unit on the letter screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealItem {
    /// Unlock key, `None` for blocks with no usable id. Keyless blocks
    /// render permanently locked rather than sharing an unlock bucket.
    pub key: Option<String>,
    pub label: String,
    /// Lines shown once the block is revealed.
    pub body: Vec<String>,
}

fn label_for(block: &ContentBlock, index: usize) -> String {
    let kind = match block.block_type {
        BlockType::Text => "Passage",
        BlockType::Image => "Image",
        BlockType::RichText => "Formatted passage",
    };
    format!("{kind} {}", index + 1)
}

fn body_for(block: &ContentBlock) -> Vec<String> {
    match block.block_type {
        BlockType::Text => block
            .text()
            .unwrap_or("(empty)")
            .lines()
            .map(str::to_string)
            .collect(),
        BlockType::Image => {
            let url = block
                .content
                .get("url")
                .and_then(serde_json::Value::as_str)
                .unwrap_or("(no url)");
            let caption = block
                .content
                .get("caption")
                .and_then(serde_json::Value::as_str);
            let mut lines = vec![format!("[image] {url}")];
            if let Some(caption) = caption {
                lines.push(caption.to_string());
            }
            lines
        }
        BlockType::RichText => vec!["[formatted content, open in a browser]".to_string()],
    }
}

/// Build the reveal list for a letter, ordered by block order.
#[must_use]
pub fn reveal_items(letter: &LetterPublic) -> Vec<RevealItem> {
    let mut blocks: Vec<&ContentBlock> = letter.content_blocks.iter().collect();
    blocks.sort_by_key(|block| block.order);

    blocks
        .iter()
        .enumerate()
        .map(|(index, block)| RevealItem {
            key: (!block.id.is_nil()).then(|| block.id.to_string()),
            label: label_for(block, index),
            body: body_for(block),
        })
        .collect()
}
