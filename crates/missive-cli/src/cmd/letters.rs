//! `missive letters`: staff letter management.

use anyhow::{Context, Result, bail};
use clap::{Args, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use uuid::Uuid;

use missive_core::model::{
    BlockType, Letter, NewContentBlock, NewLetter, UpdateLetter,
};

use crate::client::ApiClient;
use crate::output::{OutputMode, kv, render_mode};

use super::require_session;

#[derive(Subcommand, Debug)]
pub enum LettersCmd {
    /// List all letters, drafts included
    List,
    /// Show one letter by id
    Show(ShowArgs),
    /// Create a letter
    New(NewArgs),
    /// Update a letter (partial; only the given fields change)
    Edit(EditArgs),
    /// Delete a letter and its blocks
    Delete(DeleteArgs),
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    pub id: String,
}

#[derive(Args, Debug)]
pub struct NewArgs {
    #[arg(long)]
    pub title: String,

    #[arg(long)]
    pub recipient: String,

    /// Letter type id (see `missive types list`)
    #[arg(long, value_name = "UUID")]
    pub type_id: Uuid,

    #[arg(long, default_value = "")]
    pub description: String,

    /// Add a text block; repeat for multiple blocks, in order
    #[arg(long = "text", value_name = "TEXT")]
    pub texts: Vec<String>,

    /// Read content blocks from a JSON file instead of --text
    #[arg(long, value_name = "PATH", conflicts_with = "texts")]
    pub blocks: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct EditArgs {
    pub id: String,

    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub recipient: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    /// Publish the letter, making its share link live
    #[arg(long, conflicts_with = "unpublish")]
    pub publish: bool,

    /// Take the share link down again
    #[arg(long)]
    pub unpublish: bool,

    /// Replace all content blocks from a JSON file
    #[arg(long, value_name = "PATH")]
    pub blocks: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    pub id: String,
}

fn read_blocks(path: &PathBuf) -> Result<Vec<NewContentBlock>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))
}

fn text_blocks(texts: &[String]) -> Vec<NewContentBlock> {
    texts
        .iter()
        .enumerate()
        .map(|(order, text)| NewContentBlock {
            block_type: BlockType::Text,
            order: order as i64,
            content: serde_json::json!({ "text": text }),
        })
        .collect()
}

fn client(server_url: &str) -> Result<ApiClient> {
    let token = require_session()?;
    Ok(ApiClient::new(server_url, Some(token)))
}

fn print_letter_line(w: &mut dyn Write, letter: &Letter) -> std::io::Result<()> {
    let state = if letter.is_published {
        "published"
    } else {
        "draft"
    };
    writeln!(
        w,
        "{}  {:<30} {:<9} {}",
        letter.id, letter.title, state, letter.slug
    )
}

fn print_letter_detail(w: &mut dyn Write, letter: &Letter) -> std::io::Result<()> {
    kv(w, "Id", letter.id.to_string())?;
    kv(w, "Title", &letter.title)?;
    kv(w, "To", &letter.recipient_name)?;
    kv(w, "Slug", &letter.slug)?;
    kv(w, "Type", &letter.letter_type.name)?;
    kv(
        w,
        "Published",
        if letter.is_published { "yes" } else { "no" },
    )?;
    if let Some(url) = &letter.public_url {
        kv(w, "Share link", url)?;
    }
    kv(w, "Blocks", letter.content_blocks.len().to_string())?;
    Ok(())
}

pub fn run_letters(cmd: &LettersCmd, server_url: &str, output: OutputMode) -> Result<()> {
    match cmd {
        LettersCmd::List => {
            let letters = client(server_url)?.list_letters()?;
            render_mode(output, &letters, |letters, w| {
                for letter in letters {
                    print_letter_line(w, letter)?;
                }
                Ok(())
            })
        }
        LettersCmd::Show(args) => {
            let letter = client(server_url)?.get_letter(&args.id)?;
            render_mode(output, &letter, |letter, w| print_letter_detail(w, letter))
        }
        LettersCmd::New(args) => {
            let content_blocks = match &args.blocks {
                Some(path) => read_blocks(path)?,
                None => text_blocks(&args.texts),
            };
            let new = NewLetter {
                title: args.title.clone(),
                description: args.description.clone(),
                recipient_name: args.recipient.clone(),
                letter_type_id: args.type_id,
                custom_properties: None,
                content_blocks,
            };

            let letter = client(server_url)?.create_letter(&new)?;
            render_mode(output, &letter, |letter, w| {
                writeln!(w, "Created {} ({})", letter.slug, letter.id)?;
                if let Some(url) = &letter.public_url {
                    writeln!(w, "Share link (after publishing): {url}")?;
                }
                Ok(())
            })
        }
        LettersCmd::Edit(args) => {
            let update = UpdateLetter {
                title: args.title.clone(),
                description: args.description.clone(),
                recipient_name: args.recipient.clone(),
                letter_type_id: None,
                custom_properties: None,
                is_published: match (args.publish, args.unpublish) {
                    (true, _) => Some(true),
                    (_, true) => Some(false),
                    _ => None,
                },
                content_blocks: match &args.blocks {
                    Some(path) => Some(read_blocks(path)?),
                    None => None,
                },
            };
            if update.title.is_none()
                && update.description.is_none()
                && update.recipient_name.is_none()
                && update.is_published.is_none()
                && update.content_blocks.is_none()
            {
                bail!("nothing to change; pass at least one field flag");
            }

            let letter = client(server_url)?.update_letter(&args.id, &update)?;
            render_mode(output, &letter, |letter, w| print_letter_detail(w, letter))
        }
        LettersCmd::Delete(args) => {
            client(server_url)?.delete_letter(&args.id)?;
            render_mode(
                output,
                &serde_json::json!({ "deleted": args.id }),
                |_, w| writeln!(w, "Deleted {}", args.id),
            )
        }
    }
}
