//! `missive open`: fetch a shared letter and view it.
//!
//! Default is the interactive envelope viewer; `--plain` prints the whole
//! letter at once for pipes and scripts.

use anyhow::{Result, bail};
use clap::Args;
use std::io::Write;

use missive_core::model::LetterPublic;

use crate::client::{ApiClient, ClientError};
use crate::output::{OutputMode, kv, render_mode};
use crate::viewer;

#[derive(Args, Debug)]
pub struct OpenArgs {
    /// Slug of the shared letter, the last path segment of its link
    pub slug: String,

    /// Print the full letter without the interactive viewer
    #[arg(long)]
    pub plain: bool,
}

pub fn run_open(args: &OpenArgs, server_url: &str, output: OutputMode) -> Result<()> {
    let client = ApiClient::new(server_url, None);
    let letter = match client.public_letter(&args.slug) {
        Ok(letter) => letter,
        Err(ClientError::NotFound(message)) => bail!("Not Found: {message}"),
        Err(err) => return Err(err.into()),
    };

    if output.is_json() {
        return render_mode(output, &letter, |_, _| Ok(()));
    }
    if args.plain {
        return print_plain(&letter);
    }
    viewer::run_viewer(letter)
}

fn print_plain(letter: &LetterPublic) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    kv(&mut out, "Title", &letter.title)?;
    kv(&mut out, "To", &letter.recipient_name)?;
    kv(&mut out, "Type", &letter.letter_type.name)?;
    if !letter.description.is_empty() {
        kv(&mut out, "Description", &letter.description)?;
    }
    writeln!(out)?;

    for item in viewer::assemble::reveal_items(letter) {
        writeln!(out, "{}", item.label)?;
        for line in &item.body {
            writeln!(out, "  {line}")?;
        }
        writeln!(out)?;
    }
    Ok(())
}
