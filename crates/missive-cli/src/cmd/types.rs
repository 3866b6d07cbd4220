//! `missive types`: letter type management.

use anyhow::Result;
use clap::{Args, Subcommand};

use missive_core::model::{NewLetterType, UpdateLetterType};

use crate::client::ApiClient;
use crate::output::{OutputMode, render_mode};

use super::require_session;

#[derive(Subcommand, Debug)]
pub enum TypesCmd {
    /// List letter types
    List,
    /// Show one letter type by id
    Show(ShowTypeArgs),
    /// Create a letter type
    New(NewTypeArgs),
    /// Update a letter type
    Edit(EditTypeArgs),
    /// Delete a letter type (refused while letters reference it)
    Delete(DeleteTypeArgs),
}

#[derive(Args, Debug)]
pub struct ShowTypeArgs {
    pub id: String,
}

#[derive(Args, Debug)]
pub struct NewTypeArgs {
    #[arg(long)]
    pub name: String,

    #[arg(long, default_value = "")]
    pub description: String,
}

#[derive(Args, Debug)]
pub struct EditTypeArgs {
    pub id: String,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub description: Option<String>,
}

#[derive(Args, Debug)]
pub struct DeleteTypeArgs {
    pub id: String,
}

fn client(server_url: &str) -> Result<ApiClient> {
    let token = require_session()?;
    Ok(ApiClient::new(server_url, Some(token)))
}

pub fn run_types(cmd: &TypesCmd, server_url: &str, output: OutputMode) -> Result<()> {
    match cmd {
        TypesCmd::List => {
            let types = client(server_url)?.list_letter_types()?;
            render_mode(output, &types, |types, w| {
                for letter_type in types {
                    writeln!(
                        w,
                        "{}  {:<20} {}",
                        letter_type.id, letter_type.name, letter_type.slug
                    )?;
                }
                Ok(())
            })
        }
        TypesCmd::Show(args) => {
            let letter_type = client(server_url)?.get_letter_type(&args.id)?;
            render_mode(output, &letter_type, |t, w| {
                writeln!(w, "{}  {} ({})", t.id, t.name, t.slug)?;
                if !t.description.is_empty() {
                    writeln!(w, "{}", t.description)?;
                }
                Ok(())
            })
        }
        TypesCmd::New(args) => {
            let created = client(server_url)?.create_letter_type(&NewLetterType {
                name: args.name.clone(),
                description: args.description.clone(),
                meta_schema: None,
            })?;
            render_mode(output, &created, |t, w| {
                writeln!(w, "Created {} ({})", t.slug, t.id)
            })
        }
        TypesCmd::Edit(args) => {
            let updated = client(server_url)?.update_letter_type(
                &args.id,
                &UpdateLetterType {
                    name: args.name.clone(),
                    description: args.description.clone(),
                    meta_schema: None,
                },
            )?;
            render_mode(output, &updated, |t, w| {
                writeln!(w, "Updated {} ({})", t.slug, t.id)
            })
        }
        TypesCmd::Delete(args) => {
            client(server_url)?.delete_letter_type(&args.id)?;
            render_mode(
                output,
                &serde_json::json!({ "deleted": args.id }),
                |_, w| writeln!(w, "Deleted {}", args.id),
            )
        }
    }
}
