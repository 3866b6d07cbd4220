//! `missive login` / `logout` / `whoami`: session management.

use anyhow::{Context, Result};
use clap::Args;
use std::io::Write;

use crate::client::{ApiClient, ClientError};
use crate::output::{OutputMode, kv, render_mode};
use crate::session;

use super::require_session;

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Staff account username (prompted when omitted)
    #[arg(long)]
    pub username: Option<String>,

    /// Password (prompted when omitted; note the prompt echoes)
    #[arg(long)]
    pub password: Option<String>,
}

fn prompt(label: &str) -> Result<String> {
    print!("{label}: ");
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin()
        .read_line(&mut line)
        .context("read from stdin")?;
    Ok(line.trim().to_string())
}

pub fn run_login(args: &LoginArgs, server_url: &str, output: OutputMode) -> Result<()> {
    let username = match &args.username {
        Some(username) => username.clone(),
        None => prompt("Username")?,
    };
    let password = match &args.password {
        Some(password) => password.clone(),
        None => prompt("Password")?,
    };

    let client = ApiClient::new(server_url, None);
    let (user, token) = client.login(&username, &password)?;
    session::store_token(&token)?;
    tracing::debug!(username = %user.username, "session stored");

    render_mode(output, &user, |user, w| {
        writeln!(w, "Logged in as {}", user.username)
    })
}

pub fn run_logout(server_url: &str, output: OutputMode) -> Result<()> {
    let Some(token) = session::load_token() else {
        if !output.is_json() {
            println!("Not logged in.");
        }
        return Ok(());
    };

    let client = ApiClient::new(server_url, Some(token));
    match client.logout() {
        // A dead session still clears locally.
        Ok(()) | Err(ClientError::Unauthorized(_)) => {}
        Err(err) => return Err(err.into()),
    }
    session::clear_token()?;

    render_mode(
        output,
        &serde_json::json!({ "message": "Logout successful" }),
        |_, w| writeln!(w, "Logged out."),
    )
}

pub fn run_whoami(server_url: &str, output: OutputMode) -> Result<()> {
    let token = require_session()?;
    let client = ApiClient::new(server_url, Some(token));
    let user = client.me()?;

    render_mode(output, &user, |user, w| {
        kv(w, "Username", &user.username)?;
        kv(w, "Email", &user.email)?;
        kv(w, "Staff", if user.is_staff { "yes" } else { "no" })
    })
}
