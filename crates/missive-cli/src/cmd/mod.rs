//! Command handlers, one module per command group.

pub mod auth;
pub mod letters;
pub mod open;
pub mod types;

use anyhow::{Result, bail};

use crate::session;

/// Admin commands check for a stored session before touching the network,
/// so a logged-out user gets an immediate local hint.
pub fn require_session() -> Result<String> {
    match session::load_token() {
        Some(token) => Ok(token),
        None => bail!("not logged in; run `missive login` first"),
    }
}
