//! Session token persistence under the user config directory.
//!
//! The token lives in `missive/session` next to `config.toml`. Admin
//! commands check for it before issuing any request so a logged-out user
//! gets a local hint instead of a server round-trip.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

const SESSION_FILE: &str = "session";

fn session_path() -> Option<PathBuf> {
    let dir = std::env::var_os("MISSIVE_CONFIG_DIR")
        .map(PathBuf::from)
        .or_else(|| dirs::config_dir().map(|d| d.join("missive")))?;
    Some(dir.join(SESSION_FILE))
}

/// The stored session token, if any.
pub fn load_token() -> Option<String> {
    load_token_at(&session_path()?)
}

/// Persist a fresh session token, creating the config directory if needed.
pub fn store_token(token: &str) -> Result<()> {
    let path = session_path().context("no config directory available")?;
    store_token_at(&path, token)
}

/// Forget the stored token. Missing file is fine.
pub fn clear_token() -> Result<()> {
    let Some(path) = session_path() else {
        return Ok(());
    };
    clear_token_at(&path)
}

fn load_token_at(path: &Path) -> Option<String> {
    let raw = std::fs::read_to_string(path).ok()?;
    let token = raw.trim();
    (!token.is_empty()).then(|| token.to_string())
}

fn store_token_at(path: &Path, token: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create {}", parent.display()))?;
    }
    std::fs::write(path, token).with_context(|| format!("write {}", path.display()))
}

fn clear_token_at(path: &Path) -> Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).with_context(|| format!("remove {}", path.display())),
    }
}
