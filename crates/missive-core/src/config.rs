use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Server-side configuration, read from `missive.toml` next to the server
/// binary (or wherever `--config` points). Missing file means defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,
    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: u64,
    /// Base URL prefixed to letter slugs when building `public_url`.
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            database_path: default_database_path(),
            session_ttl_secs: default_session_ttl_secs(),
            public_base_url: default_public_base_url(),
        }
    }
}

/// Client-side configuration under `dirs::config_dir()/missive/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserConfig {
    #[serde(default = "default_server_url")]
    pub server_url: String,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
        }
    }
}

pub fn load_server_config(path: &Path) -> Result<ServerConfig> {
    if !path.exists() {
        return Ok(ServerConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<ServerConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

pub fn load_user_config() -> Result<UserConfig> {
    let Some(config_dir) = dirs::config_dir() else {
        return Ok(UserConfig::default());
    };

    let path = config_dir.join("missive/config.toml");
    if !path.exists() {
        return Ok(UserConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<UserConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

fn default_bind_addr() -> String {
    "127.0.0.1:8000".to_string()
}

fn default_database_path() -> PathBuf {
    PathBuf::from("missive.sqlite3")
}

const fn default_session_ttl_secs() -> u64 {
    60 * 60 * 24 * 14
}

fn default_public_base_url() -> String {
    "http://localhost:5173".to_string()
}

fn default_server_url() -> String {
    "http://localhost:8000".to_string()
}

#[cfg(test)]
mod tests {
    use super::{ServerConfig, load_server_config};
    use std::path::Path;

    #[test]
    fn missing_server_config_uses_defaults() {
        let cfg = load_server_config(Path::new("/nonexistent/missive.toml"))
            .expect("load should succeed");
        assert_eq!(cfg.bind_addr, "127.0.0.1:8000");
        assert_eq!(cfg.session_ttl_secs, 60 * 60 * 24 * 14);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let cfg: ServerConfig =
            toml::from_str("bind_addr = \"0.0.0.0:9000\"").expect("parse should succeed");
        assert_eq!(cfg.bind_addr, "0.0.0.0:9000");
        assert_eq!(cfg.database_path, std::path::PathBuf::from("missive.sqlite3"));
        assert_eq!(cfg.public_base_url, "http://localhost:5173");
    }

    #[test]
    fn invalid_toml_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("missive.toml");
        std::fs::write(&path, "bind_addr = [not toml").expect("write config");
        assert!(load_server_config(&path).is_err());
    }
}
