use rusqlite::Connection;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

use missive_core::config::ServerConfig;

use crate::session::SessionStore;

/// Shared state handed to every handler.
///
/// SQLite access is serialized through a single connection behind an async
/// mutex. Write volume here is human-scale, so one writer is plenty and it
/// sidesteps WAL writer contention entirely.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Mutex<Connection>>,
    pub sessions: Arc<Mutex<SessionStore>>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    #[must_use]
    pub fn new(conn: Connection, config: ServerConfig) -> Self {
        let ttl = Duration::from_secs(config.session_ttl_secs);
        Self {
            db: Arc::new(Mutex::new(conn)),
            sessions: Arc::new(Mutex::new(SessionStore::new(ttl))),
            config: Arc::new(config),
        }
    }

    /// Absolute share URL for a published letter slug.
    #[must_use]
    pub fn public_url(&self, slug: &str) -> String {
        let base = self.config.public_base_url.trim_end_matches('/');
        format!("{base}/letter/{slug}")
    }
}

#[cfg(test)]
mod tests {
    use super::AppState;
    use missive_core::config::ServerConfig;
    use missive_core::db::open_in_memory;

    #[test]
    fn public_url_joins_base_and_slug() {
        let config = ServerConfig {
            public_base_url: "https://letters.example.com/".to_string(),
            ..ServerConfig::default()
        };
        let state = AppState::new(open_in_memory().expect("open db"), config);
        assert_eq!(
            state.public_url("for-you"),
            "https://letters.example.com/letter/for-you"
        );
    }
}
