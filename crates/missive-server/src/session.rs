//! In-memory session store and cookie plumbing.
//!
//! Tokens are random 32-character alphanumeric strings carried by an
//! HttpOnly cookie. Sessions expire after the configured TTL; expired
//! entries are purged on lookup and swept whenever a new session is
//! minted, so the map stays bounded by live sessions.

use rand::{Rng, distributions::Alphanumeric};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Cookie name carrying the session token.
pub const SESSION_COOKIE: &str = "missive_session";

const TOKEN_LEN: usize = 32;

struct Session {
    user_id: Uuid,
    expires_at: Instant,
}

/// TTL-bounded map from session token to user id.
pub struct SessionStore {
    ttl: Duration,
    sessions: HashMap<String, Session>,
}

impl SessionStore {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            sessions: HashMap::new(),
        }
    }

    /// Mint a fresh token for `user_id` and record its expiry. Sweeps
    /// expired sessions so abandoned tokens do not accumulate.
    pub fn create(&mut self, user_id: Uuid) -> String {
        let now = Instant::now();
        self.sessions.retain(|_, session| session.expires_at > now);

        let token: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(TOKEN_LEN)
            .map(char::from)
            .collect();
        self.sessions.insert(
            token.clone(),
            Session {
                user_id,
                expires_at: now + self.ttl,
            },
        );
        token
    }

    /// Resolve a token to its user, dropping the session when expired.
    pub fn resolve(&mut self, token: &str) -> Option<Uuid> {
        let expired = match self.sessions.get(token) {
            Some(session) => session.expires_at <= Instant::now(),
            None => return None,
        };
        if expired {
            self.sessions.remove(token);
            return None;
        }
        self.sessions.get(token).map(|s| s.user_id)
    }

    /// Remove a session. Returns whether a session was present.
    pub fn revoke(&mut self, token: &str) -> bool {
        self.sessions.remove(token).is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

/// Extract the session token from a `Cookie` request header value.
#[must_use]
pub fn token_from_cookie_header(header: &str) -> Option<&str> {
    header.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE).then_some(value)
    })
}

/// `Set-Cookie` value establishing a session for `max_age`.
#[must_use]
pub fn set_cookie_value(token: &str, max_age: Duration) -> String {
    format!(
        "{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        max_age.as_secs()
    )
}

/// `Set-Cookie` value clearing the session cookie.
#[must_use]
pub fn clear_cookie_value() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

#[cfg(test)]
mod tests {
    use super::{
        SESSION_COOKIE, SessionStore, clear_cookie_value, set_cookie_value,
        token_from_cookie_header,
    };
    use std::time::Duration;
    use uuid::Uuid;

    #[test]
    fn create_resolve_revoke_roundtrip() {
        let mut store = SessionStore::new(Duration::from_secs(60));
        let user_id = Uuid::new_v4();

        let token = store.create(user_id);
        assert_eq!(token.len(), 32);
        assert_eq!(store.resolve(&token), Some(user_id));

        assert!(store.revoke(&token));
        assert_eq!(store.resolve(&token), None);
        assert!(!store.revoke(&token));
    }

    #[test]
    fn expired_sessions_are_purged_on_lookup() {
        let mut store = SessionStore::new(Duration::ZERO);
        let token = store.create(Uuid::new_v4());
        assert_eq!(store.resolve(&token), None);
        assert!(store.is_empty());
    }

    #[test]
    fn stale_sessions_are_swept_on_create() {
        let mut store = SessionStore::new(Duration::ZERO);
        let abandoned = store.create(Uuid::new_v4());

        // The dead token is never presented again; minting a new session
        // still reclaims it.
        store.create(Uuid::new_v4());
        assert_eq!(store.len(), 1);
        assert_eq!(store.resolve(&abandoned), None);
    }

    #[test]
    fn tokens_are_unique_per_session() {
        let mut store = SessionStore::new(Duration::from_secs(60));
        let a = store.create(Uuid::new_v4());
        let b = store.create(Uuid::new_v4());
        assert_ne!(a, b);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn cookie_header_parsing_finds_our_cookie() {
        let header = format!("theme=dark; {SESSION_COOKIE}=abc123; other=1");
        assert_eq!(token_from_cookie_header(&header), Some("abc123"));
        assert_eq!(token_from_cookie_header("theme=dark"), None);
        assert_eq!(token_from_cookie_header(""), None);
    }

    #[test]
    fn set_cookie_values_are_http_only() {
        let set = set_cookie_value("tok", Duration::from_secs(120));
        assert!(set.contains("HttpOnly"));
        assert!(set.contains("Max-Age=120"));

        let clear = clear_cookie_value();
        assert!(clear.contains("Max-Age=0"));
    }
}
