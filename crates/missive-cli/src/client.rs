//! HTTP client for the missive API.
//!
//! Thin wrapper over `ureq` that speaks the server's JSON contract: error
//! bodies are `{"error": "..."}` and list responses may arrive either bare
//! or wrapped in a `results` envelope.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use missive_core::model::{
    Letter, LetterPublic, LetterType, NewLetter, NewLetterType, UpdateLetter, UpdateLetterType,
    User,
};

const SESSION_COOKIE: &str = "missive_session";

/// Failures surfaced to command handlers, already shaped for display.
#[derive(Debug, Error)]
pub enum ClientError {
    /// 404 with the server's not-found message.
    #[error("{0}")]
    NotFound(String),
    /// 401, session missing/expired or credentials rejected.
    #[error("{0}")]
    Unauthorized(String),
    /// Any other non-2xx status.
    #[error("server returned {status}: {message}")]
    Api { status: u16, message: String },
    /// Connection refused, DNS failure, malformed response body.
    #[error("could not reach the server: {0}")]
    Transport(String),
}

type Result<T> = std::result::Result<T, ClientError>;

/// Lists arrive wrapped in `{"results": [...]}` from this server, but older
/// deployments returned a bare array. Accept both.
#[derive(Deserialize)]
#[serde(untagged)]
enum ListResponse<T> {
    Enveloped { results: Vec<T> },
    Bare(Vec<T>),
}

impl<T> ListResponse<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            Self::Enveloped { results } => results,
            Self::Bare(items) => items,
        }
    }
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    user: User,
}

pub struct ApiClient {
    base_url: String,
    session_token: Option<String>,
    agent: ureq::Agent,
}

impl ApiClient {
    #[must_use]
    pub fn new(base_url: &str, session_token: Option<String>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            session_token,
            agent: ureq::Agent::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn request(&self, method: &str, path: &str) -> ureq::Request {
        let mut req = self.agent.request(method, &self.url(path));
        if let Some(token) = &self.session_token {
            req = req.set("Cookie", &format!("{SESSION_COOKIE}={token}"));
        }
        req
    }

    fn handle<T: DeserializeOwned>(
        result: std::result::Result<ureq::Response, ureq::Error>,
    ) -> Result<T> {
        let response = result.map_err(classify_error)?;
        response
            .into_json()
            .map_err(|e| ClientError::Transport(format!("malformed response body: {e}")))
    }

    fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        Self::handle(self.request("GET", path).call())
    }

    fn send_json<T: DeserializeOwned>(
        &self,
        method: &str,
        path: &str,
        body: &impl serde::Serialize,
    ) -> Result<T> {
        Self::handle(self.request(method, path).send_json(body))
    }

    // -- public ------------------------------------------------------------

    pub fn public_letter(&self, slug: &str) -> Result<LetterPublic> {
        self.get(&format!("/api/letters/{slug}/"))
    }

    // -- auth --------------------------------------------------------------

    /// Log in and return the authenticated user plus the session token the
    /// server set.
    pub fn login(&self, username: &str, password: &str) -> Result<(User, String)> {
        let response = self
            .request("POST", "/api/auth/login/")
            .send_json(serde_json::json!({ "username": username, "password": password }))
            .map_err(classify_error)?;

        let token = response
            .header("set-cookie")
            .and_then(token_from_set_cookie)
            .ok_or_else(|| {
                ClientError::Transport("login response did not set a session cookie".to_string())
            })?;
        let body: LoginResponse = response
            .into_json()
            .map_err(|e| ClientError::Transport(format!("malformed response body: {e}")))?;
        Ok((body.user, token))
    }

    pub fn logout(&self) -> Result<()> {
        let _: Value = Self::handle(self.request("POST", "/api/auth/logout/").call())?;
        Ok(())
    }

    pub fn me(&self) -> Result<User> {
        self.get("/api/auth/me/")
    }

    // -- admin: letters ----------------------------------------------------

    pub fn list_letters(&self) -> Result<Vec<Letter>> {
        let list: ListResponse<Letter> = self.get("/api/admin/letters/")?;
        Ok(list.into_vec())
    }

    pub fn get_letter(&self, id: &str) -> Result<Letter> {
        self.get(&format!("/api/admin/letters/{id}/"))
    }

    pub fn create_letter(&self, new: &NewLetter) -> Result<Letter> {
        self.send_json("POST", "/api/admin/letters/", new)
    }

    pub fn update_letter(&self, id: &str, update: &UpdateLetter) -> Result<Letter> {
        self.send_json("PATCH", &format!("/api/admin/letters/{id}/"), update)
    }

    pub fn delete_letter(&self, id: &str) -> Result<()> {
        self.request("DELETE", &format!("/api/admin/letters/{id}/"))
            .call()
            .map_err(classify_error)?;
        Ok(())
    }

    // -- admin: letter types -----------------------------------------------

    pub fn list_letter_types(&self) -> Result<Vec<LetterType>> {
        let list: ListResponse<LetterType> = self.get("/api/admin/letter-types/")?;
        Ok(list.into_vec())
    }

    pub fn get_letter_type(&self, id: &str) -> Result<LetterType> {
        self.get(&format!("/api/admin/letter-types/{id}/"))
    }

    pub fn create_letter_type(&self, new: &NewLetterType) -> Result<LetterType> {
        self.send_json("POST", "/api/admin/letter-types/", new)
    }

    pub fn update_letter_type(&self, id: &str, update: &UpdateLetterType) -> Result<LetterType> {
        self.send_json("PATCH", &format!("/api/admin/letter-types/{id}/"), update)
    }

    pub fn delete_letter_type(&self, id: &str) -> Result<()> {
        self.request("DELETE", &format!("/api/admin/letter-types/{id}/"))
            .call()
            .map_err(classify_error)?;
        Ok(())
    }
}

/// Pull the session token out of a `Set-Cookie` response header.
fn token_from_set_cookie(header: &str) -> Option<String> {
    let token = header.trim().strip_prefix(&format!("{SESSION_COOKIE}="))?;
    let token = token.split(';').next().unwrap_or(token);
    (!token.is_empty()).then(|| token.to_string())
}

/// Extract the server's `error` message when the body follows the contract,
/// falling back to the raw status line.
fn classify_error(error: ureq::Error) -> ClientError {
    match error {
        ureq::Error::Status(status, response) => {
            let message = response
                .into_json::<Value>()
                .ok()
                .and_then(|body| {
                    body.get("error")
                        .and_then(Value::as_str)
                        .map(str::to_string)
                })
                .unwrap_or_else(|| format!("HTTP {status}"));
            match status {
                404 => ClientError::NotFound(message),
                401 => ClientError::Unauthorized(message),
                _ => ClientError::Api { status, message },
            }
        }
        ureq::Error::Transport(transport) => ClientError::Transport(transport.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::{ListResponse, token_from_set_cookie};
    use serde_json::json;

    #[test]
    fn list_response_accepts_envelope_and_bare_forms() {
        let enveloped: ListResponse<i64> =
            serde_json::from_value(json!({"results": [1, 2, 3]})).unwrap();
        assert_eq!(enveloped.into_vec(), vec![1, 2, 3]);

        let bare: ListResponse<i64> = serde_json::from_value(json!([4, 5])).unwrap();
        assert_eq!(bare.into_vec(), vec![4, 5]);
    }

    #[test]
    fn set_cookie_parsing() {
        assert_eq!(
            token_from_set_cookie("missive_session=abc123; Path=/; HttpOnly"),
            Some("abc123".to_string())
        );
        assert_eq!(token_from_set_cookie("other=x; Path=/"), None);
        assert_eq!(token_from_set_cookie("missive_session=; Max-Age=0"), None);
    }
}
