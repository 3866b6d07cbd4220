//! Session endpoints: login, logout, current user.

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use missive_core::auth::verify_password;
use missive_core::db::query;
use missive_core::error::ErrorCode;
use missive_core::model::User;

use crate::session::{clear_cookie_value, set_cookie_value, token_from_cookie_header};
use crate::state::AppState;

use super::error::{core_error_response, error_response, status_for};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    password: Option<String>,
}

fn session_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::COOKIE)
        .and_then(|value| value.to_str().ok())
        .and_then(token_from_cookie_header)
}

/// Resolve the request's session cookie to a staff user, or produce the
/// 401 the caller should return as-is.
pub async fn require_staff(state: &AppState, headers: &HeaderMap) -> Result<User, Response> {
    let unauthorized = || {
        error_response(
            status_for(ErrorCode::Unauthorized),
            ErrorCode::Unauthorized.message(),
        )
    };

    let Some(token) = session_token(headers) else {
        return Err(unauthorized());
    };
    let Some(user_id) = state.sessions.lock().await.resolve(token) else {
        return Err(unauthorized());
    };

    let conn = state.db.lock().await;
    let user = match query::get_user(&conn, user_id) {
        Ok(user) => user,
        // Session outlived the account.
        Err(missive_core::error::CoreError::UserNotFound(_)) => return Err(unauthorized()),
        Err(err) => return Err(core_error_response(&err)),
    };
    if !user.is_staff {
        return Err(unauthorized());
    }
    Ok(user)
}

pub async fn login(State(state): State<AppState>, Json(body): Json<LoginRequest>) -> Response {
    let (Some(username), Some(password)) = (body.username.as_deref(), body.password.as_deref())
    else {
        return error_response(StatusCode::BAD_REQUEST, "Username and password required");
    };

    let credentials = {
        let conn = state.db.lock().await;
        match query::find_credentials(&conn, username) {
            Ok(found) => found,
            Err(err) => return core_error_response(&err),
        }
    };

    let authenticated = credentials.and_then(|(user, hash)| {
        (verify_password(password, &hash) && user.is_staff).then_some(user)
    });
    let Some(user) = authenticated else {
        tracing::info!(username, "login rejected");
        return error_response(
            status_for(ErrorCode::InvalidCredentials),
            ErrorCode::InvalidCredentials.message(),
        );
    };

    let token = state.sessions.lock().await.create(user.id);
    let ttl = Duration::from_secs(state.config.session_ttl_secs);
    tracing::info!(username = %user.username, "login succeeded");

    (
        [(header::SET_COOKIE, set_cookie_value(&token, ttl))],
        Json(json!({ "user": user, "message": "Login successful" })),
    )
        .into_response()
}

pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Err(rejection) = require_staff(&state, &headers).await {
        return rejection;
    }
    if let Some(token) = session_token(&headers) {
        state.sessions.lock().await.revoke(token);
    }

    (
        [(header::SET_COOKIE, clear_cookie_value())],
        Json(json!({ "message": "Logout successful" })),
    )
        .into_response()
}

pub async fn me(State(state): State<AppState>, headers: HeaderMap) -> Response {
    match require_staff(&state, &headers).await {
        Ok(user) => Json(user).into_response(),
        Err(rejection) => rejection,
    }
}
