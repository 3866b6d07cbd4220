//! Staff-only management endpoints for letters and letter types.
//!
//! Every handler runs the session guard first; list responses are wrapped
//! in a `results` envelope.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::json;
use uuid::Uuid;

use missive_core::db::query;
use missive_core::model::{Letter, NewLetter, NewLetterType, UpdateLetter, UpdateLetterType};

use crate::state::AppState;

use super::auth::require_staff;
use super::error::core_error_response;

fn with_public_url(state: &AppState, mut letter: Letter) -> Letter {
    letter.public_url = Some(state.public_url(&letter.slug));
    letter
}

// ---------------------------------------------------------------------------
// Letters
// ---------------------------------------------------------------------------

pub async fn list_letters(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Err(rejection) = require_staff(&state, &headers).await {
        return rejection;
    }

    let conn = state.db.lock().await;
    match query::list_letters(&conn) {
        Ok(letters) => {
            let letters: Vec<Letter> = letters
                .into_iter()
                .map(|letter| with_public_url(&state, letter))
                .collect();
            Json(json!({ "results": letters })).into_response()
        }
        Err(err) => core_error_response(&err),
    }
}

pub async fn create_letter(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<NewLetter>,
) -> Response {
    let user = match require_staff(&state, &headers).await {
        Ok(user) => user,
        Err(rejection) => return rejection,
    };

    let mut conn = state.db.lock().await;
    match query::insert_letter(&mut conn, &body, &user) {
        Ok(letter) => {
            tracing::info!(slug = %letter.slug, "letter created");
            (StatusCode::CREATED, Json(with_public_url(&state, letter))).into_response()
        }
        Err(err) => core_error_response(&err),
    }
}

pub async fn get_letter(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Response {
    if let Err(rejection) = require_staff(&state, &headers).await {
        return rejection;
    }

    let conn = state.db.lock().await;
    match query::get_letter(&conn, id) {
        Ok(letter) => Json(with_public_url(&state, letter)).into_response(),
        Err(err) => core_error_response(&err),
    }
}

pub async fn patch_letter(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateLetter>,
) -> Response {
    if let Err(rejection) = require_staff(&state, &headers).await {
        return rejection;
    }

    let mut conn = state.db.lock().await;
    match query::update_letter(&mut conn, id, &body) {
        Ok(letter) => Json(with_public_url(&state, letter)).into_response(),
        Err(err) => core_error_response(&err),
    }
}

pub async fn delete_letter(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Response {
    if let Err(rejection) = require_staff(&state, &headers).await {
        return rejection;
    }

    let conn = state.db.lock().await;
    match query::delete_letter(&conn, id) {
        Ok(()) => {
            tracing::info!(%id, "letter deleted");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(err) => core_error_response(&err),
    }
}

// ---------------------------------------------------------------------------
// Letter types
// ---------------------------------------------------------------------------

pub async fn list_letter_types(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Err(rejection) = require_staff(&state, &headers).await {
        return rejection;
    }

    let conn = state.db.lock().await;
    match query::list_letter_types(&conn) {
        Ok(types) => Json(json!({ "results": types })).into_response(),
        Err(err) => core_error_response(&err),
    }
}

pub async fn create_letter_type(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<NewLetterType>,
) -> Response {
    if let Err(rejection) = require_staff(&state, &headers).await {
        return rejection;
    }

    let conn = state.db.lock().await;
    match query::insert_letter_type(&conn, &body) {
        Ok(letter_type) => {
            tracing::info!(slug = %letter_type.slug, "letter type created");
            (StatusCode::CREATED, Json(letter_type)).into_response()
        }
        Err(err) => core_error_response(&err),
    }
}

pub async fn get_letter_type(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Response {
    if let Err(rejection) = require_staff(&state, &headers).await {
        return rejection;
    }

    let conn = state.db.lock().await;
    match query::get_letter_type(&conn, id) {
        Ok(letter_type) => Json(letter_type).into_response(),
        Err(err) => core_error_response(&err),
    }
}

pub async fn patch_letter_type(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateLetterType>,
) -> Response {
    if let Err(rejection) = require_staff(&state, &headers).await {
        return rejection;
    }

    let conn = state.db.lock().await;
    match query::update_letter_type(&conn, id, &body) {
        Ok(letter_type) => Json(letter_type).into_response(),
        Err(err) => core_error_response(&err),
    }
}

pub async fn delete_letter_type(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Response {
    if let Err(rejection) = require_staff(&state, &headers).await {
        return rejection;
    }

    let conn = state.db.lock().await;
    match query::delete_letter_type(&conn, id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => core_error_response(&err),
    }
}
