//! The anonymous read path: a published letter by slug.

use axum::Json;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};

use missive_core::db::query;

use crate::state::AppState;

use super::error::core_error_response;

/// `GET /api/letters/{slug}/`
///
/// Unpublished and unknown slugs both 404 with the same body, so a link
/// never reveals whether a draft exists.
pub async fn get_letter(State(state): State<AppState>, Path(slug): Path<String>) -> Response {
    let conn = state.db.lock().await;
    match query::get_published_letter_by_slug(&conn, &slug) {
        Ok(letter) => Json(letter.into_public()).into_response(),
        Err(err) => core_error_response(&err),
    }
}
