//! HTTP surface: route table and handlers.
//!
//! Paths use trailing slashes so existing web clients keep working
//! unchanged.

pub mod admin;
pub mod auth;
pub mod error;
pub mod public;

use axum::Router;
use axum::http::StatusCode;
use axum::response::Response;
use axum::routing::{get, post};

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/letters/:slug/", get(public::get_letter))
        .route("/api/auth/login/", post(auth::login))
        .route("/api/auth/logout/", post(auth::logout))
        .route("/api/auth/me/", get(auth::me))
        .route(
            "/api/admin/letters/",
            get(admin::list_letters).post(admin::create_letter),
        )
        .route(
            "/api/admin/letters/:id/",
            get(admin::get_letter)
                .patch(admin::patch_letter)
                .delete(admin::delete_letter),
        )
        .route(
            "/api/admin/letter-types/",
            get(admin::list_letter_types).post(admin::create_letter_type),
        )
        .route(
            "/api/admin/letter-types/:id/",
            get(admin::get_letter_type)
                .patch(admin::patch_letter_type)
                .delete(admin::delete_letter_type),
        )
        .fallback(unknown_route)
        .with_state(state)
}

async fn unknown_route() -> Response {
    error::error_response(StatusCode::NOT_FOUND, "Not found")
}
