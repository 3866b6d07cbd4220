//! Error body contract: every failure is `{"error": "..."}` with a status
//! derived from the domain error code.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use missive_core::error::{CoreError, ErrorCode};

/// HTTP status for a domain error code.
#[must_use]
pub const fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::LetterNotFound | ErrorCode::LetterTypeNotFound | ErrorCode::UserNotFound => {
            StatusCode::NOT_FOUND
        }
        ErrorCode::SlugConflict => StatusCode::CONFLICT,
        ErrorCode::InvalidBlockType | ErrorCode::ValidationFailed => StatusCode::BAD_REQUEST,
        ErrorCode::InvalidCredentials
        | ErrorCode::Unauthorized
        | ErrorCode::SessionExpired => StatusCode::UNAUTHORIZED,
        ErrorCode::ConfigParseError
        | ErrorCode::CorruptDatabase
        | ErrorCode::InternalUnexpected => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Build an error response with the standard body shape.
#[must_use]
pub fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

/// Map a storage-layer failure onto the wire contract.
///
/// Validation details are safe to echo back; everything else surfaces only
/// the catalog message and lands in the log.
#[must_use]
pub fn core_error_response(err: &CoreError) -> Response {
    let code = err.code();
    let status = status_for(code);
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!(code = %code, error = %err, "request failed");
    }
    match err {
        CoreError::Validation(detail) => error_response(status, detail),
        _ => error_response(status, code.message()),
    }
}
