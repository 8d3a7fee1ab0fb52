//! Route handlers, grouped by resource

pub mod alerts;
pub mod auth;
pub mod complaints;
pub mod media;
pub mod system;
pub mod users;
pub mod voters;

pub use alerts::*;
pub use auth::*;
pub use complaints::*;
pub use media::*;
pub use system::*;
pub use users::*;
pub use voters::*;

use axum::{extract::rejection::JsonRejection, http::StatusCode, Json};
use sea_orm::DbErr;
use tracing::error;

use crate::models::{ApiError, ApiResult, ErrorResponse};

pub(crate) fn bad_request(message: impl Into<String>) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse::new(message, "VALIDATION_ERROR")),
    )
}

pub(crate) fn not_found(message: impl Into<String>) -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new(message, "NOT_FOUND")),
    )
}

pub(crate) fn db_error(e: DbErr) -> ApiError {
    error!("Database error: {}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new("Server error", "DATABASE_ERROR")),
    )
}

/// Unwrap a JSON body, turning rejections into a 400 carrying the parser message
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| bad_request(rejection.body_text()))
}

/// `Some(trimmed)` when the value has visible content
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
