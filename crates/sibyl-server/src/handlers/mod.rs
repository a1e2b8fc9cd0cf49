pub mod health;
pub mod inference;
pub mod model;
pub mod questions;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::error;

use sibyl_core::SibylError;

/// Maps an engine error to its HTTP status with a `{"error": ..}` body.
pub fn error_response(context: &str, err: &SibylError) -> Response {
    let status = match err {
        SibylError::NoNetworksAvailable => StatusCode::SERVICE_UNAVAILABLE,
        SibylError::NotFound(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    error!(status = %status, error = %err, "{context}");

    (
        status,
        Json(serde_json::json!({ "error": format!("{context}: {err}") })),
    )
        .into_response()
}
