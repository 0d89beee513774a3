//! Error-to-HTTP response conversion.
//!
//! Implements `IntoResponse` for [`rp_core::Error`] through the
//! [`AppError`] wrapper so route handlers can return
//! `Result<T, AppError>` directly.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Maximum length of a client-facing error detail.
const DETAIL_MAX_CHARS: usize = 200;

/// Wrapper so we can implement `IntoResponse` for an external type.
pub struct AppError(rp_core::Error);

impl From<rp_core::Error> for AppError {
    fn from(e: rp_core::Error) -> Self {
        Self(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        // The client gets a bounded message; the log keeps the full story.
        if status.is_server_error() {
            tracing::error!(status = %status, error = %self.0, "Request failed");
        }

        let body = json!({ "detail": truncate_detail(&self.0.to_string()) });
        (status, Json(body)).into_response()
    }
}

/// Clamp a message to [`DETAIL_MAX_CHARS`] characters.
fn truncate_detail(message: &str) -> String {
    message.chars().take(DETAIL_MAX_CHARS).collect()
}
