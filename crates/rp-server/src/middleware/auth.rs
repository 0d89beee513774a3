//! Bearer-token authentication middleware.
//!
//! The accepted token set is re-read from the environment on every request
//! so tokens can be rotated without a restart. An empty set leaves the API
//! open; that posture is logged once at startup. The check short-circuits
//! before any scratch allocation happens.

use axum::body::Body;
use axum::http::{header, Request};
use axum::middleware::Next;
use axum::response::Response;

use rp_core::config::AuthConfig;
use rp_core::Error;

use crate::error::AppError;

/// Middleware guarding the download route.
pub async fn auth_middleware(
    request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let auth = AuthConfig::from_env();
    let header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    authorize(&auth, header)?;

    Ok(next.run(request).await)
}

/// Check a raw `Authorization` value against the configured token set.
///
/// The `Bearer ` prefix is optional and surrounding whitespace is ignored.
/// An empty token set admits every request.
pub fn authorize(auth: &AuthConfig, header: Option<&str>) -> rp_core::Result<()> {
    if auth.is_open() {
        return Ok(());
    }

    let Some(value) = header else {
        return Err(Error::Unauthorized("missing Authorization header".into()));
    };

    let token = value.strip_prefix("Bearer ").unwrap_or(value).trim();
    if auth.tokens.contains(token) {
        Ok(())
    } else {
        Err(Error::Unauthorized("invalid authentication token".into()))
    }
}
