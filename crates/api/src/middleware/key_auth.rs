//! Shared-secret header gates for the reader-facing and management APIs.
//!
//! Reader devices authenticate with a fleet-wide `X-Reader-Key`; the
//! management surface uses a separate `X-Admin-Key`. Both are pass-through
//! gates at the edge: a mismatch is terminal for the request.

use axum::{
    body::Body,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::app::AppState;
use crate::error::ApiError;
use shared::crypto::verify_shared_key;

/// Rejects requests whose `X-Reader-Key` header does not match the
/// configured reader secret.
pub async fn require_reader_key(
    axum::extract::State(state): axum::extract::State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    if header_matches(&req, "X-Reader-Key", &state.config.security.reader_key) {
        next.run(req).await
    } else {
        ApiError::Unauthorized.into_response()
    }
}

/// Rejects requests whose `X-Admin-Key` header does not match the
/// configured admin secret.
pub async fn require_admin_key(
    axum::extract::State(state): axum::extract::State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    if header_matches(&req, "X-Admin-Key", &state.config.security.admin_key) {
        next.run(req).await
    } else {
        ApiError::Unauthorized.into_response()
    }
}

fn header_matches(req: &Request<Body>, header: &str, expected: &str) -> bool {
    req.headers()
        .get(header)
        .and_then(|v| v.to_str().ok())
        .map(|presented| verify_shared_key(presented, expected))
        .unwrap_or(false)
}
