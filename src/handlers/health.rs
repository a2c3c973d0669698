//! Health check endpoint
//!
//! Provides a simple health check for monitoring and load balancers.

use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;

use crate::handlers::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: &'static str,
    /// Whether an upstream API key is configured (the key itself is never shown)
    pub upstream_configured: bool,
}

/// Health check handler
///
/// Always returns 200 OK: a missing credential only affects relay requests,
/// not the process.
pub async fn handler(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "OK",
            upstream_configured: state.config().upstream.api_key().is_some(),
        }),
    )
}
