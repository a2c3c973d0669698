//! Shared relay pipeline
//!
//! Used by both `/api/chat` and `/api/question`: check the credential,
//! resolve the model, perform exactly one upstream call, and extract the
//! reply text. Also owns the per-request outcome bookkeeping (metrics and
//! failure logging) so both endpoints report the same way.

use crate::error::{AppError, AppResult};
use crate::handlers::AppState;
use crate::metrics::{Endpoint, Outcome};
use crate::middleware::RequestId;
use crate::models::GenerateContentRequest;
use std::time::Instant;

/// Forward one request upstream and return the concatenated reply text
///
/// # Errors
///
/// - [`AppError::MissingCredential`] before any network call when no API key
///   is configured
/// - any error from [`crate::models::GeminiClient::generate_content`]
pub async fn relay(
    state: &AppState,
    request_id: RequestId,
    requested_model: Option<&str>,
    request: &GenerateContentRequest,
) -> AppResult<String> {
    let api_key = state
        .config()
        .upstream
        .api_key()
        .ok_or(AppError::MissingCredential)?;

    let model = state.catalog().resolve(requested_model);
    if let Some(rejected) = &model.fallback_from {
        tracing::warn!(
            request_id = %request_id,
            requested_model = %rejected,
            fallback_model = %model.id,
            "Requested model is not allow-listed, using default"
        );
    }

    let start = Instant::now();
    let result = state
        .client()
        .generate_content(api_key, model.id, request)
        .await;
    let duration_ms = start.elapsed().as_secs_f64() * 1000.0;

    let metrics = state.metrics();
    if let Err(e) = metrics.record_upstream_duration(model.id, duration_ms) {
        tracing::error!(
            request_id = %request_id,
            error = %e,
            "Metrics recording failed (non-fatal)"
        );
    }

    let upstream_status = match &result {
        Ok(reply) => Some(reply.status),
        Err(AppError::Upstream { status, .. }) => Some(*status),
        Err(_) => None,
    };
    if let Some(status) = upstream_status
        && let Err(e) = metrics.record_upstream_status(status)
    {
        tracing::error!(
            request_id = %request_id,
            error = %e,
            "Metrics recording failed (non-fatal)"
        );
    }

    let reply = result?.body.reply_text();

    tracing::info!(
        request_id = %request_id,
        model = %model.id,
        duration_ms,
        reply_length = reply.len(),
        "Upstream call completed"
    );

    Ok(reply)
}

/// Record the outcome of a finished relay request and log failures
pub fn record_outcome<T>(
    state: &AppState,
    endpoint: Endpoint,
    request_id: RequestId,
    result: &AppResult<T>,
) {
    let outcome = match result {
        Ok(_) => Outcome::Success,
        Err(e) => e.outcome(),
    };

    if let Err(e) = state.metrics().record_request(endpoint, outcome) {
        tracing::error!(
            request_id = %request_id,
            error = %e,
            "Metrics recording failed (non-fatal)"
        );
    }

    if let Err(err) = result {
        match outcome {
            Outcome::ClientError => tracing::debug!(
                request_id = %request_id,
                endpoint = endpoint.as_str(),
                error = %err,
                "Rejected invalid request"
            ),
            Outcome::UpstreamError => tracing::warn!(
                request_id = %request_id,
                endpoint = endpoint.as_str(),
                error = %err,
                "Upstream call failed"
            ),
            _ => tracing::error!(
                request_id = %request_id,
                endpoint = endpoint.as_str(),
                error = %err,
                "Relay request failed"
            ),
        }
    }
}
