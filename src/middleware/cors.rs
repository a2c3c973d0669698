//! Cross-origin policy for browser clients

use crate::config::CorsConfig;
use axum::http::{HeaderName, HeaderValue, Method, header};
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};

use super::REQUEST_ID_HEADER;

/// Build the CORS layer from configuration
///
/// An empty origin list allows any origin. Origins that are not valid header
/// values are skipped with a warning; if none survive, no origin is allowed.
pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
    if config.allowed_origins.is_empty() {
        return with_common_rules(CorsLayer::new().allow_origin(Any));
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Skipping invalid CORS origin");
                None
            }
        })
        .collect();

    if origins.is_empty() {
        tracing::warn!(
            configured = config.allowed_origins.len(),
            "No configured CORS origin is valid; cross-origin requests will be refused"
        );
    }

    with_common_rules(CorsLayer::new().allow_origin(origins))
}

fn with_common_rules(layer: CorsLayer) -> CorsLayer {
    layer
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .expose_headers([HeaderName::from_static(REQUEST_ID_HEADER)])
        .max_age(Duration::from_secs(3600))
}
