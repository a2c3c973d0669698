//! Shared helpers for integration tests
//!
//! Every test drives the real router against a wiremock stand-in for the
//! upstream generateContent API.

#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Request, header},
    response::Response,
};
use chat_relay::{config::Config, handlers::AppState, server::build_router};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

pub const TEST_API_KEY: &str = "test-key";

/// Config pointing at `base_url` with a configured credential
pub fn create_test_config(base_url: &str) -> Config {
    let mut config = Config::default();
    config.upstream.base_url = base_url.to_string();
    config.upstream.set_api_key(Some(TEST_API_KEY.to_string()));
    config
}

/// Build router and keep a handle on the state for metric assertions
pub fn create_test_app(config: Config) -> (Router, AppState) {
    let state = AppState::new(Arc::new(config)).expect("should create AppState");
    (build_router(state.clone()), state)
}

/// Upstream path for a model
pub fn generate_path(model: &str) -> String {
    format!("/v1beta/models/{}:generateContent", model)
}

/// Upstream success body with the given text parts in the first candidate
pub fn candidate_body(parts: &[&str]) -> Value {
    let parts: Vec<Value> = parts
        .iter()
        .map(|text| serde_json::json!({ "text": text }))
        .collect();
    serde_json::json!({
        "candidates": [
            { "content": { "role": "model", "parts": parts } }
        ]
    })
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).expect("response body should be JSON")
}

pub async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
