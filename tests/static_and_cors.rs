//! Integration tests for the static frontend fallback, CORS, and the
//! read-only informational endpoints

mod common;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use common::*;
use serde_json::json;
use std::fs;
use tower::ServiceExt;

#[tokio::test]
async fn test_frontend_is_served_from_static_dir() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("index.html"), "<title>chat</title>").unwrap();
    fs::write(dir.path().join("app.js"), "console.log('hi')").unwrap();

    let mut config = create_test_config("http://127.0.0.1:9");
    config.server.static_dir = dir.path().to_path_buf();
    let (app, _) = create_test_app(config);

    let response = get(app.clone(), "/").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "<title>chat</title>");

    let response = get(app.clone(), "/app.js").await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get(app, "/nope.css").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_models_endpoint_lists_allow_list() {
    let (app, _) = create_test_app(create_test_config("http://127.0.0.1:9"));
    let response = get(app, "/api/models").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["default"], "gemini-1.5-flash");
    assert!(
        body["models"]
            .as_array()
            .unwrap()
            .contains(&json!("gemini-1.5-pro"))
    );
}

#[tokio::test]
async fn test_health_reports_credential_presence_only() {
    let (app, _) = create_test_app(create_test_config("http://127.0.0.1:9"));
    let response = get(app, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    let text = body_text(response).await;
    assert_eq!(
        serde_json::from_str::<serde_json::Value>(&text).unwrap(),
        json!({"status": "OK", "upstream_configured": true})
    );
    assert!(!text.contains(TEST_API_KEY));
}

#[tokio::test]
async fn test_any_origin_allowed_when_unconfigured() {
    let (app, _) = create_test_app(create_test_config("http://127.0.0.1:9"));

    let request = Request::builder()
        .uri("/health")
        .header(header::ORIGIN, "https://anywhere.test")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "*"
    );
}

#[tokio::test]
async fn test_configured_origins_restrict_preflight() {
    let mut config = create_test_config("http://127.0.0.1:9");
    config.cors.allowed_origins = vec!["https://chat.example.com".to_string()];
    let (app, _) = create_test_app(config);

    let preflight = |origin: &'static str| {
        Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/chat")
            .header(header::ORIGIN, origin)
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
            .body(Body::empty())
            .unwrap()
    };

    let allowed = app
        .clone()
        .oneshot(preflight("https://chat.example.com"))
        .await
        .unwrap();
    assert_eq!(
        allowed
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "https://chat.example.com"
    );

    let denied = app.oneshot(preflight("https://evil.test")).await.unwrap();
    assert!(
        denied
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none()
    );
}
