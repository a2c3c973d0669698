//! Router assembly
//!
//! Wires the API routes, the bundled frontend, and the middleware stack into
//! one Axum router.

use crate::handlers::{self, AppState};
use crate::middleware::{cors_layer, request_id_middleware};
use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower_http::{services::ServeDir, trace::TraceLayer};

/// Build the application router
///
/// Routes:
/// - `POST /api/chat` - relay a conversation upstream
/// - `POST /api/question` - generate questions about a topic
/// - `GET /api/models` - allow-listed models
/// - `GET /health` - liveness
/// - `GET /metrics` - Prometheus metrics
/// - anything else - static files from `server.static_dir`
pub fn build_router(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.config().server.static_dir)
        .append_index_html_on_directories(true);
    let cors = cors_layer(&state.config().cors);

    Router::new()
        .route("/api/chat", post(handlers::chat::handler))
        .route("/api/question", post(handlers::question::handler))
        .route("/api/models", get(handlers::models::handler))
        .route("/health", get(handlers::health::handler))
        .route("/metrics", get(handlers::metrics::handler))
        .fallback_service(static_files)
        .with_state(state)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use std::io::Write;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app_with_static_dir(dir: &std::path::Path) -> Router {
        let mut config = Config::default();
        config.server.static_dir = dir.to_path_buf();
        build_router(AppState::new(Arc::new(config)).unwrap())
    }

    #[tokio::test]
    async fn test_root_serves_index_html() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = std::fs::File::create(dir.path().join("index.html")).unwrap();
        file.write_all(b"<h1>relay</h1>").unwrap();

        let response = app_with_static_dir(dir.path())
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"<h1>relay</h1>");
    }

    #[tokio::test]
    async fn test_unknown_path_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let response = app_with_static_dir(dir.path())
            .oneshot(
                Request::builder()
                    .uri("/missing.js")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_health_route_is_wired() {
        let dir = tempfile::tempdir().unwrap();
        let response = app_with_static_dir(dir.path())
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
    }
}
