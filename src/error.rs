//! Error types for chat-relay
//!
//! All errors implement `IntoResponse` for Axum handlers. Every failure is
//! converted into a JSON body of the shape `{"error": ..., "detail"?: ...}`.

use crate::metrics::Outcome;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// Generic message returned for failures that are not the caller's fault
const SERVER_ERROR: &str = "Server error";

/// Main error type for the application
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to read config file {path}: {source}")]
    ConfigFileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    ConfigParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid configuration in {path}: {reason}")]
    ConfigValidationFailed { path: String, reason: String },

    #[error("Invalid value for environment variable {name}: {reason}")]
    InvalidEnv { name: &'static str, reason: String },

    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    #[error("Missing GOOGLE_API_KEY")]
    MissingCredential,

    #[error("Upstream returned HTTP {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("Upstream request failed: {0}")]
    UpstreamRequest(String),

    #[error("Malformed upstream response: {0}")]
    UpstreamDecode(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status this error is reported with
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::Upstream { .. } => StatusCode::BAD_GATEWAY,
            Self::MissingCredential
            | Self::UpstreamRequest(_)
            | Self::UpstreamDecode(_)
            | Self::Internal(_)
            | Self::Config(_)
            | Self::ConfigFileRead { .. }
            | Self::ConfigParseFailed { .. }
            | Self::ConfigValidationFailed { .. }
            | Self::InvalidEnv { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Metrics outcome for the failure class
    pub fn outcome(&self) -> Outcome {
        match self {
            Self::Validation(_) | Self::UnsupportedMediaType(_) => Outcome::ClientError,
            Self::MissingCredential
            | Self::Config(_)
            | Self::ConfigFileRead { .. }
            | Self::ConfigParseFailed { .. }
            | Self::ConfigValidationFailed { .. }
            | Self::InvalidEnv { .. } => Outcome::ConfigError,
            Self::Upstream { .. } => Outcome::UpstreamError,
            Self::UpstreamRequest(_) | Self::UpstreamDecode(_) | Self::Internal(_) => {
                Outcome::InternalError
            }
        }
    }

    fn body(&self) -> ErrorBody {
        match self {
            Self::Validation(msg) | Self::UnsupportedMediaType(msg) => ErrorBody::new(msg.clone()),
            Self::MissingCredential => ErrorBody::new(self.to_string()),
            Self::Upstream { status, body } => ErrorBody {
                error: "Upstream error".to_string(),
                detail: Some(body.clone()),
                upstream_status: Some(*status),
            },
            Self::UpstreamRequest(msg) | Self::UpstreamDecode(msg) | Self::Internal(msg) => {
                ErrorBody::new(SERVER_ERROR).with_detail(msg.clone())
            }
            Self::Config(_)
            | Self::ConfigFileRead { .. }
            | Self::ConfigParseFailed { .. }
            | Self::ConfigValidationFailed { .. }
            | Self::InvalidEnv { .. } => ErrorBody::new(self.to_string()),
        }
    }
}

/// JSON error payload returned to clients
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upstream_status: Option<u16>,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            detail: None,
            upstream_status: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.body())).into_response()
    }
}

/// Convenience type alias for Results
pub type AppResult<T> = Result<T, AppError>;
