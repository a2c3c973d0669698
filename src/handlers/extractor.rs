//! JSON extractor that reports body problems as [`AppError`]
//!
//! Wraps Axum's `Json` extractor so every malformed body yields the same
//! `{"error": ...}` payload as the rest of the API, with a 400 status instead
//! of Axum's default 422 for data errors.

use crate::error::AppError;
use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};
use serde::de::DeserializeOwned;

/// Convert an Axum JSON rejection into an application error
///
/// - JSON syntax errors → 400
/// - Data/validation errors → 400 carrying the deserializer's own message
/// - Missing content type → 415
pub fn rejection_to_error(rejection: JsonRejection) -> AppError {
    match rejection {
        JsonRejection::MissingJsonContentType(_) => {
            AppError::UnsupportedMediaType("Content-Type must be application/json".to_string())
        }
        JsonRejection::JsonDataError(err) => {
            let message = std::error::Error::source(&err)
                .map(|source| source.to_string())
                .unwrap_or_else(|| err.body_text());
            AppError::Validation(strip_position(&message).to_string())
        }
        other => AppError::Validation(other.body_text()),
    }
}

/// Drop serde_json's trailing ` at line N column M`
fn strip_position(message: &str) -> &str {
    let Some(idx) = message.rfind(" at line ") else {
        return message;
    };

    let is_position = message[idx + " at line ".len()..]
        .split_once(" column ")
        .is_some_and(|(line, column)| {
            line.parse::<u64>().is_ok() && column.parse::<u64>().is_ok()
        });

    if is_position { &message[..idx] } else { message }
}

/// JSON body extractor with [`AppError`] rejections
///
/// # Example
///
/// ```ignore
/// pub async fn handler(
///     payload: Result<RelayJson<ChatRequest>, AppError>,
/// ) -> Result<Json<ChatResponse>, AppError> {
///     let RelayJson(request) = payload?;
///     // ...
/// }
/// ```
pub struct RelayJson<T>(pub T);

impl<S, T> FromRequest<S> for RelayJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(RelayJson(value)),
            Err(rejection) => Err(rejection_to_error(rejection)),
        }
    }
}
