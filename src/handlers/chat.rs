//! Chat endpoint handler
//!
//! Handles POST /api/chat: validate the conversation, translate it into the
//! upstream content schema, perform one upstream call, and return the reply.

use crate::error::{AppError, AppResult};
use crate::handlers::AppState;
use crate::handlers::extractor::RelayJson;
use crate::metrics::Endpoint;
use crate::middleware::RequestId;
use crate::models::{ChatMessage, GenerateContentRequest};
use crate::shared::relay;
use axum::{Extension, Json, extract::State};
use serde::{Deserialize, Deserializer, Serialize};

/// Error text for a missing or empty `messages` array
pub const MESSAGES_REQUIRED: &str = "messages[] required";

/// Chat request from client
///
/// Validation is enforced during deserialization - invalid instances cannot exist.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<String>,
}

impl ChatRequest {
    /// Create a validated request
    ///
    /// # Errors
    ///
    /// Returns an error if `messages` is empty.
    pub fn new(messages: Vec<ChatMessage>, model: Option<String>) -> Result<Self, &'static str> {
        if messages.is_empty() {
            return Err(MESSAGES_REQUIRED);
        }
        Ok(Self { messages, model })
    }

    /// Get the conversation, in order
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Get the requested model, if any
    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }
}

impl<'de> Deserialize<'de> for ChatRequest {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct RawChatRequest {
            #[serde(default)]
            messages: Option<Vec<ChatMessage>>,
            #[serde(default)]
            model: Option<String>,
        }

        let raw = RawChatRequest::deserialize(deserializer)?;
        let messages = raw.messages.unwrap_or_default();
        ChatRequest::new(messages, raw.model).map_err(serde::de::Error::custom)
    }
}

/// Chat response to client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
}

/// POST /api/chat handler
///
/// Exactly one upstream call is made for a valid request with a configured
/// credential; none otherwise. An empty reply is a success.
pub async fn handler(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    payload: Result<RelayJson<ChatRequest>, AppError>,
) -> AppResult<Json<ChatResponse>> {
    let result = relay_chat(&state, request_id, payload).await;
    relay::record_outcome(&state, Endpoint::Chat, request_id, &result);
    result.map(Json)
}

async fn relay_chat(
    state: &AppState,
    request_id: RequestId,
    payload: Result<RelayJson<ChatRequest>, AppError>,
) -> AppResult<ChatResponse> {
    let RelayJson(request) = payload?;

    tracing::debug!(
        request_id = %request_id,
        message_count = request.messages().len(),
        requested_model = ?request.model(),
        "Received chat request"
    );

    let upstream_request = GenerateContentRequest::from_messages(request.messages());
    let reply = relay::relay(state, request_id, request.model(), &upstream_request).await?;

    Ok(ChatResponse { reply })
}
