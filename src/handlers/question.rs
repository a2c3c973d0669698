//! Question generator endpoint
//!
//! Handles POST /api/question: asks the upstream model for a list of
//! questions about a topic and returns them one per array entry.

use crate::error::{AppError, AppResult};
use crate::handlers::AppState;
use crate::handlers::extractor::RelayJson;
use crate::metrics::Endpoint;
use crate::middleware::RequestId;
use crate::models::{ChatMessage, GenerateContentRequest};
use crate::shared::relay;
use axum::{Extension, Json, extract::State};
use serde::{Deserialize, Deserializer, Serialize};

/// Number of questions generated when the request does not say
pub const DEFAULT_QUESTION_COUNT: usize = 5;
/// Largest accepted `count`
pub const MAX_QUESTION_COUNT: usize = 20;
/// Maximum topic length in characters
const MAX_TOPIC_LENGTH: usize = 500;

/// Error text for a missing or blank topic
pub const TOPIC_REQUIRED: &str = "topic required";

/// Question request from client
///
/// Validation is enforced during deserialization - invalid instances cannot exist.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionRequest {
    topic: String,
    count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<String>,
}

impl QuestionRequest {
    /// Get the (trimmed) topic
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Get the number of questions requested
    pub fn count(&self) -> usize {
        self.count
    }

    /// Get the requested model, if any
    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }
}

impl<'de> Deserialize<'de> for QuestionRequest {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct RawQuestionRequest {
            #[serde(default)]
            topic: Option<String>,
            #[serde(default)]
            count: Option<usize>,
            #[serde(default)]
            model: Option<String>,
        }

        let raw = RawQuestionRequest::deserialize(deserializer)?;

        let topic = raw
            .topic
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| serde::de::Error::custom(TOPIC_REQUIRED))?;

        let char_count = topic.chars().count();
        if char_count > MAX_TOPIC_LENGTH {
            return Err(serde::de::Error::custom(format!(
                "topic exceeds maximum length of {} characters (got {})",
                MAX_TOPIC_LENGTH, char_count
            )));
        }

        let count = raw.count.unwrap_or(DEFAULT_QUESTION_COUNT);
        if !(1..=MAX_QUESTION_COUNT).contains(&count) {
            return Err(serde::de::Error::custom(format!(
                "count must be between 1 and {} (got {})",
                MAX_QUESTION_COUNT, count
            )));
        }

        Ok(QuestionRequest {
            topic,
            count,
            model: raw.model,
        })
    }
}

/// Question response to client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionResponse {
    pub questions: Vec<String>,
}

/// Build the single user turn sent upstream
pub fn build_prompt(topic: &str, count: usize) -> String {
    format!(
        "Generate exactly {count} distinct, concise questions about the following topic: \"{topic}\".\n\
         Return only the questions, one per line, with no numbering, bullets, or extra text."
    )
}

/// Split a model reply into at most `count` questions
///
/// Lines are trimmed, leading list markers (`1.`, `2)`, `-`, `*`, `•`) are
/// removed, and blank lines are dropped.
pub fn parse_questions(reply: &str, count: usize) -> Vec<String> {
    reply
        .lines()
        .map(strip_list_marker)
        .filter(|line| !line.is_empty())
        .take(count)
        .map(String::from)
        .collect()
}

fn strip_list_marker(line: &str) -> &str {
    let line = line.trim();

    if let Some(rest) = line
        .strip_prefix('-')
        .or_else(|| line.strip_prefix('*'))
        .or_else(|| line.strip_prefix('•'))
    {
        return rest.trim_start();
    }

    let digits = line.chars().take_while(char::is_ascii_digit).count();
    if digits > 0 {
        let rest = &line[digits..];
        if let Some(rest) = rest.strip_prefix('.').or_else(|| rest.strip_prefix(')')) {
            return rest.trim_start();
        }
    }

    line
}

/// POST /api/question handler
pub async fn handler(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    payload: Result<RelayJson<QuestionRequest>, AppError>,
) -> AppResult<Json<QuestionResponse>> {
    let result = generate_questions(&state, request_id, payload).await;
    relay::record_outcome(&state, Endpoint::Question, request_id, &result);
    result.map(Json)
}

async fn generate_questions(
    state: &AppState,
    request_id: RequestId,
    payload: Result<RelayJson<QuestionRequest>, AppError>,
) -> AppResult<QuestionResponse> {
    let RelayJson(request) = payload?;

    tracing::debug!(
        request_id = %request_id,
        topic_length = request.topic().len(),
        count = request.count(),
        requested_model = ?request.model(),
        "Received question request"
    );

    let prompt = build_prompt(request.topic(), request.count());
    let upstream_request = GenerateContentRequest::from_messages(&[ChatMessage::user(prompt)]);
    let reply = relay::relay(state, request_id, request.model(), &upstream_request).await?;

    Ok(QuestionResponse {
        questions: parse_questions(&reply, request.count()),
    })
}
