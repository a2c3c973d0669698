//! Chat and upstream (Gemini `generateContent`) wire types
//!
//! [`ChatMessage`] is what the browser sends; [`ProviderContent`] is what the
//! upstream API expects. The mapping between them is pure, total and
//! order-preserving: role `"assistant"` becomes `"model"`, anything else
//! (including no role at all) becomes `"user"`.

use serde::{Deserialize, Serialize};

/// Role name the browser uses for previous model turns
pub const ASSISTANT_ROLE: &str = "assistant";

/// One conversation turn as supplied by the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(default)]
    pub role: Option<String>,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Some("user".to_string()),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Some(ASSISTANT_ROLE.to_string()),
            content: content.into(),
        }
    }
}

/// Upstream content role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderRole {
    User,
    Model,
}

impl ProviderRole {
    /// Map a client role to the upstream role
    pub fn from_chat_role(role: Option<&str>) -> Self {
        match role {
            Some(ASSISTANT_ROLE) => ProviderRole::Model,
            _ => ProviderRole::User,
        }
    }
}

/// A text fragment of a content entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    pub text: String,
}

/// One upstream content entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderContent {
    pub role: ProviderRole,
    pub parts: Vec<Part>,
}

impl From<&ChatMessage> for ProviderContent {
    fn from(message: &ChatMessage) -> Self {
        Self {
            role: ProviderRole::from_chat_role(message.role.as_deref()),
            parts: vec![Part {
                text: message.content.clone(),
            }],
        }
    }
}

/// Translate a conversation into upstream contents, one entry per message
pub fn to_provider_contents(messages: &[ChatMessage]) -> Vec<ProviderContent> {
    messages.iter().map(ProviderContent::from).collect()
}

/// Request body for `models/{model}:generateContent`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<ProviderContent>,
}

impl GenerateContentRequest {
    pub fn from_messages(messages: &[ChatMessage]) -> Self {
        Self {
            contents: to_provider_contents(messages),
        }
    }
}

/// Response body of `generateContent`
///
/// Only the path `candidates[0].content.parts[*].text` is read; every level
/// may be missing or null and unknown fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Option<Vec<ResponsePart>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponsePart {
    #[serde(default)]
    pub text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenate the first candidate's text parts in order
    ///
    /// Returns an empty string when there is no candidate, content or part.
    /// Parts without text contribute nothing.
    pub fn reply_text(&self) -> String {
        self.candidates
            .as_deref()
            .and_then(|candidates| candidates.first())
            .and_then(|c| c.content.as_ref())
            .and_then(|c| c.parts.as_deref())
            .map(|parts| {
                parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}
