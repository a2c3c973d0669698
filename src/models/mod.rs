//! Upstream model access
//!
//! Wire types for the upstream `generateContent` API, the model allow-list,
//! and the HTTP client that performs the outbound call.

pub mod catalog;
pub mod client;
pub mod types;

pub use catalog::{ModelCatalog, ResolvedModel};
pub use client::{GeminiClient, UpstreamReply};
pub use types::{ChatMessage, GenerateContentRequest, GenerateContentResponse, ProviderContent};
