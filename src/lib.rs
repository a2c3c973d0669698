//! chat-relay - HTTP relay between a browser chat client and the Gemini API
//!
//! This library validates chat requests, translates them into the upstream
//! `generateContent` schema, performs one outbound call per request, and
//! relays the reply or a structured error back to the caller.

pub mod cli;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod server;
pub mod shared;
pub mod telemetry;
