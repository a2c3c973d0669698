//! Shared utilities used across multiple handlers
//!
//! This module contains the relay pipeline shared between the `/api/chat`
//! and `/api/question` endpoints.

pub mod relay;
