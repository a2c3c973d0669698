//! Command-line interface for chat-relay
//!
//! Provides argument parsing and subcommand handling for the chat-relay binary.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// HTTP relay between a browser chat client and the Gemini API
#[derive(Parser)]
#[command(name = "chat-relay")]
#[command(version)]
#[command(about = "HTTP relay between a browser chat client and the Gemini API")]
#[command(
    long_about = "chat-relay accepts chat conversations over HTTP, forwards them to the \
    Gemini generateContent API, and returns the generated reply. Settings come from an \
    optional TOML file and the PORT, GOOGLE_API_KEY and CORS_ORIGIN environment variables."
)]
pub struct Cli {
    /// Path to configuration file (defaults to ./config.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Generate a template configuration file
    Config {
        /// Output file path (prints to stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Generate template configuration content
pub fn generate_config_template() -> &'static str {
    r#"# chat-relay Configuration
# ========================
#
# Every setting is optional. Environment variables override this file:
#   HOST, PORT, STATIC_DIR, UPSTREAM_BASE_URL, GOOGLE_API_KEY, CORS_ORIGIN

[server]
# IP address to bind to (0.0.0.0 for all interfaces, 127.0.0.1 for localhost only)
host = "0.0.0.0"

# Port to listen on
port = 10000

# Directory served for any path that is not an API route
static_dir = "public"

[upstream]
# Gemini API host and version
base_url = "https://generativelanguage.googleapis.com"
api_version = "v1beta"

# Optional timeout for the outbound call in seconds (1-300). No timeout when unset.
# request_timeout_seconds = 60

# Prefer the GOOGLE_API_KEY environment variable over storing the key here.
# api_key = "..."

[models]
# Used when a request names no model or one that is not listed below
default = "gemini-1.5-flash"
allowed = [
    "gemini-1.5-flash",
    "gemini-1.5-flash-8b",
    "gemini-1.5-pro",
    "gemini-2.0-flash",
    "gemini-2.0-flash-lite",
]

[cors]
# Allowed browser origins. Empty list allows any origin.
allowed_origins = []

[observability]
# Log level: "trace", "debug", "info", "warn", "error" (RUST_LOG takes precedence)
log_level = "info"
"#
}
