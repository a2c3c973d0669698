//! Configuration management for chat-relay
//!
//! Parses an optional TOML configuration file, applies environment overrides
//! (`PORT`, `GOOGLE_API_KEY`, `CORS_ORIGIN`, ...) and provides typed access to
//! settings. The resulting [`Config`] is built once at startup and shared
//! read-only with every handler.

use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// Config file read when `--config` is not given (if it exists)
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Model used when a request names none or an unknown one
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Public Gemini API host
pub const DEFAULT_UPSTREAM_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Upper bound for `upstream.request_timeout_seconds`
const MAX_TIMEOUT_SECONDS: u64 = 300;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub models: ModelsConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory holding the bundled frontend
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: default_static_dir(),
        }
    }
}

impl ServerConfig {
    /// Address to bind the listener to
    ///
    /// # Errors
    ///
    /// Returns an error if `host` is not an IP address.
    pub fn socket_addr(&self) -> AppResult<SocketAddr> {
        let ip: IpAddr = self.host.parse().map_err(|e| {
            AppError::Config(format!("server.host '{}' is not an IP address: {}", self.host, e))
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    10000
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("public")
}

/// Upstream (Gemini) connection settings
///
/// The API key is private: it is only reachable through [`UpstreamConfig::api_key`]
/// and is redacted from `Debug` output and never serialized.
#[derive(Clone, Deserialize, Serialize)]
pub struct UpstreamConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_api_version")]
    pub api_version: String,
    /// Optional timeout for the outbound call; no timeout when unset
    #[serde(default)]
    pub request_timeout_seconds: Option<u64>,
    #[serde(default, skip_serializing)]
    api_key: Option<String>,
}

impl UpstreamConfig {
    /// Get the API credential, if one was configured
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    /// Replace the API credential; blank values clear it
    pub fn set_api_key(&mut self, key: Option<String>) {
        self.api_key = key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());
    }

    /// Outbound request timeout, if configured
    pub fn timeout(&self) -> Option<Duration> {
        self.request_timeout_seconds.map(Duration::from_secs)
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_version: default_api_version(),
            request_timeout_seconds: None,
            api_key: None,
        }
    }
}

impl fmt::Debug for UpstreamConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpstreamConfig")
            .field("base_url", &self.base_url)
            .field("api_version", &self.api_version)
            .field("request_timeout_seconds", &self.request_timeout_seconds)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

fn default_base_url() -> String {
    DEFAULT_UPSTREAM_BASE_URL.to_string()
}

fn default_api_version() -> String {
    "v1beta".to_string()
}

/// Model allow-list
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ModelsConfig {
    #[serde(default = "default_model")]
    pub default: String,
    #[serde(default = "default_allowed_models")]
    pub allowed: Vec<String>,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            default: default_model(),
            allowed: default_allowed_models(),
        }
    }
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_allowed_models() -> Vec<String> {
    [
        "gemini-1.5-flash",
        "gemini-1.5-flash-8b",
        "gemini-1.5-pro",
        "gemini-2.0-flash",
        "gemini-2.0-flash-lite",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// Cross-origin settings
///
/// An empty `allowed_origins` list allows any origin.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CorsConfig {
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

/// Observability configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Split a comma-separated origin list, trimming entries and dropping blanks
pub fn parse_origin_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

impl Config {
    /// Load configuration for the server process
    ///
    /// Reads `explicit` when given (it must exist), otherwise `config.toml` if
    /// present, otherwise starts from defaults. Environment overrides are then
    /// applied and the result is validated.
    pub fn load(explicit: Option<&Path>) -> AppResult<Self> {
        let (mut config, source) = match explicit {
            Some(path) => (Self::parse_file(path)?, path.display().to_string()),
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => (
                Self::parse_file(DEFAULT_CONFIG_PATH)?,
                DEFAULT_CONFIG_PATH.to_string(),
            ),
            None => (Self::default(), "<defaults>".to_string()),
        };

        config.apply_env(|name| std::env::var(name).ok())?;

        config
            .validate()
            .map_err(|e| AppError::ConfigValidationFailed {
                path: source,
                reason: e.to_string(),
            })?;

        Ok(config)
    }

    /// Load configuration from a TOML file (no environment overrides)
    pub fn from_file<P: AsRef<Path>>(path: P) -> AppResult<Self> {
        let path_display = path.as_ref().display().to_string();
        let config = Self::parse_file(path)?;

        config
            .validate()
            .map_err(|e| AppError::ConfigValidationFailed {
                path: path_display,
                reason: e.to_string(),
            })?;

        Ok(config)
    }

    fn parse_file<P: AsRef<Path>>(path: P) -> AppResult<Self> {
        let path_display = path.as_ref().display().to_string();

        let content =
            std::fs::read_to_string(path.as_ref()).map_err(|source| AppError::ConfigFileRead {
                path: path_display.clone(),
                source,
            })?;

        toml::from_str(&content).map_err(|source| AppError::ConfigParseFailed {
            path: path_display,
            source,
        })
    }

    /// Apply environment overrides using `lookup` to read variables
    ///
    /// Blank values are treated as unset.
    pub fn apply_env<F>(&mut self, lookup: F) -> AppResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(host) = get("HOST") {
            self.server.host = host.trim().to_string();
        }

        if let Some(port) = get("PORT") {
            self.server.port = port.trim().parse().map_err(|e| AppError::InvalidEnv {
                name: "PORT",
                reason: format!("'{}' is not a valid port: {}", port, e),
            })?;
        }

        if let Some(dir) = get("STATIC_DIR") {
            self.server.static_dir = PathBuf::from(dir.trim());
        }

        if let Some(url) = get("UPSTREAM_BASE_URL") {
            self.upstream.base_url = url.trim().to_string();
        }

        if let Some(key) = get("GOOGLE_API_KEY") {
            self.upstream.set_api_key(Some(key));
        }

        if let Some(origins) = get("CORS_ORIGIN") {
            self.cors.allowed_origins = parse_origin_list(&origins);
        }

        Ok(())
    }

    /// Validate configuration after parsing
    ///
    /// A missing API key is not an error here: the process starts and each
    /// relay request reports the missing credential instead.
    pub fn validate(&self) -> AppResult<()> {
        if self.server.host.parse::<IpAddr>().is_err() {
            return Err(AppError::Config(format!(
                "server.host '{}' must be an IP address (e.g. 127.0.0.1 or 0.0.0.0)",
                self.server.host
            )));
        }

        if self.server.port == 0 {
            return Err(AppError::Config(
                "server.port must be greater than 0".to_string(),
            ));
        }

        let base_url = &self.upstream.base_url;
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(AppError::Config(format!(
                "upstream.base_url '{}' must start with 'http://' or 'https://'",
                base_url
            )));
        }

        if self.upstream.api_version.trim().is_empty() {
            return Err(AppError::Config(
                "upstream.api_version cannot be empty".to_string(),
            ));
        }

        if let Some(timeout) = self.upstream.request_timeout_seconds {
            if timeout == 0 {
                return Err(AppError::Config(
                    "upstream.request_timeout_seconds must be greater than 0".to_string(),
                ));
            }
            if timeout > MAX_TIMEOUT_SECONDS {
                return Err(AppError::Config(format!(
                    "upstream.request_timeout_seconds cannot exceed {} seconds, got {}",
                    MAX_TIMEOUT_SECONDS, timeout
                )));
            }
        }

        if self.models.allowed.is_empty() {
            return Err(AppError::Config(
                "models.allowed must list at least one model".to_string(),
            ));
        }

        for model in &self.models.allowed {
            validate_model_id(model)?;
        }

        if !self.models.allowed.contains(&self.models.default) {
            return Err(AppError::Config(format!(
                "models.default '{}' is not in models.allowed ({})",
                self.models.default,
                self.models.allowed.join(", ")
            )));
        }

        Ok(())
    }
}

/// Model ids are interpolated into the upstream URL path
fn validate_model_id(model: &str) -> AppResult<()> {
    if model.is_empty() {
        return Err(AppError::Config(
            "models.allowed cannot contain an empty model id".to_string(),
        ));
    }
    if model
        .chars()
        .any(|c| c.is_whitespace() || matches!(c, '/' | '?' | '#' | ':' | '%'))
    {
        return Err(AppError::Config(format!(
            "model id '{}' contains characters that are not allowed in a URL path segment",
            model
        )));
    }
    Ok(())
}

impl FromStr for Config {
    type Err = AppError;

    fn from_str(toml_str: &str) -> Result<Self, Self::Err> {
        let config: Config =
            toml::from_str(toml_str).map_err(|source| AppError::ConfigParseFailed {
                path: "<string>".to_string(),
                source,
            })?;

        config.validate()?;
        Ok(config)
    }
}
