//! Model allow-list and default-model resolution
//!
//! Clients may name a model in their request. Only identifiers from the
//! configured allow-list are forwarded upstream; anything else falls back to
//! the configured default.

use crate::config::ModelsConfig;

/// Prefix the upstream API uses in fully-qualified model names
const MODEL_NAME_PREFIX: &str = "models/";

/// Allow-listed upstream model identifiers plus the default
#[derive(Debug, Clone)]
pub struct ModelCatalog {
    default: String,
    allowed: Vec<String>,
}

/// Result of resolving a requested model against the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedModel<'a> {
    /// Identifier to use in the upstream URL (always allow-listed)
    pub id: &'a str,
    /// The rejected request value when the default was substituted for it
    pub fallback_from: Option<String>,
}

impl ModelCatalog {
    /// Build the catalog from validated configuration
    ///
    /// `Config::validate` guarantees the default is part of the allow-list.
    pub fn from_config(config: &ModelsConfig) -> Self {
        Self {
            default: config.default.clone(),
            allowed: config.allowed.clone(),
        }
    }

    pub fn default_model(&self) -> &str {
        &self.default
    }

    pub fn models(&self) -> &[String] {
        &self.allowed
    }

    /// Resolve a client-supplied model name
    ///
    /// Surrounding whitespace and a leading `models/` are ignored. Absent or
    /// blank values resolve to the default silently; unknown values resolve to
    /// the default and report what was rejected.
    pub fn resolve(&self, requested: Option<&str>) -> ResolvedModel<'_> {
        let normalized = requested
            .map(str::trim)
            .map(|m| m.strip_prefix(MODEL_NAME_PREFIX).unwrap_or(m))
            .filter(|m| !m.is_empty());

        let Some(name) = normalized else {
            return ResolvedModel {
                id: &self.default,
                fallback_from: None,
            };
        };

        match self.allowed.iter().find(|m| m.as_str() == name) {
            Some(id) => ResolvedModel {
                id,
                fallback_from: None,
            },
            None => ResolvedModel {
                id: &self.default,
                fallback_from: Some(name.to_string()),
            },
        }
    }
}
