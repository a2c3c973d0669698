//! HTTP request handlers for the chat-relay API

use crate::config::Config;
use crate::error::AppResult;
use crate::metrics::Metrics;
use crate::models::{GeminiClient, ModelCatalog};
use std::sync::Arc;

pub mod chat;
pub mod extractor;
pub mod health;
pub mod metrics;
pub mod models;
pub mod question;

/// Application state shared across all handlers
///
/// Built once at startup; nothing in it is mutated afterwards.
/// All fields are Arc'd for cheap cloning across Axum handlers.
#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
    catalog: Arc<ModelCatalog>,
    client: Arc<GeminiClient>,
    metrics: Arc<Metrics>,
}

impl AppState {
    /// Create a new AppState from validated configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or the metrics registry cannot be
    /// created.
    pub fn new(config: Arc<Config>) -> AppResult<Self> {
        let catalog = Arc::new(ModelCatalog::from_config(&config.models));
        let client = Arc::new(GeminiClient::new(&config.upstream)?);
        let metrics = Arc::new(Metrics::new().map_err(|e| {
            crate::error::AppError::Internal(format!("Failed to create metrics registry: {}", e))
        })?);

        Ok(Self {
            config,
            catalog,
            client,
            metrics,
        })
    }

    /// Get reference to the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get reference to the model allow-list
    pub fn catalog(&self) -> &ModelCatalog {
        &self.catalog
    }

    /// Get reference to the upstream client
    pub fn client(&self) -> &GeminiClient {
        &self.client
    }

    /// Get reference to the metrics collector
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }
}
