//! Model list endpoint
//!
//! Handles GET /api/models so the frontend can offer the allow-listed models.

use crate::handlers::AppState;
use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

/// Allow-listed models and the default used when none is requested
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelsResponse {
    pub default: String,
    pub models: Vec<String>,
}

/// GET /api/models handler
pub async fn handler(State(state): State<AppState>) -> Json<ModelsResponse> {
    let catalog = state.catalog();
    Json(ModelsResponse {
        default: catalog.default_model().to_string(),
        models: catalog.models().to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use std::str::FromStr;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_models_handler_lists_allow_list() {
        let config = Config::from_str(
            r#"
[models]
default = "gemini-1.5-pro"
allowed = ["gemini-1.5-flash", "gemini-1.5-pro"]
"#,
        )
        .unwrap();
        let state = AppState::new(Arc::new(config)).unwrap();

        let Json(body) = handler(State(state)).await;
        assert_eq!(body.default, "gemini-1.5-pro");
        assert_eq!(body.models, vec!["gemini-1.5-flash", "gemini-1.5-pro"]);
    }
}
