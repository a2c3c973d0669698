//! HTTP client for the upstream `generateContent` API
//!
//! Wraps a single `reqwest::Client` built at startup. One call to
//! [`GeminiClient::generate_content`] performs exactly one outbound request;
//! nothing is retried.

use crate::config::UpstreamConfig;
use crate::error::{AppError, AppResult};
use crate::models::types::{GenerateContentRequest, GenerateContentResponse};

/// Client for `POST {base}/{version}/models/{model}:generateContent`
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    api_version: String,
}

/// Raw outcome of one upstream call, kept separate from decoding so callers
/// can record the status before interpreting the body
#[derive(Debug)]
pub struct UpstreamReply {
    pub status: u16,
    pub body: GenerateContentResponse,
}

impl GeminiClient {
    /// Create a client from upstream configuration
    ///
    /// The configured timeout (if any) applies to the whole outbound request.
    pub fn new(config: &UpstreamConfig) -> AppResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }

        let http = builder
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_version: config.api_version.trim_matches('/').to_string(),
        })
    }

    /// Upstream URL for a model, without the credential
    pub fn endpoint_url(&self, model: &str) -> String {
        format!(
            "{}/{}/models/{}:generateContent",
            self.base_url, self.api_version, model
        )
    }

    /// Send one `generateContent` request
    ///
    /// # Errors
    ///
    /// - [`AppError::Upstream`] when the provider answers with a non-2xx status
    ///   (the raw response body is kept as diagnostic detail)
    /// - [`AppError::UpstreamRequest`] on transport failures
    /// - [`AppError::UpstreamDecode`] when a 2xx body is not valid response JSON
    pub async fn generate_content(
        &self,
        api_key: &str,
        model: &str,
        request: &GenerateContentRequest,
    ) -> AppResult<UpstreamReply> {
        let url = self.endpoint_url(model);

        tracing::debug!(
            url = %url,
            content_count = request.contents.len(),
            "Sending generateContent request"
        );

        // reqwest errors embed the request URL; strip it so the key never leaks
        let response = self
            .http
            .post(&url)
            .query(&[("key", api_key)])
            .json(request)
            .send()
            .await
            .map_err(|e| AppError::UpstreamRequest(e.without_url().to_string()))?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|e| {
                format!("<failed to read upstream error body: {}>", e.without_url())
            });

            tracing::warn!(
                url = %url,
                status = status.as_u16(),
                body_length = body.len(),
                "Upstream returned non-success status"
            );

            return Err(AppError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| AppError::UpstreamRequest(e.without_url().to_string()))?;

        let body: GenerateContentResponse = serde_json::from_slice(&bytes)
            .map_err(|e| AppError::UpstreamDecode(e.to_string()))?;

        Ok(UpstreamReply {
            status: status.as_u16(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::types::ChatMessage;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn upstream_config(base_url: &str) -> UpstreamConfig {
        let toml = format!("base_url = \"{}\"\n", base_url);
        toml::from_str(&toml).expect("should parse upstream config")
    }

    fn request() -> GenerateContentRequest {
        GenerateContentRequest::from_messages(&[ChatMessage::user("Hi")])
    }

    #[test]
    fn test_endpoint_url_layout() {
        let client = GeminiClient::new(&upstream_config("https://example.test/")).unwrap();
        assert_eq!(
            client.endpoint_url("gemini-1.5-flash"),
            "https://example.test/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }

    #[tokio::test]
    async fn test_generate_content_sends_key_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-1.5-flash:generateContent"))
            .and(query_param("key", "secret"))
            .and(body_json(serde_json::json!({
                "contents": [{"role": "user", "parts": [{"text": "Hi"}]}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{"content": {"parts": [{"text": "Hello"}]}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = GeminiClient::new(&upstream_config(&server.uri())).unwrap();
        let reply = client
            .generate_content("secret", "gemini-1.5-flash", &request())
            .await
            .expect("call should succeed");

        assert_eq!(reply.status, 200);
        assert_eq!(reply.body.reply_text(), "Hello");
    }

    #[tokio::test]
    async fn test_non_success_status_keeps_raw_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("quota exceeded"))
            .mount(&server)
            .await;

        let client = GeminiClient::new(&upstream_config(&server.uri())).unwrap();
        let err = client
            .generate_content("secret", "gemini-1.5-flash", &request())
            .await
            .unwrap_err();

        match err {
            AppError::Upstream { status, body } => {
                assert_eq!(status, 429);
                assert_eq!(body, "quota exceeded");
            }
            other => panic!("expected Upstream error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_success_body_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let client = GeminiClient::new(&upstream_config(&server.uri())).unwrap();
        let err = client
            .generate_content("secret", "gemini-1.5-flash", &request())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::UpstreamDecode(_)));
    }

    #[tokio::test]
    async fn test_transport_error_does_not_leak_key() {
        // Port 9 (discard) on localhost is expected to refuse connections
        let client = GeminiClient::new(&upstream_config("http://127.0.0.1:9")).unwrap();
        let err = client
            .generate_content("super-secret-key", "gemini-1.5-flash", &request())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::UpstreamRequest(_)));
        assert!(!err.to_string().contains("super-secret-key"));
    }
}
