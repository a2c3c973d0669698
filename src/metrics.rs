//! Prometheus metrics collection for chat-relay
//!
//! This module provides metrics instrumentation for tracking:
//! - Relay requests by endpoint and outcome
//! - Upstream call latency by model
//! - Upstream HTTP responses by status class
//!
//! Metrics are exposed via the `/metrics` endpoint in Prometheus text format.

use prometheus::{Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder};
use std::sync::Arc;

/// Relay endpoint label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// `POST /api/chat`
    Chat,
    /// `POST /api/question`
    Question,
}

impl Endpoint {
    /// Convert endpoint to Prometheus label string
    pub fn as_str(&self) -> &'static str {
        match self {
            Endpoint::Chat => "chat",
            Endpoint::Question => "question",
        }
    }
}

/// Request outcome label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    ClientError,
    ConfigError,
    UpstreamError,
    InternalError,
}

impl Outcome {
    /// Convert outcome to Prometheus label string
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Success => "success",
            Outcome::ClientError => "client_error",
            Outcome::ConfigError => "config_error",
            Outcome::UpstreamError => "upstream_error",
            Outcome::InternalError => "internal_error",
        }
    }
}

/// Bucket an upstream HTTP status into a bounded label
pub fn status_class(status: u16) -> &'static str {
    match status {
        200..=299 => "2xx",
        400..=499 => "4xx",
        500..=599 => "5xx",
        _ => "other",
    }
}

/// Metrics collector for chat-relay
///
/// Cheap to clone; all collectors share one registry.
#[derive(Clone)]
pub struct Metrics {
    pub registry: Arc<Registry>,
    requests_total: IntCounterVec,
    upstream_duration: HistogramVec,
    upstream_responses: IntCounterVec,
}

impl Metrics {
    /// Create a new Metrics instance
    ///
    /// # Errors
    ///
    /// Returns an error if metric registration fails (e.g., duplicate names).
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        // Cardinality: 2 endpoints × 5 outcomes
        let requests_total = IntCounterVec::new(
            Opts::new(
                "chat_relay_requests_total",
                "Total number of relay requests by endpoint and outcome",
            ),
            &["endpoint", "outcome"],
        )?;

        // Model label is always an allow-listed id, never raw client input
        let upstream_duration = HistogramVec::new(
            HistogramOpts::new(
                "chat_relay_upstream_duration_ms",
                "Upstream generateContent latency in milliseconds",
            )
            .buckets(vec![
                50.0, 100.0, 250.0, 500.0, 1000.0, 2500.0, 5000.0, 10000.0, 30000.0,
            ]),
            &["model"],
        )?;

        let upstream_responses = IntCounterVec::new(
            Opts::new(
                "chat_relay_upstream_responses_total",
                "Upstream HTTP responses by status class",
            ),
            &["status_class"],
        )?;

        registry.register(Box::new(requests_total.clone()))?;
        registry.register(Box::new(upstream_duration.clone()))?;
        registry.register(Box::new(upstream_responses.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            requests_total,
            upstream_duration,
            upstream_responses,
        })
    }

    /// Record a finished relay request
    pub fn record_request(
        &self,
        endpoint: Endpoint,
        outcome: Outcome,
    ) -> Result<(), prometheus::Error> {
        self.requests_total
            .get_metric_with_label_values(&[endpoint.as_str(), outcome.as_str()])?
            .inc();
        Ok(())
    }

    /// Record the latency of one upstream call
    ///
    /// # Errors
    ///
    /// Returns an error if `duration_ms` is NaN, infinite, or negative.
    pub fn record_upstream_duration(
        &self,
        model: &str,
        duration_ms: f64,
    ) -> Result<(), prometheus::Error> {
        if !duration_ms.is_finite() || duration_ms < 0.0 {
            return Err(prometheus::Error::Msg(format!(
                "Histogram value must be finite and non-negative, got: {}",
                duration_ms
            )));
        }

        self.upstream_duration
            .get_metric_with_label_values(&[model])?
            .observe(duration_ms);
        Ok(())
    }

    /// Record the HTTP status of one upstream response
    pub fn record_upstream_status(&self, status: u16) -> Result<(), prometheus::Error> {
        self.upstream_responses
            .get_metric_with_label_values(&[status_class(status)])?
            .inc();
        Ok(())
    }

    /// Current value of the request counter for one label pair
    pub fn requests_count(&self, endpoint: Endpoint, outcome: Outcome) -> u64 {
        self.requests_total
            .get_metric_with_label_values(&[endpoint.as_str(), outcome.as_str()])
            .map(|c| c.get())
            .unwrap_or(0)
    }

    /// Encode all registered metrics in Prometheus text format
    pub fn gather(&self) -> Result<String, prometheus::Error> {
        let metric_families = self.registry.gather();

        let mut buffer = Vec::new();
        let encoder = TextEncoder::new();

        encoder.encode(&metric_families, &mut buffer).map_err(|e| {
            tracing::error!(
                error = %e,
                metric_family_count = metric_families.len(),
                "Prometheus text encoder failed"
            );
            e
        })?;

        String::from_utf8(buffer).map_err(|e| {
            prometheus::Error::Msg(format!(
                "Failed to convert metrics to UTF-8 at byte {}: {}",
                e.utf8_error().valid_up_to(),
                e
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_new_creates_registry() {
        let metrics = Metrics::new().expect("Failed to create metrics");

        metrics
            .record_request(Endpoint::Chat, Outcome::Success)
            .expect("Test operation should succeed");
        metrics
            .record_upstream_duration("gemini-1.5-flash", 120.0)
            .expect("Test operation should succeed");
        metrics
            .record_upstream_status(200)
            .expect("Test operation should succeed");

        let output = metrics.gather().expect("Failed to gather metrics");
        assert!(output.contains("chat_relay_requests_total"));
        assert!(output.contains("chat_relay_upstream_duration_ms"));
        assert!(output.contains("chat_relay_upstream_responses_total"));
    }

    #[test]
    fn test_record_request_increments_counter() {
        let metrics = Metrics::new().unwrap();

        metrics
            .record_request(Endpoint::Chat, Outcome::Success)
            .unwrap();
        metrics
            .record_request(Endpoint::Chat, Outcome::Success)
            .unwrap();
        metrics
            .record_request(Endpoint::Question, Outcome::ClientError)
            .unwrap();

        assert_eq!(metrics.requests_count(Endpoint::Chat, Outcome::Success), 2);
        assert_eq!(
            metrics.requests_count(Endpoint::Question, Outcome::ClientError),
            1
        );
        assert_eq!(
            metrics.requests_count(Endpoint::Chat, Outcome::UpstreamError),
            0
        );

        let output = metrics.gather().unwrap();
        assert!(
            output.contains(r#"chat_relay_requests_total{endpoint="chat",outcome="success"} 2"#)
        );
    }

    #[test]
    fn test_record_upstream_duration_rejects_invalid_values() {
        let metrics = Metrics::new().unwrap();
        assert!(metrics.record_upstream_duration("m", f64::NAN).is_err());
        assert!(metrics.record_upstream_duration("m", f64::INFINITY).is_err());
        assert!(metrics.record_upstream_duration("m", -1.0).is_err());
        assert!(metrics.record_upstream_duration("m", 0.0).is_ok());
    }

    #[test]
    fn test_status_class_buckets() {
        assert_eq!(status_class(200), "2xx");
        assert_eq!(status_class(204), "2xx");
        assert_eq!(status_class(429), "4xx");
        assert_eq!(status_class(503), "5xx");
        assert_eq!(status_class(302), "other");
    }

    #[test]
    fn test_record_upstream_status_uses_class_label() {
        let metrics = Metrics::new().unwrap();
        metrics.record_upstream_status(429).unwrap();
        metrics.record_upstream_status(404).unwrap();

        let output = metrics.gather().unwrap();
        assert!(output.contains(r#"chat_relay_upstream_responses_total{status_class="4xx"} 2"#));
    }
}
