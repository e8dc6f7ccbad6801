//! LLM Gateway port
//!
//! Defines the interface for communicating with the inference service.
//! One request, one response: the gateway never streams and never parses.
//! Decoding and validation of the raw text happen in the invoker.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tribunal_domain::{Model, ValidationFeedback};

/// Errors that can occur during LLM gateway operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Timeout")]
    Timeout,

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Invalid response envelope: {0}")]
    InvalidResponse(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    #[error("Request rejected: {0}")]
    RequestRejected(String),

    #[error("Other error: {0}")]
    Other(String),
}

impl GatewayError {
    /// Whether retrying the same request may succeed.
    ///
    /// Connection failures, timeouts, rate limits and 5xx responses are
    /// transient. Authentication failures, unknown models and rejected
    /// requests are not.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            GatewayError::ConnectionError(_)
                | GatewayError::Timeout
                | GatewayError::RateLimited(_)
                | GatewayError::ServiceUnavailable(_)
                | GatewayError::InvalidResponse(_)
        )
    }
}

/// A single inference request
#[derive(Debug, Clone, PartialEq)]
pub struct InferenceRequest {
    pub model: Model,
    /// Role directive (system message)
    pub directive: String,
    /// Rendered context document (user message)
    pub context: String,
    /// Name of the schema the reply must satisfy
    pub schema_name: &'static str,
    /// JSON descriptor of that schema
    pub response_schema: Value,
    pub temperature: f32,
    /// Set on corrective re-prompts
    pub feedback: Option<ValidationFeedback>,
}

/// Gateway for LLM communication
///
/// This port defines how the application layer communicates with the
/// inference service. Implementations (adapters) live in the infrastructure
/// layer.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Submit a request and return the raw response text
    async fn complete(&self, request: &InferenceRequest) -> Result<String, GatewayError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(GatewayError::Timeout.is_transient());
        assert!(GatewayError::RateLimited("429".to_string()).is_transient());
        assert!(GatewayError::ServiceUnavailable("503".to_string()).is_transient());
        assert!(GatewayError::ConnectionError("reset".to_string()).is_transient());

        assert!(!GatewayError::Unauthorized("401".to_string()).is_transient());
        assert!(!GatewayError::ModelNotAvailable("gpt-0".to_string()).is_transient());
        assert!(!GatewayError::RequestRejected("400".to_string()).is_transient());
    }
}
