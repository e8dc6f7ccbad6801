//! OpenAI-compatible LLM Gateway implementation

use super::protocol::{ChatMessage, ChatRequest, ChatResponse, ErrorEnvelope, ResponseFormat};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info};
use tribunal_application::{GatewayError, InferenceRequest, LlmGateway};
use tribunal_domain::ValidationFeedback;

/// Default endpoint root
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// Default environment variable holding the API key
pub const DEFAULT_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Connection settings for [`OpenAiGateway`]
#[derive(Debug, Clone)]
pub struct OpenAiGatewayConfig {
    /// Endpoint root, without the `/v1/...` path
    pub base_url: String,
    pub api_key: String,
    pub connect_timeout: Duration,
}

impl OpenAiGatewayConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            connect_timeout: Duration::from_secs(10),
        }
    }

    /// Read the API key from the named environment variable
    pub fn from_env(base_url: impl Into<String>, api_key_env: &str) -> Result<Self, GatewayError> {
        match std::env::var(api_key_env) {
            Ok(key) if !key.trim().is_empty() => Ok(Self::new(base_url, key)),
            _ => Err(GatewayError::Unauthorized(format!(
                "environment variable {} is not set",
                api_key_env
            ))),
        }
    }

    fn completions_url(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

/// LLM Gateway over an OpenAI-compatible chat completions endpoint
pub struct OpenAiGateway {
    client: reqwest::Client,
    config: OpenAiGatewayConfig,
}

impl OpenAiGateway {
    pub fn new(config: OpenAiGatewayConfig) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| GatewayError::Other(format!("Failed to create HTTP client: {}", e)))?;

        info!("OpenAiGateway initialized for {}", config.base_url);
        Ok(Self { client, config })
    }

    /// Build the wire request for one role call.
    ///
    /// The directive and the response schema go in the system message; the
    /// context document and any corrective feedback go in the user message.
    pub fn build_request(request: &InferenceRequest) -> ChatRequest {
        let schema = serde_json::to_string_pretty(&request.response_schema)
            .unwrap_or_else(|_| request.response_schema.to_string());
        let system = format!(
            "{}\n\nRespond with a single JSON object matching the \"{}\" schema:\n{}",
            request.directive, request.schema_name, schema
        );

        let mut user = request.context.clone();
        if let Some(feedback) = &request.feedback {
            user.push_str(ValidationFeedback::SEPARATOR);
            user.push_str(&feedback.render());
        }

        ChatRequest {
            model: request.model.to_string(),
            messages: vec![ChatMessage::system(system), ChatMessage::user(user)],
            temperature: request.temperature,
            response_format: ResponseFormat::json_object(),
        }
    }
}

/// Map a non-2xx status to a gateway error
pub fn classify_status(status: u16, body: &str) -> GatewayError {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.chars().take(200).collect());
    let detail = format!("HTTP {}: {}", status, message);

    match status {
        401 | 403 => GatewayError::Unauthorized(detail),
        404 => GatewayError::ModelNotAvailable(detail),
        408 => GatewayError::Timeout,
        429 => GatewayError::RateLimited(detail),
        500..=599 => GatewayError::ServiceUnavailable(detail),
        _ => GatewayError::RequestRejected(detail),
    }
}

fn classify_transport(error: reqwest::Error) -> GatewayError {
    if error.is_timeout() {
        GatewayError::Timeout
    } else {
        GatewayError::ConnectionError(error.to_string())
    }
}

#[async_trait]
impl LlmGateway for OpenAiGateway {
    async fn complete(&self, request: &InferenceRequest) -> Result<String, GatewayError> {
        let body = Self::build_request(request);
        debug!(
            "POST chat completion: model={} schema={}",
            body.model, request.schema_name
        );

        let response = self
            .client
            .post(self.config.completions_url())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(classify_transport)?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(classify_status(status.as_u16(), &text));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;

        parsed
            .first_content()
            .map(str::to_string)
            .ok_or_else(|| GatewayError::InvalidResponse("response has no message content".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tribunal_domain::{Model, ResponseSchema, RoleId, ValidationFailure};

    fn request(feedback: Option<ValidationFeedback>) -> InferenceRequest {
        let schema = ResponseSchema::Stance(RoleId::Prosecutor);
        InferenceRequest {
            model: Model::Gpt41Mini,
            directive: "You are the prosecutor.".to_string(),
            context: "CLAIM:\nc\n\nSOURCE:\ns\n".to_string(),
            schema_name: schema.name(),
            response_schema: schema.descriptor(),
            temperature: 0.7,
            feedback,
        }
    }

    #[test]
    fn test_build_request_places_directive_and_context() {
        let wire = OpenAiGateway::build_request(&request(None));
        assert_eq!(wire.model, "gpt-4.1-mini");
        assert_eq!(wire.messages.len(), 2);

        let system = wire.messages[0].content.as_deref().unwrap();
        assert!(system.starts_with("You are the prosecutor."));
        assert!(system.contains("\"stance\" schema"));

        let user = wire.messages[1].content.as_deref().unwrap();
        assert_eq!(user, "CLAIM:\nc\n\nSOURCE:\ns\n");
    }

    #[test]
    fn test_build_request_appends_feedback() {
        let schema = ResponseSchema::Stance(RoleId::Prosecutor);
        let failure = ValidationFailure::EmptyField { field: "summary" };
        let wire =
            OpenAiGateway::build_request(&request(Some(ValidationFeedback::new(&schema, &failure))));
        let user = wire.messages[1].content.as_deref().unwrap();
        assert!(user.contains("Your previous response was invalid because"));
        assert!(user.starts_with("CLAIM:"));
    }

    #[test]
    fn test_classify_status() {
        assert!(matches!(classify_status(401, ""), GatewayError::Unauthorized(_)));
        assert!(matches!(classify_status(404, ""), GatewayError::ModelNotAvailable(_)));
        assert!(classify_status(429, "").is_transient());
        assert!(classify_status(503, "").is_transient());
        assert!(!classify_status(400, "").is_transient());

        let error = classify_status(400, r#"{"error":{"message":"bad schema"}}"#);
        assert_eq!(
            error,
            GatewayError::RequestRejected("HTTP 400: bad schema".to_string())
        );
    }

    #[test]
    fn test_completions_url() {
        let config = OpenAiGatewayConfig::new("http://localhost:8080/", "k");
        assert_eq!(
            config.completions_url(),
            "http://localhost:8080/v1/chat/completions"
        );
    }

    #[test]
    fn test_from_env_missing_key() {
        let result = OpenAiGatewayConfig::from_env(DEFAULT_BASE_URL, "TRIBUNAL_TEST_UNSET_KEY_VAR");
        assert!(matches!(result, Err(GatewayError::Unauthorized(_))));
    }
}
