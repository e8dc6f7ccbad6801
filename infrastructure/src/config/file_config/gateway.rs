//! Gateway configuration from TOML (`[gateway]` section)

use crate::openai::gateway::{DEFAULT_API_KEY_ENV, DEFAULT_BASE_URL};
use serde::{Deserialize, Serialize};
use tribunal_domain::{ConfigIssue, ConfigIssueCode, LatencyTier, Model};

/// Raw gateway configuration from TOML
///
/// # Example
///
/// ```toml
/// [gateway]
/// tier = "quality"
/// base_url = "http://localhost:8080"
/// timeout_secs = 90
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileGatewayConfig {
    /// Latency tier ("fast" or "quality"); ignored when `model` is set
    pub tier: Option<String>,
    /// Explicit model name
    pub model: Option<String>,
    pub base_url: String,
    /// Environment variable that holds the API key
    pub api_key_env: String,
    /// Overrides every role's default temperature
    pub temperature: Option<f32>,
    /// Per-call deadline in seconds
    pub timeout_secs: u64,
}

impl Default for FileGatewayConfig {
    fn default() -> Self {
        Self {
            tier: None,
            model: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            temperature: None,
            timeout_secs: 60,
        }
    }
}

impl FileGatewayConfig {
    pub fn parse_tier(&self) -> (LatencyTier, Vec<ConfigIssue>) {
        let Some(raw) = &self.tier else {
            return (LatencyTier::default(), vec![]);
        };
        match raw.parse::<LatencyTier>() {
            Ok(tier) => (tier, vec![]),
            Err(_) => (
                LatencyTier::default(),
                vec![ConfigIssue::warning(
                    ConfigIssueCode::InvalidEnumValue {
                        field: "gateway.tier".to_string(),
                        value: raw.clone(),
                        valid_values: vec!["fast".to_string(), "quality".to_string()],
                    },
                    format!("gateway.tier: unknown value '{}', falling back to 'fast'", raw),
                )],
            ),
        }
    }

    /// The explicit model if set, otherwise the tier's model
    pub fn resolve_model(&self) -> (Model, Vec<ConfigIssue>) {
        let (tier, mut issues) = self.parse_tier();
        match self.model.as_deref().map(str::trim) {
            Some("") => {
                issues.push(ConfigIssue::warning(
                    ConfigIssueCode::InvalidConstraint {
                        field: "gateway.model".to_string(),
                    },
                    "gateway.model is empty, using the tier's model",
                ));
                (tier.model(), issues)
            }
            Some(name) => {
                let Ok(model) = name.parse::<Model>();
                (model, issues)
            }
            None => (tier.model(), issues),
        }
    }

    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = self.resolve_model().1;
        if self.timeout_secs == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::InvalidConstraint {
                    field: "gateway.timeout_secs".to_string(),
                },
                "gateway.timeout_secs must be at least 1",
            ));
        }
        if let Some(t) = self.temperature
            && !(0.0..=2.0).contains(&t)
        {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::InvalidConstraint {
                    field: "gateway.temperature".to_string(),
                },
                format!("gateway.temperature ({}) must be within 0.0..=2.0", t),
            ));
        }
        if self.api_key_env.trim().is_empty() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::InvalidConstraint {
                    field: "gateway.api_key_env".to_string(),
                },
                "gateway.api_key_env must name an environment variable",
            ));
        }
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_resolves_fast_tier() {
        let config = FileGatewayConfig::default();
        assert_eq!(config.resolve_model().0, Model::Gpt41Mini);
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_model_overrides_tier() {
        let config = FileGatewayConfig {
            tier: Some("quality".to_string()),
            model: Some("gpt-4o".to_string()),
            ..Default::default()
        };
        assert_eq!(config.resolve_model().0, Model::Gpt4o);
    }

    #[test]
    fn test_unknown_tier_warns() {
        let config = FileGatewayConfig {
            tier: Some("turbo".to_string()),
            ..Default::default()
        };
        let (model, issues) = config.resolve_model();
        assert_eq!(model, Model::Gpt41Mini);
        assert_eq!(issues.len(), 1);
        assert!(!issues[0].is_error());
    }

    #[test]
    fn test_invalid_values_are_errors() {
        let config = FileGatewayConfig {
            timeout_secs: 0,
            temperature: Some(3.0),
            ..Default::default()
        };
        let issues = config.validate();
        assert_eq!(issues.len(), 2);
        assert!(issues.iter().all(ConfigIssue::is_error));
    }
}
