//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod audit;
mod debate;
mod gateway;
mod output;

pub use audit::FileAuditConfig;
pub use debate::FileDebateConfig;
pub use gateway::FileGatewayConfig;
pub use output::FileOutputConfig;

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tribunal_application::DebateParams;
use tribunal_domain::ConfigIssue;

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Inference endpoint and model selection
    pub gateway: FileGatewayConfig,
    /// Round policy and invocation control
    pub debate: FileDebateConfig,
    /// Output settings
    pub output: FileOutputConfig,
    /// Gateway call audit trail
    pub audit: FileAuditConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = self.gateway.validate();
        issues.extend(self.debate.validate());
        issues
    }

    /// Build invocation parameters. Invalid values fall back to defaults;
    /// the issues are the same ones [`validate`](Self::validate) reports.
    pub fn to_debate_params(&self) -> DebateParams {
        let (model, _) = self.gateway.resolve_model();
        let (budget, _) = self.debate.to_context_budget();

        DebateParams::default()
            .with_model(model)
            .with_temperature(self.gateway.temperature)
            .with_call_timeout(Duration::from_secs(self.gateway.timeout_secs.max(1)))
            .with_max_retries(self.debate.max_retries)
            .with_backoff_base(Duration::from_millis(self.debate.backoff_ms))
            .with_max_concurrent_calls(self.debate.max_concurrent_calls)
            .with_context_budget(budget)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tribunal_domain::{Model, OutputFormat, RoundPolicy};

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[gateway]
tier = "quality"
base_url = "http://localhost:8080"
timeout_secs = 30
temperature = 0.2

[debate]
fixed_rounds = 3
max_retries = 5
backoff_ms = 250
max_concurrent_calls = 2

[output]
format = "full"
color = false

[audit]
path = "/var/log/tribunal.jsonl"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert!(config.validate().is_empty());
        assert_eq!(config.gateway.base_url, "http://localhost:8080");
        assert_eq!(config.debate.to_round_policy().0, RoundPolicy::FixedRounds(3));
        assert_eq!(config.output.format, Some(OutputFormat::Full));
        assert!(!config.output.color);
        assert!(config.audit.path.is_some());

        let params = config.to_debate_params();
        assert_eq!(params.model, Model::Gpt41);
        assert_eq!(params.temperature, Some(0.2));
        assert_eq!(params.call_timeout, Duration::from_secs(30));
        assert_eq!(params.max_retries, 5);
        assert_eq!(params.backoff_base, Duration::from_millis(250));
        assert_eq!(params.max_concurrent_calls, 2);
    }

    #[test]
    fn test_deserialize_partial_config() {
        let toml_str = r#"
[gateway]
model = "gpt-4o-mini"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.to_debate_params().model, Model::Gpt4oMini);
        // Defaults should apply
        assert_eq!(config.debate.max_retries, 3);
        assert!(config.output.color);
        assert!(config.audit.path.is_none());
    }

    #[test]
    fn test_default_config() {
        let config = FileConfig::default();
        assert!(config.validate().is_empty());
        let params = config.to_debate_params();
        assert_eq!(params.model, Model::Gpt41Mini);
        assert_eq!(params.max_concurrent_calls, 3);
        assert_eq!(params.context_budget.max_chars(), 48_000);
    }
}
