//! Debate configuration from TOML (`[debate]` section)

use serde::{Deserialize, Serialize};
use tribunal_domain::{
    ConfigIssue, ConfigIssueCode, ContextBudget, DEFAULT_CONTEXT_BUDGET_CHARS, RoundPolicy,
};

/// Raw debate configuration from TOML
///
/// # Example
///
/// ```toml
/// [debate]
/// random_rounds = "2-4"
/// max_retries = 3
/// backoff_ms = 500
/// max_concurrent_calls = 3
/// context_budget_chars = 48000
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDebateConfig {
    /// Exact round count (excludes `random_rounds`)
    pub fixed_rounds: Option<u32>,
    /// Inclusive range "MIN-MAX" drawn once per run
    pub random_rounds: Option<String>,
    pub max_retries: u32,
    /// First retry delay in milliseconds, doubled per retry
    pub backoff_ms: u64,
    pub max_concurrent_calls: usize,
    pub context_budget_chars: usize,
}

impl Default for FileDebateConfig {
    fn default() -> Self {
        Self {
            fixed_rounds: None,
            random_rounds: None,
            max_retries: 3,
            backoff_ms: 500,
            max_concurrent_calls: 3,
            context_budget_chars: DEFAULT_CONTEXT_BUDGET_CHARS,
        }
    }
}

impl FileDebateConfig {
    /// Convert to a domain `RoundPolicy`, returning validation issues.
    ///
    /// An invalid policy is an error; the returned policy is then the
    /// default and should not be used.
    pub fn to_round_policy(&self) -> (RoundPolicy, Vec<ConfigIssue>) {
        let invalid = |field: &str, message: String| {
            ConfigIssue::error(
                ConfigIssueCode::InvalidConstraint {
                    field: field.to_string(),
                },
                message,
            )
        };

        match (self.fixed_rounds, &self.random_rounds) {
            (Some(_), Some(_)) => (
                RoundPolicy::default(),
                vec![ConfigIssue::error(
                    ConfigIssueCode::ConflictingKeys {
                        first: "debate.fixed_rounds".to_string(),
                        second: "debate.random_rounds".to_string(),
                    },
                    "debate.fixed_rounds and debate.random_rounds cannot both be set",
                )],
            ),
            (Some(n), None) => match RoundPolicy::fixed(n) {
                Ok(policy) => (policy, vec![]),
                Err(e) => (
                    RoundPolicy::default(),
                    vec![invalid("debate.fixed_rounds", e.to_string())],
                ),
            },
            (None, Some(range)) => match RoundPolicy::parse_range(range) {
                Ok(policy) => (policy, vec![]),
                Err(e) => (
                    RoundPolicy::default(),
                    vec![invalid("debate.random_rounds", e.to_string())],
                ),
            },
            (None, None) => (RoundPolicy::default(), vec![]),
        }
    }

    /// Convert to a domain `ContextBudget`, falling back to the default
    /// with a warning when the value is too small.
    pub fn to_context_budget(&self) -> (ContextBudget, Vec<ConfigIssue>) {
        let budget = ContextBudget::new(self.context_budget_chars);
        let problems = budget.validate();
        if problems.is_empty() {
            return (budget, vec![]);
        }
        let issues = problems
            .into_iter()
            .map(|msg| {
                ConfigIssue::warning(
                    ConfigIssueCode::InvalidConstraint {
                        field: "debate.context_budget_chars".to_string(),
                    },
                    msg,
                )
            })
            .collect();
        (ContextBudget::default(), issues)
    }

    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = self.to_round_policy().1;
        issues.extend(self.to_context_budget().1);
        if self.max_concurrent_calls == 0 {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::InvalidConstraint {
                    field: "debate.max_concurrent_calls".to_string(),
                },
                "debate.max_concurrent_calls is 0, using 1",
            ));
        }
        issues
    }
}
