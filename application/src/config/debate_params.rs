//! Debate parameters: per-run invocation control.
//!
//! [`DebateParams`] groups the static parameters that control how
//! [`RunDebateUseCase`](crate::use_cases::run_debate::RunDebateUseCase)
//! invokes the gateway. These are application-layer concerns, not domain
//! policy: the round policy itself is passed per run.

use std::time::Duration;
use tribunal_domain::{ContextBudget, Model};

/// Invocation control parameters.
///
/// Controls the model, retry budget, backoff, deadlines, concurrency and
/// context size of every role call in a run.
#[derive(Debug, Clone)]
pub struct DebateParams {
    /// Model serving every role
    pub model: Model,
    /// Overrides each role's default sampling temperature
    pub temperature: Option<f32>,
    /// Retries after a transient gateway failure (attempts = retries + 1)
    pub max_retries: u32,
    /// First backoff delay; doubled per retry
    pub backoff_base: Duration,
    /// Upper bound on a single backoff delay
    pub backoff_cap: Duration,
    /// Deadline for each gateway call
    pub call_timeout: Duration,
    /// Per-run bound on in-flight gateway calls
    pub max_concurrent_calls: usize,
    pub context_budget: ContextBudget,
}

impl Default for DebateParams {
    fn default() -> Self {
        Self {
            model: Model::default(),
            temperature: None,
            max_retries: 3,
            backoff_base: Duration::from_millis(500),
            backoff_cap: Duration::from_secs(8),
            call_timeout: Duration::from_secs(60),
            max_concurrent_calls: 3,
            context_budget: ContextBudget::default(),
        }
    }
}

impl DebateParams {
    // ==================== Builder Methods ====================

    pub fn with_model(mut self, model: Model) -> Self {
        self.model = model;
        self
    }

    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_retries(mut self, max: u32) -> Self {
        self.max_retries = max;
        self
    }

    pub fn with_backoff_base(mut self, base: Duration) -> Self {
        self.backoff_base = base;
        self
    }

    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    pub fn with_max_concurrent_calls(mut self, max: usize) -> Self {
        self.max_concurrent_calls = max.max(1);
        self
    }

    pub fn with_context_budget(mut self, budget: ContextBudget) -> Self {
        self.context_budget = budget;
        self
    }

    /// Delay before retry number `retry` (0-based): `base * 2^retry`, capped
    pub fn backoff_delay(&self, retry: u32) -> Duration {
        let factor = 2u32.saturating_pow(retry);
        self.backoff_base
            .checked_mul(factor)
            .unwrap_or(self.backoff_cap)
            .min(self.backoff_cap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let params = DebateParams::default();
        assert_eq!(params.model, Model::Gpt41Mini);
        assert_eq!(params.max_retries, 3);
        assert_eq!(params.max_concurrent_calls, 3);
        assert_eq!(params.context_budget.max_chars(), 48_000);
        assert!(params.temperature.is_none());
    }

    #[test]
    fn test_builder() {
        let params = DebateParams::default()
            .with_model(Model::Gpt41)
            .with_max_retries(1)
            .with_max_concurrent_calls(0)
            .with_call_timeout(Duration::from_secs(5));

        assert_eq!(params.model, Model::Gpt41);
        assert_eq!(params.max_retries, 1);
        assert_eq!(params.max_concurrent_calls, 1);
        assert_eq!(params.call_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_backoff_is_exponential_and_capped() {
        let params = DebateParams::default().with_backoff_base(Duration::from_millis(500));
        assert_eq!(params.backoff_delay(0), Duration::from_millis(500));
        assert_eq!(params.backoff_delay(1), Duration::from_millis(1000));
        assert_eq!(params.backoff_delay(2), Duration::from_millis(2000));
        assert_eq!(params.backoff_delay(10), Duration::from_secs(8));
        assert_eq!(params.backoff_delay(40), Duration::from_secs(8));
    }
}
