//! Context budget for role invocations.
//!
//! [`ContextBudget`] bounds the size of the context document sent with every
//! role call. The claim and source text are always kept in full; only debate
//! history excerpts are dropped (oldest first) to fit the budget. Corrective
//! feedback on a re-prompt counts against the same budget.

use serde::{Deserialize, Serialize};

/// Default budget in characters
pub const DEFAULT_CONTEXT_BUDGET_CHARS: usize = 48_000;

/// Character budget for a rendered context document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextBudget {
    max_chars: usize,
}

impl ContextBudget {
    pub fn new(max_chars: usize) -> Self {
        Self { max_chars }
    }

    /// No truncation at all
    pub fn unlimited() -> Self {
        Self {
            max_chars: usize::MAX,
        }
    }

    pub fn max_chars(&self) -> usize {
        self.max_chars
    }

    /// The budget left after setting aside `chars` for other request text
    pub fn reserve(&self, chars: usize) -> Self {
        Self {
            max_chars: self.max_chars.saturating_sub(chars),
        }
    }

    /// Validate this budget, returning a list of issues.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();
        if self.max_chars < 1_000 {
            issues.push(format!(
                "context_budget_chars ({}) leaves no room for debate history; use at least 1000",
                self.max_chars
            ));
        }
        issues
    }
}

impl Default for ContextBudget {
    fn default() -> Self {
        Self::new(DEFAULT_CONTEXT_BUDGET_CHARS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        assert_eq!(ContextBudget::default().max_chars(), 48_000);
    }

    #[test]
    fn test_reserve() {
        assert_eq!(ContextBudget::new(2_000).reserve(300).max_chars(), 1_700);
        assert_eq!(ContextBudget::new(100).reserve(300).max_chars(), 0);
    }

    #[test]
    fn test_validate_ok() {
        assert!(ContextBudget::default().validate().is_empty());
        assert!(ContextBudget::unlimited().validate().is_empty());
    }

    #[test]
    fn test_validate_too_small() {
        let issues = ContextBudget::new(200).validate();
        assert_eq!(issues.len(), 1);
        assert!(issues[0].contains("context_budget_chars"));
    }
}
