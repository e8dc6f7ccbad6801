//! Arguments raised by analytic roles

use super::verdict::{MutationType, Severity};
use crate::role::RoleId;
use serde::{Deserialize, Serialize};

/// Identifier of an argument, unique within its role's output (`PR1`, `DF2`, ...)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArgumentId(String);

impl ArgumentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the id is the given role's prefix followed by a number
    /// (`PR1`, `PR12`; not `PR`, `PRX` or `PR-1`).
    pub fn has_prefix_of(&self, role: RoleId) -> bool {
        let Some(number) = role
            .argument_prefix()
            .and_then(|prefix| self.0.strip_prefix(prefix))
        else {
            return false;
        };
        !number.is_empty() && number.bytes().all(|b| b.is_ascii_digit())
    }

    /// Role that owns this id, derived from its prefix
    pub fn owner(&self) -> Option<RoleId> {
        RoleId::ANALYSTS
            .iter()
            .copied()
            .find(|role| self.has_prefix_of(*role))
    }
}

impl std::fmt::Display for ArgumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ArgumentId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// One point raised by a role
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Argument {
    pub id: ArgumentId,
    pub text: String,
    #[serde(default, alias = "evidence_quote", skip_serializing_if = "Option::is_none")]
    pub evidence_quote: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    /// Kind of distortion, when the argument asserts one
    #[serde(default, alias = "mutation_type", skip_serializing_if = "Option::is_none")]
    pub mutation_type: Option<MutationType>,
}

impl Argument {
    /// One-line rendering used in transcript summaries
    pub fn render_line(&self) -> String {
        let mut line = format!("[{}]", self.id);
        if let Some(severity) = self.severity {
            line.push_str(&format!(" ({})", severity));
        }
        line.push(' ');
        line.push_str(&self.text);
        if let Some(mutation) = self.mutation_type {
            line.push_str(&format!(" <{}>", mutation));
        }
        if let Some(quote) = self.evidence_quote.as_deref()
            && !quote.trim().is_empty()
        {
            line.push_str(&format!("\n      evidence: \"{}\"", quote.trim()));
        }
        line
    }

    pub fn is_high_severity(&self) -> bool {
        self.severity == Some(Severity::High)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argument_id_prefix() {
        let id = ArgumentId::new("PR1");
        assert!(id.has_prefix_of(RoleId::Prosecutor));
        assert!(!id.has_prefix_of(RoleId::Defense));
        assert_eq!(id.owner(), Some(RoleId::Prosecutor));

        assert!(!ArgumentId::new("PR").has_prefix_of(RoleId::Prosecutor));
        assert_eq!(ArgumentId::new("X1").owner(), None);
        assert!(ArgumentId::new("DF12").has_prefix_of(RoleId::Defense));
    }

    #[test]
    fn test_argument_id_suffix_must_be_numeric() {
        for id in ["PRX", "PR-1", "PR1a", "PR 1"] {
            assert!(!ArgumentId::new(id).has_prefix_of(RoleId::Prosecutor), "{}", id);
        }
        assert_eq!(ArgumentId::new("EPx").owner(), None);
    }

    #[test]
    fn test_argument_accepts_snake_and_camel_case() {
        let snake: Argument = serde_json::from_str(
            r#"{"id":"DF1","text":"rounding","evidence_quote":"14,500","severity":"low"}"#,
        )
        .unwrap();
        let camel: Argument = serde_json::from_str(
            r#"{"id":"DF1","text":"rounding","evidenceQuote":"14,500","severity":"low"}"#,
        )
        .unwrap();
        assert_eq!(snake, camel);
        assert_eq!(snake.mutation_type, None);
        assert_eq!(snake.severity, Some(Severity::Low));
    }

    #[test]
    fn test_severity_and_evidence_are_optional() {
        let argument: Argument =
            serde_json::from_str(r#"{"id":"EP1","text":"vague scope"}"#).unwrap();
        assert_eq!(argument.severity, None);
        assert_eq!(argument.render_line(), "[EP1] vague scope");
    }

    #[test]
    fn test_render_line() {
        let argument = Argument {
            id: ArgumentId::new("PR1"),
            text: "Bound reversed".to_string(),
            evidence_quote: Some("more than 14,500".to_string()),
            severity: Some(Severity::High),
            mutation_type: Some(MutationType::NumericalDistortion),
        };
        let line = argument.render_line();
        assert!(line.starts_with("[PR1] (high) Bound reversed <numerical_distortion>"));
        assert!(argument.is_high_severity());
        assert!(line.contains("evidence: \"more than 14,500\""));
    }
}
