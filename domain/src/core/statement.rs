//! Claim and source text value objects
//!
//! Both are opaque, immutable strings: the claim under verification and the
//! authoritative statement it is checked against. Neither is ever mutated or
//! truncated once a debate starts.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// The short statement under verification (Value Object)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Claim {
    content: String,
}

impl Claim {
    /// Create a claim, rejecting empty or whitespace-only text
    pub fn try_new(content: impl Into<String>) -> Result<Self, DomainError> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(DomainError::EmptyStatement { kind: "claim" });
        }
        Ok(Self { content })
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn into_content(self) -> String {
        self.content
    }
}

impl std::fmt::Display for Claim {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.content)
    }
}

/// The authoritative statement a claim is checked against (Value Object)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceText {
    content: String,
}

impl SourceText {
    /// Create a source text, rejecting empty or whitespace-only text
    pub fn try_new(content: impl Into<String>) -> Result<Self, DomainError> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(DomainError::EmptyStatement {
                kind: "source text",
            });
        }
        Ok(Self { content })
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn into_content(self) -> String {
        self.content
    }
}

impl std::fmt::Display for SourceText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claim_creation() {
        let claim = Claim::try_new("less than 14,550 people have died").unwrap();
        assert_eq!(claim.content(), "less than 14,550 people have died");
    }

    #[test]
    fn test_empty_claim_rejected() {
        assert_eq!(
            Claim::try_new("   ").unwrap_err(),
            DomainError::EmptyStatement { kind: "claim" }
        );
    }

    #[test]
    fn test_empty_source_rejected() {
        assert!(SourceText::try_new("").is_err());
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let source = SourceText::try_new("more than 14,500 deaths").unwrap();
        assert_eq!(
            serde_json::to_string(&source).unwrap(),
            r#""more than 14,500 deaths""#
        );
    }
}
