//! Role definitions for the tribunal.
//!
//! A role is an analytic stance invoked as a structured-output producer.
//! The registry is static and shared read-only by every debate run:
//!
//! | Role | Stance | Argument prefix |
//! |------|--------|-----------------|
//! | Prosecutor | hunts for distortion | `PR` |
//! | Defense | argues for a charitable, faithful reading | `DF` |
//! | Epistemologist | quantifies what can and cannot be known | `EP` |
//! | Foreman | synthesizes the final verdict (terminal role) | - |
//! | Verifier | single-call baseline, outside the debate | - |

mod definitions;

pub use definitions::{RoleDefinition, ROLE_DEFINITIONS};

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Identifier of a role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum RoleId {
    Prosecutor,
    Defense,
    Epistemologist,
    Foreman,
    Verifier,
}

impl RoleId {
    /// Roles that argue in STANCE, CROSS_EXAM and COUNTER rounds, in
    /// registry order. Intra-round results are appended in this order.
    pub const ANALYSTS: [RoleId; 3] = [RoleId::Prosecutor, RoleId::Defense, RoleId::Epistemologist];

    /// The terminal role, invoked exactly once per debate.
    pub const SYNTHESIZER: RoleId = RoleId::Foreman;

    const ALLOWED: &'static str = "prosecutor, defense, epistemologist, foreman, verifier";

    pub fn as_str(&self) -> &'static str {
        match self {
            RoleId::Prosecutor => "prosecutor",
            RoleId::Defense => "defense",
            RoleId::Epistemologist => "epistemologist",
            RoleId::Foreman => "foreman",
            RoleId::Verifier => "verifier",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            RoleId::Prosecutor => "Prosecutor",
            RoleId::Defense => "Defense",
            RoleId::Epistemologist => "Epistemologist",
            RoleId::Foreman => "Jury Foreman",
            RoleId::Verifier => "Verifier",
        }
    }

    /// Prefix every argument id produced by this role must carry.
    ///
    /// Prefixes make argument ids unambiguous across roles, so the
    /// synthesizer can cite `PR2` without naming the role.
    pub fn argument_prefix(&self) -> Option<&'static str> {
        match self {
            RoleId::Prosecutor => Some("PR"),
            RoleId::Defense => Some("DF"),
            RoleId::Epistemologist => Some("EP"),
            RoleId::Foreman | RoleId::Verifier => None,
        }
    }

    pub fn is_analyst(&self) -> bool {
        Self::ANALYSTS.contains(self)
    }

    /// Opponents whose latest output this role must address in a COUNTER
    /// round. The advocates face each other; the epistemologist re-assesses
    /// both sides.
    pub fn counter_opponents(&self) -> &'static [RoleId] {
        match self {
            RoleId::Prosecutor => &[RoleId::Defense],
            RoleId::Defense => &[RoleId::Prosecutor],
            RoleId::Epistemologist => &[RoleId::Prosecutor, RoleId::Defense],
            RoleId::Foreman | RoleId::Verifier => &[],
        }
    }

    /// Every other analyst, whose STANCE arguments this role cross-examines.
    pub fn cross_exam_targets(&self) -> Vec<RoleId> {
        Self::ANALYSTS
            .iter()
            .copied()
            .filter(|r| r != self)
            .collect()
    }

    /// Static definition (directive + temperature) for this role
    pub fn definition(&self) -> &'static RoleDefinition {
        RoleDefinition::get(*self)
    }
}

impl std::fmt::Display for RoleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for RoleId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace([' ', '-'], "_").as_str() {
            "prosecutor" => Ok(RoleId::Prosecutor),
            "defense" | "defence" | "defense_advocate" => Ok(RoleId::Defense),
            "epistemologist" => Ok(RoleId::Epistemologist),
            "foreman" | "jury_foreman" => Ok(RoleId::Foreman),
            "verifier" => Ok(RoleId::Verifier),
            other => Err(DomainError::unknown("role", other, Self::ALLOWED)),
        }
    }
}

impl TryFrom<String> for RoleId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RoleId> for String {
    fn from(role: RoleId) -> Self {
        role.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse_accepts_display_variants() {
        assert_eq!("PROSECUTOR".parse::<RoleId>().unwrap(), RoleId::Prosecutor);
        assert_eq!("Jury Foreman".parse::<RoleId>().unwrap(), RoleId::Foreman);
        assert_eq!("defence".parse::<RoleId>().unwrap(), RoleId::Defense);
        assert!("judge".parse::<RoleId>().is_err());
    }

    #[test]
    fn test_role_serde_roundtrip() {
        let json = serde_json::to_string(&RoleId::Epistemologist).unwrap();
        assert_eq!(json, r#""epistemologist""#);
        let parsed: RoleId = serde_json::from_str(r#""Defense""#).unwrap();
        assert_eq!(parsed, RoleId::Defense);
    }

    #[test]
    fn test_synthesizer_is_not_an_analyst() {
        assert!(!RoleId::SYNTHESIZER.is_analyst());
        assert!(!RoleId::Verifier.is_analyst());
        assert!(RoleId::ANALYSTS.iter().all(|r| r.argument_prefix().is_some()));
    }

    #[test]
    fn test_counter_pairs_are_symmetric() {
        assert_eq!(RoleId::Prosecutor.counter_opponents(), &[RoleId::Defense]);
        assert_eq!(RoleId::Defense.counter_opponents(), &[RoleId::Prosecutor]);
        assert_eq!(RoleId::Epistemologist.counter_opponents().len(), 2);
    }

    #[test]
    fn test_cross_exam_targets_exclude_self() {
        let targets = RoleId::Defense.cross_exam_targets();
        assert_eq!(targets, vec![RoleId::Prosecutor, RoleId::Epistemologist]);
    }
}
