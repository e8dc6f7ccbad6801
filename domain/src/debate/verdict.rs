//! Closed-set value objects shared by every role output.
//!
//! All of these reject unknown values at the parse boundary: a role that
//! answers `"verdict": "probably"` produces a schema violation, never a
//! free-form string that leaks into the transcript.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Final or interim classification of a claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    /// The claim represents the source (minor acceptable variation allowed)
    Faithful,
    /// The claim distorts the source in a meaningful way
    Mutated,
    /// Evidence genuinely supports more than one reading
    Ambiguous,
}

impl Verdict {
    pub const ALLOWED: &'static str = "faithful, mutated, ambiguous";

    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Faithful => "faithful",
            Verdict::Mutated => "mutated",
            Verdict::Ambiguous => "ambiguous",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Verdict {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "faithful" => Ok(Verdict::Faithful),
            "mutated" => Ok(Verdict::Mutated),
            "ambiguous" => Ok(Verdict::Ambiguous),
            other => Err(DomainError::unknown("verdict", other, Self::ALLOWED)),
        }
    }
}

/// How much an argument weighs on the verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Response to an opposing argument during cross-examination or counter rounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExamAction {
    /// The argument is flawed, weak or irrelevant
    Attack,
    /// The argument is accepted
    Concede,
    /// The argument is partially accepted and narrowed (counter rounds only)
    Refine,
}

impl ExamAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExamAction::Attack => "attack",
            ExamAction::Concede => "concede",
            ExamAction::Refine => "refine",
        }
    }
}

impl std::fmt::Display for ExamAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Kind of distortion an argument points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationType {
    NumericalDistortion,
    MissingContext,
    CausalConfusion,
    Exaggeration,
    ScopeChange,
    TemporalMismatch,
    AddedInformation,
    NegationFraming,
}

impl MutationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MutationType::NumericalDistortion => "numerical_distortion",
            MutationType::MissingContext => "missing_context",
            MutationType::CausalConfusion => "causal_confusion",
            MutationType::Exaggeration => "exaggeration",
            MutationType::ScopeChange => "scope_change",
            MutationType::TemporalMismatch => "temporal_mismatch",
            MutationType::AddedInformation => "added_information",
            MutationType::NegationFraming => "negation_framing",
        }
    }
}

impl std::fmt::Display for MutationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A calibrated probability in `[0, 1]`.
///
/// Out-of-range values are rejected, never clamped: a model reporting 1.3 is
/// miscalibrated and that must surface as a validation failure.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Confidence(f64);

impl Confidence {
    pub fn try_new(value: f64) -> Result<Self, DomainError> {
        if value.is_finite() && (0.0..=1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(DomainError::ConfidenceOutOfRange(value))
        }
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Confidence {
    type Error = DomainError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

impl From<Confidence> for f64 {
    fn from(confidence: Confidence) -> Self {
        confidence.0
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.0}%", self.0 * 100.0)
    }
}
