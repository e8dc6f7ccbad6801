//! Final outputs of a debate run and of the single-call baseline

use super::argument::ArgumentId;
use super::transcript::Transcript;
use super::verdict::{Confidence, MutationType, Verdict};
use crate::core::model::Model;
use crate::core::statement::{Claim, SourceText};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A point of agreement or dispute, backed by transcript argument ids
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CitedPoint {
    pub text: String,
    #[serde(default, alias = "argument_ids")]
    pub argument_ids: Vec<ArgumentId>,
}

impl std::fmt::Display for CitedPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text)?;
        if !self.argument_ids.is_empty() {
            let ids: Vec<&str> = self.argument_ids.iter().map(ArgumentId::as_str).collect();
            write!(f, " [{}]", ids.join(", "))?;
        }
        Ok(())
    }
}

/// Result of a complete debate run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebateResult {
    pub claim: Claim,
    pub source_text: SourceText,
    pub verdict: Verdict,
    pub confidence: Confidence,
    pub reasoning: String,
    pub majority_position: String,
    pub key_agreements: Vec<CitedPoint>,
    pub unresolved_disputes: Vec<CitedPoint>,
    #[serde(default)]
    pub mutation_types: Vec<MutationType>,
    pub full_transcript: Transcript,
    pub model: Model,
    pub rounds_completed: u32,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl DebateResult {
    pub fn duration_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }

    /// Whether any analyst raised a high-severity argument during the debate
    pub fn has_high_severity_argument(&self) -> bool {
        self.full_transcript.turns().any(|t| t.has_high_severity())
    }
}

/// Result of the single-call verifier used as a comparison baseline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaselineResult {
    pub claim: Claim,
    pub source_text: SourceText,
    pub verdict: Verdict,
    pub confidence: Confidence,
    pub reasoning: String,
    #[serde(default)]
    pub mutation_types: Vec<MutationType>,
    #[serde(default)]
    pub key_evidence: Vec<String>,
    pub model: Model,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl BaselineResult {
    pub fn duration_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }
}

/// Debate vs. baseline on the same claim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebateComparison {
    pub debate_verdict: Verdict,
    pub baseline_verdict: Verdict,
    pub debate_confidence: Confidence,
    pub baseline_confidence: Confidence,
}

impl DebateComparison {
    pub fn new(debate: &DebateResult, baseline: &BaselineResult) -> Self {
        Self {
            debate_verdict: debate.verdict,
            baseline_verdict: baseline.verdict,
            debate_confidence: debate.confidence,
            baseline_confidence: baseline.confidence,
        }
    }

    pub fn verdicts_agree(&self) -> bool {
        self.debate_verdict == self.baseline_verdict
    }

    /// Debate confidence minus baseline confidence
    pub fn confidence_delta(&self) -> f64 {
        self.debate_confidence.value() - self.baseline_confidence.value()
    }
}
