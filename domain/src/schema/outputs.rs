//! Typed structured outputs, one per [`ResponseSchema`].
//!
//! Enumerated fields (`verdict`, `severity`, `action`, `mutation_type`) and
//! confidences are typed, so out-of-set values and out-of-range confidences
//! are rejected by serde itself. [`StructuredOutput::validate`] adds the
//! shape rules serde cannot express.

use super::ResponseSchema;
use super::validation::ValidationFailure;
use crate::debate::argument::{Argument, ArgumentId};
use crate::debate::policy::DebatePhase;
use crate::debate::result::CitedPoint;
use crate::debate::turn::{CrossExamAction, RoleTurn};
use crate::debate::verdict::{Confidence, ExamAction, MutationType, Verdict};
use crate::role::RoleId;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A record decodable from a model reply
pub trait StructuredOutput: DeserializeOwned + Send + 'static {
    /// Check shape rules that do not depend on the transcript
    fn validate(&self, schema: &ResponseSchema) -> Result<(), ValidationFailure>;
}

/// STANCE output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StanceOutput {
    pub verdict: Verdict,
    pub confidence: Confidence,
    pub arguments: Vec<Argument>,
    #[serde(alias = "reasoning_summary")]
    pub summary: String,
}

impl StanceOutput {
    pub fn into_turn(self, role: RoleId, round: u32) -> RoleTurn {
        RoleTurn {
            role,
            round,
            phase: DebatePhase::Stance,
            verdict: self.verdict,
            confidence: self.confidence,
            arguments: self.arguments,
            summary: self.summary,
        }
    }
}

impl StructuredOutput for StanceOutput {
    fn validate(&self, schema: &ResponseSchema) -> Result<(), ValidationFailure> {
        require_text("summary", &self.summary)?;
        validate_arguments(schema, &self.arguments)
    }
}

/// One response to an opposing argument
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamResponse {
    #[serde(alias = "target_agent")]
    pub target_role: RoleId,
    pub target_argument_id: ArgumentId,
    pub action: ExamAction,
    pub response_text: String,
}

impl ExamResponse {
    pub fn into_action(
        self,
        acting_role: RoleId,
        round: u32,
        phase: DebatePhase,
        updated_confidence: Confidence,
    ) -> CrossExamAction {
        CrossExamAction {
            acting_role,
            target_role: self.target_role,
            target_argument_id: self.target_argument_id,
            action: self.action,
            response_text: self.response_text,
            updated_confidence,
            round,
            phase,
        }
    }
}

/// CROSS_EXAM output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossExamOutput {
    pub responses: Vec<ExamResponse>,
    pub updated_confidence: Confidence,
    #[serde(default)]
    pub new_verdict: Option<Verdict>,
    #[serde(default)]
    pub revised_arguments: Vec<Argument>,
    #[serde(default, alias = "reasoning_summary")]
    pub summary: Option<String>,
}

impl CrossExamOutput {
    /// Split into the role's actions and its revised turn.
    ///
    /// The revised turn keeps the STANCE arguments in their original order,
    /// replacing each one that was revised under the same id.
    pub fn into_records(self, stance: &RoleTurn, round: u32) -> (Vec<CrossExamAction>, RoleTurn) {
        let phase = DebatePhase::CrossExamination;
        let confidence = self.updated_confidence;
        let actions = self
            .responses
            .into_iter()
            .map(|r| r.into_action(stance.role, round, phase, confidence))
            .collect();

        let arguments = stance
            .arguments
            .iter()
            .map(|original| {
                self.revised_arguments
                    .iter()
                    .find(|revised| revised.id == original.id)
                    .unwrap_or(original)
                    .clone()
            })
            .collect();

        let summary = self
            .summary
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| stance.summary.clone());

        let turn = RoleTurn {
            role: stance.role,
            round,
            phase,
            verdict: self.new_verdict.unwrap_or(stance.verdict),
            confidence,
            arguments,
            summary,
        };
        (actions, turn)
    }
}

impl StructuredOutput for CrossExamOutput {
    fn validate(&self, schema: &ResponseSchema) -> Result<(), ValidationFailure> {
        validate_responses(&self.responses)?;
        validate_arguments(schema, &self.revised_arguments)
    }
}

/// COUNTER output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CounterOutput {
    pub responses: Vec<ExamResponse>,
    pub verdict: Verdict,
    pub confidence: Confidence,
    pub arguments: Vec<Argument>,
    #[serde(alias = "reasoning_summary")]
    pub summary: String,
}

impl CounterOutput {
    pub fn into_records(self, role: RoleId, round: u32) -> (Vec<CrossExamAction>, RoleTurn) {
        let phase = DebatePhase::Counter;
        let confidence = self.confidence;
        let actions = self
            .responses
            .into_iter()
            .map(|r| r.into_action(role, round, phase, confidence))
            .collect();
        let turn = RoleTurn {
            role,
            round,
            phase,
            verdict: self.verdict,
            confidence,
            arguments: self.arguments,
            summary: self.summary,
        };
        (actions, turn)
    }
}

impl StructuredOutput for CounterOutput {
    fn validate(&self, schema: &ResponseSchema) -> Result<(), ValidationFailure> {
        require_text("summary", &self.summary)?;
        validate_responses(&self.responses)?;
        validate_arguments(schema, &self.arguments)
    }
}

/// SYNTHESIS output of the terminal role
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthesisOutput {
    #[serde(alias = "final_verdict")]
    pub verdict: Verdict,
    pub confidence: Confidence,
    pub majority_position: String,
    pub key_agreements: Vec<CitedPoint>,
    pub unresolved_disputes: Vec<CitedPoint>,
    pub reasoning: String,
    #[serde(default)]
    pub mutation_types: Vec<MutationType>,
}

impl SynthesisOutput {
    /// Every argument id cited by an agreement or dispute
    pub fn cited_ids(&self) -> impl Iterator<Item = &ArgumentId> {
        self.key_agreements
            .iter()
            .chain(&self.unresolved_disputes)
            .flat_map(|point| point.argument_ids.iter())
    }
}

impl StructuredOutput for SynthesisOutput {
    fn validate(&self, _schema: &ResponseSchema) -> Result<(), ValidationFailure> {
        require_text("reasoning", &self.reasoning)?;
        require_text("majority_position", &self.majority_position)?;
        for point in &self.key_agreements {
            require_text("key_agreements[].text", &point.text)?;
        }
        for point in &self.unresolved_disputes {
            require_text("unresolved_disputes[].text", &point.text)?;
        }
        Ok(())
    }
}

/// Output of the single-call baseline verifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaselineOutput {
    pub verdict: Verdict,
    pub confidence: Confidence,
    pub reasoning: String,
    #[serde(default)]
    pub mutation_types: Vec<MutationType>,
    #[serde(default)]
    pub key_evidence: Vec<String>,
}

impl StructuredOutput for BaselineOutput {
    fn validate(&self, _schema: &ResponseSchema) -> Result<(), ValidationFailure> {
        require_text("reasoning", &self.reasoning)
    }
}

fn require_text(field: &'static str, value: &str) -> Result<(), ValidationFailure> {
    if value.trim().is_empty() {
        return Err(ValidationFailure::EmptyField { field });
    }
    Ok(())
}

fn validate_responses(responses: &[ExamResponse]) -> Result<(), ValidationFailure> {
    for response in responses {
        require_text("responses[].response_text", &response.response_text)?;
    }
    Ok(())
}

/// Ids carry the role prefix and are unique; texts are non-empty
fn validate_arguments(
    schema: &ResponseSchema,
    arguments: &[Argument],
) -> Result<(), ValidationFailure> {
    let Some(role) = schema.role() else {
        return Ok(());
    };
    let mut seen = HashSet::new();
    for argument in arguments {
        require_text("arguments[].text", &argument.text)?;
        if !argument.id.has_prefix_of(role) {
            return Err(ValidationFailure::InvalidArgumentId {
                id: argument.id.to_string(),
                expected_prefix: role.argument_prefix().unwrap_or_default(),
            });
        }
        if !seen.insert(&argument.id) {
            return Err(ValidationFailure::DuplicateArgumentId {
                id: argument.id.to_string(),
            });
        }
    }
    Ok(())
}
