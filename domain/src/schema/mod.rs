//! Structured-output contracts.
//!
//! Each invocation declares a [`ResponseSchema`]. The gateway forwards its
//! JSON [`descriptor`](ResponseSchema::descriptor) to the model, and the raw
//! reply is decoded back through [`decode`] into one of the typed
//! [`outputs`]. Failures surface as [`ValidationFailure`] and feed the
//! corrective re-prompt as a [`ValidationFeedback`].

pub mod outputs;
pub mod validation;

pub use outputs::{
    BaselineOutput, CounterOutput, CrossExamOutput, ExamResponse, StanceOutput, StructuredOutput,
    SynthesisOutput,
};
pub use validation::{
    ValidationFailure, ValidationFeedback, decode, extract_json_object, validate_counter,
    validate_cross_exam, validate_synthesis,
};

use crate::debate::policy::DebatePhase;
use crate::debate::verdict::Verdict;
use crate::role::RoleId;
use serde_json::{Value, json};

const SEVERITIES: [&str; 3] = ["high", "medium", "low"];
const MUTATION_TYPES: [&str; 8] = [
    "numerical_distortion",
    "missing_context",
    "causal_confusion",
    "exaggeration",
    "scope_change",
    "temporal_mismatch",
    "added_information",
    "negation_framing",
];

/// The output contract of one invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseSchema {
    Stance(RoleId),
    CrossExamination(RoleId),
    Counter(RoleId),
    Synthesis,
    Baseline,
}

impl ResponseSchema {
    /// Schema an analyst must satisfy in the given phase
    pub fn for_phase(phase: DebatePhase, role: RoleId) -> Self {
        match phase {
            DebatePhase::Stance => ResponseSchema::Stance(role),
            DebatePhase::CrossExamination => ResponseSchema::CrossExamination(role),
            DebatePhase::Counter => ResponseSchema::Counter(role),
            DebatePhase::Synthesis => ResponseSchema::Synthesis,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ResponseSchema::Stance(_) => "stance",
            ResponseSchema::CrossExamination(_) => "cross_examination",
            ResponseSchema::Counter(_) => "counter",
            ResponseSchema::Synthesis => "synthesis",
            ResponseSchema::Baseline => "baseline",
        }
    }

    /// Role whose argument ids this schema constrains
    pub fn role(&self) -> Option<RoleId> {
        match self {
            ResponseSchema::Stance(role)
            | ResponseSchema::CrossExamination(role)
            | ResponseSchema::Counter(role) => Some(*role),
            ResponseSchema::Synthesis | ResponseSchema::Baseline => None,
        }
    }

    /// JSON descriptor sent alongside the directive
    pub fn descriptor(&self) -> Value {
        match self {
            ResponseSchema::Stance(role) => object(
                self.name(),
                &["verdict", "confidence", "arguments", "summary"],
                json!({
                    "verdict": verdict_property(),
                    "confidence": confidence_property(),
                    "arguments": {"type": "array", "items": argument_descriptor(*role)},
                    "summary": {"type": "string", "minLength": 1},
                }),
            ),
            ResponseSchema::CrossExamination(role) => object(
                self.name(),
                &["responses", "updated_confidence"],
                json!({
                    "responses": {
                        "type": "array",
                        "description": "Exactly one entry per opposing argument id",
                        "items": response_descriptor(&["attack", "concede"]),
                    },
                    "updated_confidence": confidence_property(),
                    "new_verdict": {
                        "type": ["string", "null"],
                        "enum": [Verdict::Faithful.as_str(), Verdict::Mutated.as_str(), Verdict::Ambiguous.as_str(), null],
                        "description": "Set only when your stance changed",
                    },
                    "revised_arguments": {
                        "type": "array",
                        "description": "Revisions of your own STANCE arguments, keeping their ids. No new ids.",
                        "items": argument_descriptor(*role),
                    },
                    "summary": {"type": "string"},
                }),
            ),
            ResponseSchema::Counter(role) => object(
                self.name(),
                &["responses", "verdict", "confidence", "arguments", "summary"],
                json!({
                    "responses": {
                        "type": "array",
                        "description": "Exactly one entry per argument in your opponents' latest output",
                        "items": response_descriptor(&["attack", "concede", "refine"]),
                    },
                    "verdict": verdict_property(),
                    "confidence": confidence_property(),
                    "arguments": {"type": "array", "items": argument_descriptor(*role)},
                    "summary": {"type": "string", "minLength": 1},
                }),
            ),
            ResponseSchema::Synthesis => object(
                self.name(),
                &[
                    "verdict",
                    "confidence",
                    "majority_position",
                    "key_agreements",
                    "unresolved_disputes",
                    "reasoning",
                ],
                json!({
                    "verdict": verdict_property(),
                    "confidence": confidence_property(),
                    "majority_position": {"type": "string"},
                    "key_agreements": {"type": "array", "items": cited_point_descriptor()},
                    "unresolved_disputes": {"type": "array", "items": cited_point_descriptor()},
                    "reasoning": {"type": "string", "minLength": 1},
                    "mutation_types": {"type": "array", "items": {"type": "string", "enum": MUTATION_TYPES}},
                }),
            ),
            ResponseSchema::Baseline => object(
                self.name(),
                &["verdict", "confidence", "reasoning"],
                json!({
                    "verdict": verdict_property(),
                    "confidence": confidence_property(),
                    "reasoning": {"type": "string", "minLength": 1},
                    "mutation_types": {"type": "array", "items": {"type": "string", "enum": MUTATION_TYPES}},
                    "key_evidence": {"type": "array", "items": {"type": "string"}},
                }),
            ),
        }
    }
}

impl std::fmt::Display for ResponseSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

fn object(name: &str, required: &[&str], properties: Value) -> Value {
    json!({
        "title": name,
        "type": "object",
        "required": required,
        "properties": properties,
    })
}

fn verdict_property() -> Value {
    json!({
        "type": "string",
        "enum": [Verdict::Faithful.as_str(), Verdict::Mutated.as_str(), Verdict::Ambiguous.as_str()],
    })
}

fn confidence_property() -> Value {
    json!({"type": "number", "minimum": 0.0, "maximum": 1.0})
}

fn argument_descriptor(role: RoleId) -> Value {
    let prefix = role.argument_prefix().unwrap_or_default();
    json!({
        "type": "object",
        "required": ["id", "text", "evidence_quote", "severity"],
        "properties": {
            "id": {
                "type": "string",
                "pattern": format!("^{}[0-9]+$", prefix),
                "description": format!("Unique within your output, e.g. {}1, {}2", prefix, prefix),
            },
            "text": {"type": "string", "minLength": 1},
            "evidence_quote": {"type": "string", "description": "Exact wording quoted from the claim or source"},
            "severity": {"type": "string", "enum": SEVERITIES},
            "mutation_type": {"type": "string", "enum": MUTATION_TYPES},
        },
    })
}

fn response_descriptor(actions: &[&str]) -> Value {
    json!({
        "type": "object",
        "required": ["target_role", "target_argument_id", "action", "response_text"],
        "properties": {
            "target_role": {"type": "string", "enum": RoleId::ANALYSTS.map(|r| r.as_str())},
            "target_argument_id": {"type": "string"},
            "action": {"type": "string", "enum": actions},
            "response_text": {"type": "string", "minLength": 1},
        },
    })
}

fn cited_point_descriptor() -> Value {
    json!({
        "type": "object",
        "required": ["text", "argument_ids"],
        "properties": {
            "text": {"type": "string", "minLength": 1},
            "argument_ids": {
                "type": "array",
                "items": {"type": "string"},
                "description": "Ids exactly as they appear in the transcript",
            },
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_for_phase() {
        assert_eq!(
            ResponseSchema::for_phase(DebatePhase::Counter, RoleId::Defense),
            ResponseSchema::Counter(RoleId::Defense)
        );
        assert_eq!(
            ResponseSchema::for_phase(DebatePhase::Synthesis, RoleId::Foreman),
            ResponseSchema::Synthesis
        );
    }

    #[test]
    fn test_descriptor_lists_required_fields() {
        let descriptor = ResponseSchema::Synthesis.descriptor();
        let required: Vec<&str> = descriptor["required"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|v| v.as_str())
            .collect();
        assert!(required.contains(&"unresolved_disputes"));
        assert_eq!(descriptor["title"], "synthesis");
    }

    #[test]
    fn test_argument_pattern_uses_role_prefix() {
        let descriptor = ResponseSchema::Stance(RoleId::Epistemologist).descriptor();
        assert_eq!(
            descriptor["properties"]["arguments"]["items"]["properties"]["id"]["pattern"],
            "^EP[0-9]+$"
        );
    }

    #[test]
    fn test_cross_exam_forbids_refine() {
        let descriptor = ResponseSchema::CrossExamination(RoleId::Prosecutor).descriptor();
        let actions = &descriptor["properties"]["responses"]["items"]["properties"]["action"]["enum"];
        assert_eq!(actions, &json!(["attack", "concede"]));
    }
}
