//! Decoding and validation of model replies.
//!
//! Validation runs in two layers:
//!
//! 1. [`decode`]: raw text → typed output, plus the output's own shape rules
//! 2. contextual checks against the transcript ([`validate_cross_exam`],
//!    [`validate_counter`], [`validate_synthesis`])
//!
//! Either layer failing makes the response malformed.

use super::ResponseSchema;
use super::outputs::{CounterOutput, CrossExamOutput, ExamResponse, StructuredOutput, SynthesisOutput};
use crate::debate::argument::ArgumentId;
use crate::debate::transcript::Transcript;
use crate::debate::verdict::ExamAction;
use crate::role::RoleId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Why a model reply failed its schema
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationFailure {
    #[error("the response did not contain a JSON object ({0})")]
    NotJson(String),

    #[error("the response does not match the {schema} schema: {detail}")]
    Schema { schema: &'static str, detail: String },

    #[error("field `{field}` must not be empty")]
    EmptyField { field: &'static str },

    #[error("argument id '{id}' must start with '{expected_prefix}' followed by a number")]
    InvalidArgumentId {
        id: String,
        expected_prefix: &'static str,
    },

    #[error("argument id '{id}' is used more than once")]
    DuplicateArgumentId { id: String },

    #[error("argument '{argument_id}' does not exist in any earlier output of {target_role}")]
    DanglingReference {
        target_role: RoleId,
        argument_id: String,
    },

    #[error("argument '{argument_id}' of {target_role} was not addressed")]
    MissingResponse {
        target_role: RoleId,
        argument_id: String,
    },

    #[error("argument '{argument_id}' of {target_role} was addressed more than once")]
    DuplicateResponse {
        target_role: RoleId,
        argument_id: String,
    },

    #[error("action '{action}' is not allowed in this round")]
    UnexpectedAction { action: ExamAction },

    #[error("a role cannot respond to its own argument '{argument_id}'")]
    SelfReference { argument_id: String },

    #[error("{target_role} is not an opponent in this round")]
    NotAnOpponent { target_role: RoleId },

    #[error("'{id}' is not one of your STANCE arguments; only revisions with the same ids are allowed")]
    NewArgument { id: String },

    #[error("cited argument id '{id}' does not appear in the transcript")]
    UnknownCitation { id: String },
}

/// Structured feedback carried into the corrective re-prompt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationFeedback {
    pub schema_name: String,
    pub reason: String,
}

impl ValidationFeedback {
    /// Separates the feedback from the context it follows
    pub const SEPARATOR: &'static str = "\n\n";

    pub fn new(schema: &ResponseSchema, failure: &ValidationFailure) -> Self {
        Self {
            schema_name: schema.name().to_string(),
            reason: failure.to_string(),
        }
    }

    /// Text appended to the next request
    pub fn render(&self) -> String {
        format!(
            "Your previous response was invalid because {}. Reissue your answer in the exact {} schema.",
            self.reason, self.schema_name
        )
    }

    /// Characters the feedback adds to a request, separator included
    pub fn appended_len(&self) -> usize {
        Self::SEPARATOR.len() + self.render().chars().count()
    }
}

/// Extract the outermost JSON object from a reply that may carry prose or
/// markdown fences around it.
pub fn extract_json_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    (end > start).then(|| &raw[start..=end])
}

/// Decode a raw reply into a typed output and check its shape.
pub fn decode<T: StructuredOutput>(raw: &str, schema: &ResponseSchema) -> Result<T, ValidationFailure> {
    let json = extract_json_object(raw)
        .ok_or_else(|| ValidationFailure::NotJson("no object delimiters found".to_string()))?;

    let output: T = serde_json::from_str(json).map_err(|e| {
        if e.is_syntax() || e.is_eof() {
            ValidationFailure::NotJson(e.to_string())
        } else {
            ValidationFailure::Schema {
                schema: schema.name(),
                detail: e.to_string(),
            }
        }
    })?;

    output.validate(schema)?;
    Ok(output)
}

/// CROSS_EXAM rules: exactly one `attack`/`concede` per STANCE argument of
/// every other analyst, no self-targets, and no new argument ids.
pub fn validate_cross_exam(
    role: RoleId,
    round: u32,
    output: &CrossExamOutput,
    transcript: &Transcript,
) -> Result<(), ValidationFailure> {
    let targets = role.cross_exam_targets();
    for response in &output.responses {
        if response.action == ExamAction::Refine {
            return Err(ValidationFailure::UnexpectedAction {
                action: response.action,
            });
        }
        check_reference(role, &targets, round, response, transcript)?;
    }
    require_unique(&output.responses)?;

    for target in &targets {
        if let Some(stance) = transcript.turn(*target, 1) {
            require_coverage(*target, stance.argument_ids(), &output.responses)?;
        }
    }

    let own = transcript.turn(role, 1);
    for revised in &output.revised_arguments {
        if own.and_then(|t| t.argument(&revised.id)).is_none() {
            return Err(ValidationFailure::NewArgument {
                id: revised.id.to_string(),
            });
        }
    }
    Ok(())
}

/// COUNTER rules: every argument in each opponent's latest output is
/// addressed exactly once, and every reference resolves.
pub fn validate_counter(
    role: RoleId,
    round: u32,
    output: &CounterOutput,
    transcript: &Transcript,
) -> Result<(), ValidationFailure> {
    let opponents = role.counter_opponents();
    for response in &output.responses {
        check_reference(role, opponents, round, response, transcript)?;
    }
    require_unique(&output.responses)?;
    for opponent in opponents {
        if let Some(latest) = transcript.latest_turn(*opponent, round) {
            require_coverage(*opponent, latest.argument_ids(), &output.responses)?;
        }
    }
    Ok(())
}

/// Every id cited by the synthesizer must exist in the transcript
pub fn validate_synthesis(
    output: &SynthesisOutput,
    transcript: &Transcript,
) -> Result<(), ValidationFailure> {
    match output
        .cited_ids()
        .find(|id| !transcript.contains_argument_id(id))
    {
        Some(id) => Err(ValidationFailure::UnknownCitation { id: id.to_string() }),
        None => Ok(()),
    }
}

fn check_reference(
    role: RoleId,
    allowed: &[RoleId],
    round: u32,
    response: &ExamResponse,
    transcript: &Transcript,
) -> Result<(), ValidationFailure> {
    if response.target_role == role {
        return Err(ValidationFailure::SelfReference {
            argument_id: response.target_argument_id.to_string(),
        });
    }
    if !allowed.contains(&response.target_role) {
        return Err(ValidationFailure::NotAnOpponent {
            target_role: response.target_role,
        });
    }
    if transcript
        .find_argument(response.target_role, &response.target_argument_id, round)
        .is_none()
    {
        return Err(ValidationFailure::DanglingReference {
            target_role: response.target_role,
            argument_id: response.target_argument_id.to_string(),
        });
    }
    Ok(())
}

/// At most one response per (target role, argument id)
fn require_unique(responses: &[ExamResponse]) -> Result<(), ValidationFailure> {
    let mut seen = HashSet::new();
    for response in responses {
        if !seen.insert((response.target_role, &response.target_argument_id)) {
            return Err(ValidationFailure::DuplicateResponse {
                target_role: response.target_role,
                argument_id: response.target_argument_id.to_string(),
            });
        }
    }
    Ok(())
}

fn require_coverage<'a>(
    target: RoleId,
    required: impl Iterator<Item = &'a ArgumentId>,
    responses: &[ExamResponse],
) -> Result<(), ValidationFailure> {
    for id in required {
        let addressed = responses
            .iter()
            .any(|r| r.target_role == target && &r.target_argument_id == id);
        if !addressed {
            return Err(ValidationFailure::MissingResponse {
                target_role: target,
                argument_id: id.to_string(),
            });
        }
    }
    Ok(())
}
