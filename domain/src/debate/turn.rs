//! Transcript records: role turns and cross-examination actions

use super::argument::{Argument, ArgumentId};
use super::policy::DebatePhase;
use super::verdict::{Confidence, ExamAction, Verdict};
use crate::role::RoleId;
use serde::{Deserialize, Serialize};

/// One role's position in one round (immutable once created)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleTurn {
    pub role: RoleId,
    pub round: u32,
    pub phase: DebatePhase,
    pub verdict: Verdict,
    pub confidence: Confidence,
    pub arguments: Vec<Argument>,
    pub summary: String,
}

impl RoleTurn {
    pub fn argument(&self, id: &ArgumentId) -> Option<&Argument> {
        self.arguments.iter().find(|a| &a.id == id)
    }

    pub fn argument_ids(&self) -> impl Iterator<Item = &ArgumentId> {
        self.arguments.iter().map(|a| &a.id)
    }

    pub fn has_high_severity(&self) -> bool {
        self.arguments.iter().any(Argument::is_high_severity)
    }

    /// Multi-line rendering with every argument tagged by id
    pub fn render(&self) -> String {
        let mut out = format!(
            "{} (round {}, {}): verdict={} confidence={:.2}\n",
            self.role.display_name(),
            self.round,
            self.phase,
            self.verdict,
            self.confidence.value()
        );
        for argument in &self.arguments {
            out.push_str(&format!("  {}\n", argument.render_line()));
        }
        if !self.summary.trim().is_empty() {
            out.push_str(&format!("  summary: {}\n", self.summary.trim()));
        }
        out
    }
}

/// A response by one role to one opposing argument
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrossExamAction {
    pub acting_role: RoleId,
    pub target_role: RoleId,
    pub target_argument_id: ArgumentId,
    pub action: ExamAction,
    pub response_text: String,
    pub updated_confidence: Confidence,
    pub round: u32,
    pub phase: DebatePhase,
}

impl CrossExamAction {
    pub fn render(&self) -> String {
        format!(
            "{} {} {} [{}]: {}",
            self.acting_role.display_name(),
            self.action.as_str().to_uppercase(),
            self.target_role.display_name(),
            self.target_argument_id,
            self.response_text.trim()
        )
    }
}

/// One record in the transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TranscriptEntry {
    Turn(RoleTurn),
    CrossExam(CrossExamAction),
}

impl TranscriptEntry {
    pub fn round(&self) -> u32 {
        match self {
            TranscriptEntry::Turn(turn) => turn.round,
            TranscriptEntry::CrossExam(action) => action.round,
        }
    }

    pub fn role(&self) -> RoleId {
        match self {
            TranscriptEntry::Turn(turn) => turn.role,
            TranscriptEntry::CrossExam(action) => action.acting_role,
        }
    }

    pub fn phase(&self) -> DebatePhase {
        match self {
            TranscriptEntry::Turn(turn) => turn.phase,
            TranscriptEntry::CrossExam(action) => action.phase,
        }
    }

    pub fn render(&self) -> String {
        match self {
            TranscriptEntry::Turn(turn) => turn.render(),
            TranscriptEntry::CrossExam(action) => format!("  {}\n", action.render()),
        }
    }
}
