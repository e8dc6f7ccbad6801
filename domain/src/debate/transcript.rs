//! Append-only transcript of one debate run

use super::argument::{Argument, ArgumentId};
use super::turn::{CrossExamAction, RoleTurn, TranscriptEntry};
use crate::core::error::DomainError;
use crate::role::RoleId;
use serde::{Deserialize, Serialize};

/// Ordered log of every role turn and cross-examination action in a run.
///
/// Owned exclusively by its run. Records can only be appended, and never
/// with a round lower than the last appended one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, entry: TranscriptEntry) -> Result<(), DomainError> {
        if let Some(last) = self.last_round()
            && entry.round() < last
        {
            return Err(DomainError::RoundRegression {
                last,
                attempted: entry.round(),
            });
        }
        self.entries.push(entry);
        Ok(())
    }

    pub fn append_turn(&mut self, turn: RoleTurn) -> Result<(), DomainError> {
        self.append(TranscriptEntry::Turn(turn))
    }

    pub fn append_action(&mut self, action: CrossExamAction) -> Result<(), DomainError> {
        self.append(TranscriptEntry::CrossExam(action))
    }

    pub fn read_all(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<TranscriptEntry> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last_round(&self) -> Option<u32> {
        self.entries.last().map(TranscriptEntry::round)
    }

    /// Highest round with at least one record
    pub fn rounds_completed(&self) -> u32 {
        self.last_round().unwrap_or(0)
    }

    pub fn turns(&self) -> impl Iterator<Item = &RoleTurn> {
        self.entries.iter().filter_map(|entry| match entry {
            TranscriptEntry::Turn(turn) => Some(turn),
            TranscriptEntry::CrossExam(_) => None,
        })
    }

    pub fn actions(&self) -> impl Iterator<Item = &CrossExamAction> {
        self.entries.iter().filter_map(|entry| match entry {
            TranscriptEntry::CrossExam(action) => Some(action),
            TranscriptEntry::Turn(_) => None,
        })
    }

    pub fn entries_in_round(&self, round: u32) -> impl Iterator<Item = &TranscriptEntry> {
        self.entries.iter().filter(move |e| e.round() == round)
    }

    /// The turn `role` produced in exactly `round`
    pub fn turn(&self, role: RoleId, round: u32) -> Option<&RoleTurn> {
        self.turns().find(|t| t.role == role && t.round == round)
    }

    /// The most recent turn `role` produced before `before_round`
    pub fn latest_turn(&self, role: RoleId, before_round: u32) -> Option<&RoleTurn> {
        self.turns()
            .filter(|t| t.role == role && t.round < before_round)
            .last()
    }

    /// Actions taken by `acting` against `target` in `round`
    pub fn actions_against(
        &self,
        acting: RoleId,
        target: RoleId,
        round: u32,
    ) -> impl Iterator<Item = &CrossExamAction> {
        self.actions()
            .filter(move |a| a.acting_role == acting && a.target_role == target && a.round == round)
    }

    /// Resolve an argument `role` produced in a round before `before_round`,
    /// preferring the most recent revision.
    pub fn find_argument(
        &self,
        role: RoleId,
        id: &ArgumentId,
        before_round: u32,
    ) -> Option<&Argument> {
        self.turns()
            .filter(|t| t.role == role && t.round < before_round)
            .filter_map(|t| t.argument(id))
            .last()
    }

    /// Whether any turn in the transcript carries an argument with this id
    pub fn contains_argument_id(&self, id: &ArgumentId) -> bool {
        self.turns().any(|t| t.argument(id).is_some())
    }

    /// Render one round's records under a round header
    pub fn render_summary(&self, round: u32) -> String {
        let mut entries = self.entries_in_round(round).peekable();
        let Some(first) = entries.peek() else {
            return String::new();
        };
        let mut out = format!("=== Round {} ({}) ===\n", round, first.phase());
        for entry in entries {
            out.push_str(&entry.render());
        }
        out
    }

    /// Per-round summaries for every round before `before_round`, oldest first
    pub fn round_summaries(&self, before_round: u32) -> Vec<String> {
        (1..before_round)
            .map(|round| self.render_summary(round))
            .filter(|summary| !summary.is_empty())
            .collect()
    }

    /// Full transcript in round order
    pub fn render_full(&self) -> String {
        self.round_summaries(self.rounds_completed() + 1).join("\n")
    }
}
