//! Progress notification port
//!
//! Defines the interface for reporting progress during a debate.

use tribunal_domain::{DebatePhase, Model, RoleId};

/// Callback for progress updates during a debate
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (progress bars, plain logs, ...).
pub trait DebateProgressNotifier: Send + Sync {
    /// Called once the round count has been drawn
    fn on_debate_start(&self, _total_rounds: u32, _model: &Model) {}

    /// Called when a round starts
    fn on_round_start(&self, round: u32, phase: DebatePhase, total_roles: usize);

    /// Called when a role's invocation settles within a round
    fn on_role_complete(&self, round: u32, role: RoleId, success: bool);

    /// Called when a round completes
    fn on_round_complete(&self, round: u32, phase: DebatePhase);
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl DebateProgressNotifier for NoProgress {
    fn on_round_start(&self, _round: u32, _phase: DebatePhase, _total_roles: usize) {}
    fn on_role_complete(&self, _round: u32, _role: RoleId, _success: bool) {}
    fn on_round_complete(&self, _round: u32, _phase: DebatePhase) {}
}
