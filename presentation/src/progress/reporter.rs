//! Progress reporting for debate execution

use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::Mutex;
use tribunal_application::DebateProgressNotifier;
use tribunal_domain::{DebatePhase, Model, RoleId};

/// Reports progress during a debate with one bar per round
pub struct ProgressReporter {
    multi: MultiProgress,
    round_bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            round_bar: Mutex::new(None),
        }
    }

    fn round_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn round_label(round: u32, phase: DebatePhase) -> String {
        format!("Round {}: {:<10}", round, phase.display_name())
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl DebateProgressNotifier for ProgressReporter {
    fn on_debate_start(&self, total_rounds: u32, model: &Model) {
        let _ = self.multi.println(format!(
            "{} {} rounds + synthesis on {}",
            "->".cyan(),
            total_rounds,
            model
        ));
    }

    fn on_round_start(&self, round: u32, phase: DebatePhase, total_roles: usize) {
        let pb = self.multi.add(ProgressBar::new(total_roles as u64));
        pb.set_style(Self::round_style());
        pb.set_prefix(Self::round_label(round, phase));
        pb.set_message("Starting...");

        if let Ok(mut slot) = self.round_bar.lock() {
            *slot = Some(pb);
        }
    }

    fn on_role_complete(&self, _round: u32, role: RoleId, success: bool) {
        if let Ok(slot) = self.round_bar.lock()
            && let Some(pb) = slot.as_ref()
        {
            let status = if success {
                format!("{} {}", "v".green(), role.display_name())
            } else {
                format!("{} {}", "x".red(), role.display_name())
            };
            pb.set_message(status);
            pb.inc(1);
        }
    }

    fn on_round_complete(&self, _round: u32, phase: DebatePhase) {
        if let Ok(mut slot) = self.round_bar.lock()
            && let Some(pb) = slot.take()
        {
            pb.finish_with_message(format!("{} complete", phase.display_name().green()));
        }
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl DebateProgressNotifier for SimpleProgress {
    fn on_round_start(&self, round: u32, phase: DebatePhase, total_roles: usize) {
        eprintln!(
            "{} {} ({} roles)",
            "->".cyan(),
            ProgressReporter::round_label(round, phase).trim_end().bold(),
            total_roles
        );
    }

    fn on_role_complete(&self, _round: u32, role: RoleId, success: bool) {
        if success {
            eprintln!("  {} {}", "v".green(), role.display_name());
        } else {
            eprintln!("  {} {} (failed)", "x".red(), role.display_name());
        }
    }

    fn on_round_complete(&self, _round: u32, _phase: DebatePhase) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_label() {
        assert_eq!(
            ProgressReporter::round_label(2, DebatePhase::CrossExamination).trim_end(),
            "Round 2: CROSS_EXAM"
        );
    }

    #[test]
    fn test_reporter_lifecycle_without_terminal() {
        let reporter = ProgressReporter::new();
        reporter.on_round_start(1, DebatePhase::Stance, 3);
        for role in RoleId::ANALYSTS {
            reporter.on_role_complete(1, role, true);
        }
        reporter.on_round_complete(1, DebatePhase::Stance);
        assert!(reporter.round_bar.lock().unwrap().is_none());
    }
}
