//! Context builders for each debate phase.
//!
//! Each builder decides what a role is allowed to see in a round. Visibility
//! is strict: CROSS_EXAM roles see only STANCE turns, COUNTER roles see their
//! opponents' latest outputs plus older rounds as droppable history.

use crate::context::ContextDocument;
use crate::core::statement::{Claim, SourceText};
use crate::debate::transcript::Transcript;
use crate::role::RoleId;

/// Templates for generating the context document at each stage
pub struct PromptTemplate;

impl PromptTemplate {
    /// STANCE: claim and source only
    pub fn stance(claim: &Claim, source: &SourceText, role: RoleId) -> ContextDocument {
        let prefix = role.argument_prefix().unwrap_or_default();
        ContextDocument::new(claim, source).with_task(format!(
            r#"Give your independent assessment of whether the CLAIM faithfully represents the SOURCE.
Number your arguments {prefix}1, {prefix}2, ... Each argument needs a severity (high, medium, low)
and, where possible, an exact evidence quote. Finish with a one-paragraph summary."#
        ))
    }

    /// CROSS_EXAM: the role's own STANCE turn and every other analyst's
    /// STANCE arguments.
    pub fn cross_examination(
        claim: &Claim,
        source: &SourceText,
        role: RoleId,
        transcript: &Transcript,
    ) -> ContextDocument {
        let mut focus = String::from("YOUR STANCE:\n");
        match transcript.turn(role, 1) {
            Some(own) => focus.push_str(&own.render()),
            None => focus.push_str("(none)\n"),
        }
        focus.push_str("\nOPPOSING STANCES:\n");
        for target in role.cross_exam_targets() {
            if let Some(turn) = transcript.turn(target, 1) {
                focus.push_str(&turn.render());
            }
        }

        ContextDocument::new(claim, source)
            .with_focus(focus)
            .with_task(
                r#"Respond to EVERY opposing argument above, one response per argument id, with
action "attack" (the argument is flawed, weak or irrelevant) or "concede" (it is valid).
Give your updated confidence. Set new_verdict only if your stance changed.
You may revise your own arguments in revised_arguments, but only under their existing ids."#,
            )
    }

    /// COUNTER: the opponents' latest outputs as focus, earlier rounds as
    /// droppable history.
    pub fn counter(
        claim: &Claim,
        source: &SourceText,
        role: RoleId,
        round: u32,
        transcript: &Transcript,
    ) -> ContextDocument {
        let latest_round = round.saturating_sub(1);
        let mut focus = String::from("YOUR LATEST OUTPUT:\n");
        match transcript.latest_turn(role, round) {
            Some(own) => focus.push_str(&own.render()),
            None => focus.push_str("(none)\n"),
        }

        for opponent in role.counter_opponents() {
            focus.push_str(&format!(
                "\nLATEST OUTPUT OF {}:\n",
                opponent.display_name().to_uppercase()
            ));
            if let Some(turn) = transcript.latest_turn(*opponent, round) {
                focus.push_str(&turn.render());
            }
            for action in transcript.actions_against(*opponent, role, latest_round) {
                focus.push_str(&format!("  {}\n", action.render()));
            }
        }

        let prefix = role.argument_prefix().unwrap_or_default();
        ContextDocument::new(claim, source)
            .with_excerpts(transcript.round_summaries(latest_round))
            .with_focus(focus)
            .with_task(format!(
                r#"Address EVERY argument in your opponents' latest output, one response per argument id,
with action "attack", "concede" or "refine" (partially accept and narrow it).
Then give your revised verdict, confidence and arguments (ids {prefix}1, {prefix}2, ...)."#
            ))
    }

    /// SYNTHESIS: the whole transcript in round order
    pub fn synthesis(claim: &Claim, source: &SourceText, transcript: &Transcript) -> ContextDocument {
        ContextDocument::new(claim, source)
            .with_excerpts(transcript.round_summaries(transcript.rounds_completed() + 1))
            .with_task(
                r#"Deliver the final verdict on the debate above. List key agreements and unresolved
disputes, each citing the argument ids that support it exactly as they appear in the transcript.
State the majority position and explain your reasoning."#,
            )
    }

    /// Single-call baseline verifier
    pub fn baseline(claim: &Claim, source: &SourceText) -> ContextDocument {
        ContextDocument::new(claim, source).with_task(
            "Decide whether the CLAIM faithfully represents the SOURCE. \
List the mutation types you found and the key evidence for your verdict.",
        )
    }
}
