//! Round policy and the debate state machine.
//!
//! ```text
//! INIT → STANCE → CROSS_EXAM → (COUNTER)* → SYNTHESIS → DONE
//! ```
//!
//! Round 1 is always STANCE and round 2 always CROSS_EXAM; rounds 3..=N are
//! COUNTER rounds. Synthesis runs once after the last round.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Smallest debate: STANCE + CROSS_EXAM
pub const MIN_ROUNDS: u32 = 2;

/// Phase of a debate round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebatePhase {
    /// Independent opening positions (claim + source only)
    Stance,
    /// Every analyst answers every other analyst's STANCE arguments
    CrossExamination,
    /// Adversarial exchange against the opponent's latest output
    Counter,
    /// Terminal verdict over the full transcript
    Synthesis,
}

impl DebatePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            DebatePhase::Stance => "stance",
            DebatePhase::CrossExamination => "cross_examination",
            DebatePhase::Counter => "counter",
            DebatePhase::Synthesis => "synthesis",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            DebatePhase::Stance => "STANCE",
            DebatePhase::CrossExamination => "CROSS_EXAM",
            DebatePhase::Counter => "COUNTER",
            DebatePhase::Synthesis => "SYNTHESIS",
        }
    }
}

impl std::fmt::Display for DebatePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// How many rounds a debate runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundPolicy {
    FixedRounds(u32),
    /// Drawn uniformly from `min..=max`, once per run
    RandomRounds { min: u32, max: u32 },
}

impl Default for RoundPolicy {
    fn default() -> Self {
        RoundPolicy::RandomRounds { min: 2, max: 4 }
    }
}

impl RoundPolicy {
    pub fn fixed(rounds: u32) -> Result<Self, DomainError> {
        let policy = RoundPolicy::FixedRounds(rounds);
        policy.validate()?;
        Ok(policy)
    }

    pub fn random(min: u32, max: u32) -> Result<Self, DomainError> {
        let policy = RoundPolicy::RandomRounds { min, max };
        policy.validate()?;
        Ok(policy)
    }

    /// Parse a `MIN-MAX` range such as `2-4`
    pub fn parse_range(range: &str) -> Result<Self, DomainError> {
        let invalid = || {
            DomainError::InvalidRoundPolicy(format!(
                "expected MIN-MAX (e.g. 2-4), got '{}'",
                range
            ))
        };
        let (min, max) = range.split_once('-').ok_or_else(invalid)?;
        let min = min.trim().parse::<u32>().map_err(|_| invalid())?;
        let max = max.trim().parse::<u32>().map_err(|_| invalid())?;
        Self::random(min, max)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        match *self {
            RoundPolicy::FixedRounds(n) if n < MIN_ROUNDS => Err(DomainError::InvalidRoundPolicy(
                format!("at least {} rounds are required, got {}", MIN_ROUNDS, n),
            )),
            RoundPolicy::RandomRounds { min, .. } if min < MIN_ROUNDS => {
                Err(DomainError::InvalidRoundPolicy(format!(
                    "minimum must be at least {}, got {}",
                    MIN_ROUNDS, min
                )))
            }
            RoundPolicy::RandomRounds { min, max } if min > max => Err(
                DomainError::InvalidRoundPolicy(format!("minimum {} exceeds maximum {}", min, max)),
            ),
            _ => Ok(()),
        }
    }

    /// Resolve the policy into a concrete plan.
    ///
    /// `draw` is only called for random policies, exactly once, with the
    /// inclusive bounds. A draw outside the bounds is rejected.
    pub fn resolve(&self, draw: impl FnOnce(u32, u32) -> u32) -> Result<RoundPlan, DomainError> {
        self.validate()?;
        let total_rounds = match *self {
            RoundPolicy::FixedRounds(n) => n,
            RoundPolicy::RandomRounds { min, max } => {
                let drawn = draw(min, max);
                if !(min..=max).contains(&drawn) {
                    return Err(DomainError::InvalidRoundPolicy(format!(
                        "drawn round count {} is outside {}..={}",
                        drawn, min, max
                    )));
                }
                drawn
            }
        };
        Ok(RoundPlan { total_rounds })
    }
}

impl std::fmt::Display for RoundPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoundPolicy::FixedRounds(n) => write!(f, "{} rounds", n),
            RoundPolicy::RandomRounds { min, max } => write!(f, "{}-{} rounds (random)", min, max),
        }
    }
}

/// Resolved number of rounds for one run. Never re-drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundPlan {
    total_rounds: u32,
}

impl RoundPlan {
    pub fn total_rounds(&self) -> u32 {
        self.total_rounds
    }

    pub fn counter_rounds(&self) -> u32 {
        self.total_rounds.saturating_sub(MIN_ROUNDS)
    }

    /// Round number the synthesizer's invocation is tagged with
    pub fn synthesis_round(&self) -> u32 {
        self.total_rounds + 1
    }

    /// Phase of a given round, `None` when the round is outside the plan
    pub fn phase_of(&self, round: u32) -> Option<DebatePhase> {
        match round {
            1 => Some(DebatePhase::Stance),
            2 => Some(DebatePhase::CrossExamination),
            r if r > 2 && r <= self.total_rounds => Some(DebatePhase::Counter),
            r if r == self.synthesis_round() => Some(DebatePhase::Synthesis),
            _ => None,
        }
    }
}

/// Position of a run in the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebateState {
    Init,
    Stance,
    CrossExamination,
    Counter { round: u32 },
    Synthesis,
    Done,
}

impl DebateState {
    /// Next state under the given plan
    pub fn advance(self, plan: &RoundPlan) -> DebateState {
        match self {
            DebateState::Init => DebateState::Stance,
            DebateState::Stance => DebateState::CrossExamination,
            DebateState::CrossExamination if plan.total_rounds() > MIN_ROUNDS => {
                DebateState::Counter { round: 3 }
            }
            DebateState::CrossExamination => DebateState::Synthesis,
            DebateState::Counter { round } if round < plan.total_rounds() => {
                DebateState::Counter { round: round + 1 }
            }
            DebateState::Counter { .. } => DebateState::Synthesis,
            DebateState::Synthesis | DebateState::Done => DebateState::Done,
        }
    }

    /// Round number of this state, if it runs role invocations
    pub fn round(&self, plan: &RoundPlan) -> Option<u32> {
        match self {
            DebateState::Stance => Some(1),
            DebateState::CrossExamination => Some(2),
            DebateState::Counter { round } => Some(*round),
            DebateState::Synthesis => Some(plan.synthesis_round()),
            DebateState::Init | DebateState::Done => None,
        }
    }

    pub fn phase(&self) -> Option<DebatePhase> {
        match self {
            DebateState::Stance => Some(DebatePhase::Stance),
            DebateState::CrossExamination => Some(DebatePhase::CrossExamination),
            DebateState::Counter { .. } => Some(DebatePhase::Counter),
            DebateState::Synthesis => Some(DebatePhase::Synthesis),
            DebateState::Init | DebateState::Done => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walk(plan: RoundPlan) -> Vec<DebateState> {
        let mut states = vec![];
        let mut state = DebateState::Init;
        while state != DebateState::Done {
            state = state.advance(&plan);
            states.push(state);
        }
        states
    }

    #[test]
    fn test_policy_validation() {
        assert!(RoundPolicy::fixed(2).is_ok());
        assert!(RoundPolicy::fixed(1).is_err());
        assert!(RoundPolicy::random(2, 4).is_ok());
        assert!(RoundPolicy::random(1, 4).is_err());
        assert!(RoundPolicy::random(4, 2).is_err());
    }

    #[test]
    fn test_parse_range() {
        assert_eq!(
            RoundPolicy::parse_range("2-4").unwrap(),
            RoundPolicy::RandomRounds { min: 2, max: 4 }
        );
        assert_eq!(
            RoundPolicy::parse_range(" 3 - 3 ").unwrap(),
            RoundPolicy::RandomRounds { min: 3, max: 3 }
        );
        assert!(RoundPolicy::parse_range("4").is_err());
        assert!(RoundPolicy::parse_range("a-b").is_err());
        assert!(RoundPolicy::parse_range("5-2").is_err());
    }

    #[test]
    fn test_fixed_policy_never_draws() {
        let plan = RoundPolicy::FixedRounds(3)
            .resolve(|_, _| panic!("fixed policy must not draw"))
            .unwrap();
        assert_eq!(plan.total_rounds(), 3);
        assert_eq!(plan.counter_rounds(), 1);
    }

    #[test]
    fn test_random_policy_draws_once_with_bounds() {
        let mut calls = 0;
        let plan = RoundPolicy::RandomRounds { min: 2, max: 4 }
            .resolve(|min, max| {
                calls += 1;
                assert_eq!((min, max), (2, 4));
                4
            })
            .unwrap();
        assert_eq!(calls, 1);
        assert_eq!(plan.total_rounds(), 4);
    }

    #[test]
    fn test_out_of_range_draw_rejected() {
        let result = RoundPolicy::RandomRounds { min: 2, max: 4 }.resolve(|_, _| 5);
        assert!(matches!(result, Err(DomainError::InvalidRoundPolicy(_))));
    }

    #[test]
    fn test_minimum_debate_skips_counter() {
        let plan = RoundPolicy::FixedRounds(2).resolve(|_, _| 0).unwrap();
        assert_eq!(
            walk(plan),
            vec![
                DebateState::Stance,
                DebateState::CrossExamination,
                DebateState::Synthesis,
                DebateState::Done,
            ]
        );
    }

    #[test]
    fn test_counter_rounds_are_numbered() {
        let plan = RoundPolicy::FixedRounds(4).resolve(|_, _| 0).unwrap();
        let states = walk(plan);
        assert_eq!(states[2], DebateState::Counter { round: 3 });
        assert_eq!(states[3], DebateState::Counter { round: 4 });
        assert_eq!(states[4], DebateState::Synthesis);
        assert_eq!(DebateState::Synthesis.round(&plan), Some(5));
    }

    #[test]
    fn test_phase_of_round() {
        let plan = RoundPolicy::FixedRounds(3).resolve(|_, _| 0).unwrap();
        assert_eq!(plan.phase_of(1), Some(DebatePhase::Stance));
        assert_eq!(plan.phase_of(2), Some(DebatePhase::CrossExamination));
        assert_eq!(plan.phase_of(3), Some(DebatePhase::Counter));
        assert_eq!(plan.phase_of(4), Some(DebatePhase::Synthesis));
        assert_eq!(plan.phase_of(5), None);
        assert_eq!(plan.phase_of(0), None);
    }
}
