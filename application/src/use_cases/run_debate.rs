//! Run Debate use case
//!
//! Drives one claim through the round state machine:
//! STANCE, CROSS_EXAM, zero or more COUNTER rounds, then SYNTHESIS.
//!
//! Rounds run strictly in sequence. Within a round every analyst is invoked
//! concurrently against a snapshot of the transcript as it stood when the
//! round began, and results are appended in registry order once the whole
//! round has settled.

use crate::config::DebateParams;
use crate::ports::audit_log::{AuditLog, NoAuditLog};
use crate::ports::llm_gateway::LlmGateway;
use crate::ports::progress::{DebateProgressNotifier, NoProgress};
use crate::ports::round_counter::RoundCounter;
use crate::use_cases::invoker::{InvokeError, RoleCall, RoleInvoker};
use crate::use_cases::shared::is_cancelled;
use chrono::Utc;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use tribunal_domain::{
    Claim, CounterOutput, CrossExamOutput, DebatePhase, DebateResult, DebateState, DomainError,
    PromptTemplate, ResponseSchema, RoleId, RoundPlan, RoundPolicy, SourceText, StanceOutput,
    SynthesisOutput, Transcript, TranscriptEntry, validate_counter, validate_cross_exam,
    validate_synthesis,
};

/// Errors that can occur during a debate run
#[derive(Error, Debug)]
pub enum DebateError {
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] DomainError),

    #[error(transparent)]
    RunFailed(Box<DebateRunFailed>),

    #[error("Operation cancelled")]
    Cancelled,
}

impl DebateError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, DebateError::Cancelled)
    }

    /// Failure details, when the run was aborted by a role
    pub fn run_failure(&self) -> Option<&DebateRunFailed> {
        match self {
            DebateError::RunFailed(failure) => Some(failure),
            _ => None,
        }
    }
}

/// A run aborted because a required invocation could not be completed.
///
/// The partial transcript is diagnostic only; no verdict is derived from it.
#[derive(Debug)]
pub struct DebateRunFailed {
    pub reason: InvokeError,
    pub phase: DebatePhase,
    pub round: u32,
    pub role: Option<RoleId>,
    pub partial_transcript: Transcript,
}

impl fmt::Display for DebateRunFailed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Debate failed in round {} ({})", self.round, self.phase)?;
        if let Some(role) = self.role {
            write!(f, " at {}", role.display_name())?;
        }
        write!(f, ": {}", self.reason)
    }
}

impl std::error::Error for DebateRunFailed {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.reason)
    }
}

/// A role that failed inside a round, or `None` when the round itself broke
type RoundFailure = (Option<RoleId>, InvokeError);

/// Use case for running an adversarial debate over one claim
pub struct RunDebateUseCase<G: LlmGateway + 'static> {
    gateway: Arc<G>,
    round_counter: Arc<dyn RoundCounter>,
    params: DebateParams,
    audit_log: Arc<dyn AuditLog>,
    cancellation_token: Option<CancellationToken>,
}

impl<G: LlmGateway + 'static> RunDebateUseCase<G> {
    pub fn new(gateway: Arc<G>, round_counter: Arc<dyn RoundCounter>, params: DebateParams) -> Self {
        Self {
            gateway,
            round_counter,
            params,
            audit_log: Arc::new(NoAuditLog),
            cancellation_token: None,
        }
    }

    pub fn with_audit_log(mut self, audit_log: Arc<dyn AuditLog>) -> Self {
        self.audit_log = audit_log;
        self
    }

    /// Set a cancellation token for graceful shutdown
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    /// Run a debate with default (no-op) progress
    pub async fn run_debate(
        &self,
        claim: Claim,
        source: SourceText,
        policy: RoundPolicy,
    ) -> Result<DebateResult, DebateError> {
        self.run_debate_with_progress(claim, source, policy, &NoProgress)
            .await
    }

    /// Run a debate with progress callbacks
    pub async fn run_debate_with_progress(
        &self,
        claim: Claim,
        source: SourceText,
        policy: RoundPolicy,
        progress: &dyn DebateProgressNotifier,
    ) -> Result<DebateResult, DebateError> {
        // Drawn once; never re-drawn for this run
        let plan = policy.resolve(|min, max| self.round_counter.draw(min, max))?;
        info!(
            "Starting debate: {} rounds ({}) on {}",
            plan.total_rounds(),
            policy,
            self.params.model
        );
        progress.on_debate_start(plan.total_rounds(), &self.params.model);

        let started_at = Utc::now();
        let invoker = RoleInvoker::new(
            Arc::clone(&self.gateway),
            self.params.clone(),
            Arc::clone(&self.audit_log),
            self.cancellation_token.clone(),
        );
        let claim = Arc::new(claim);
        let source = Arc::new(source);
        let mut transcript = Transcript::new();
        let mut state = DebateState::Init;

        loop {
            state = state.advance(&plan);
            let (Some(round), Some(phase)) = (state.round(&plan), state.phase()) else {
                break;
            };
            if is_cancelled(&self.cancellation_token) {
                info!("Debate cancelled before round {}", round);
                return Err(DebateError::Cancelled);
            }

            if phase == DebatePhase::Synthesis {
                progress.on_round_start(round, phase, 1);
                let output = self
                    .run_synthesis(&invoker, round, &claim, &source, &transcript)
                    .await;
                progress.on_role_complete(round, RoleId::SYNTHESIZER, output.is_ok());
                let output = output.map_err(|reason| {
                    Self::run_failed(reason, phase, round, Some(RoleId::SYNTHESIZER), &transcript)
                })?;
                progress.on_round_complete(round, phase);

                info!(
                    "Debate finished: {} ({})",
                    output.verdict, output.confidence
                );
                return Ok(DebateResult {
                    claim: Arc::unwrap_or_clone(claim),
                    source_text: Arc::unwrap_or_clone(source),
                    verdict: output.verdict,
                    confidence: output.confidence,
                    reasoning: output.reasoning,
                    majority_position: output.majority_position,
                    key_agreements: output.key_agreements,
                    unresolved_disputes: output.unresolved_disputes,
                    mutation_types: output.mutation_types,
                    rounds_completed: plan.total_rounds(),
                    full_transcript: transcript,
                    model: self.params.model.clone(),
                    started_at,
                    finished_at: Utc::now(),
                });
            }

            info!("Round {}: {}", round, phase);
            progress.on_round_start(round, phase, RoleId::ANALYSTS.len());
            let entries = self
                .run_round(&invoker, &plan, round, phase, &claim, &source, &transcript, progress)
                .await
                .map_err(|(role, reason)| Self::run_failed(reason, phase, round, role, &transcript))?;

            for entry in entries {
                transcript.append(entry).map_err(|e| {
                    Self::run_failed(InvokeError::Internal(e.to_string()), phase, round, None, &transcript)
                })?;
            }
            progress.on_round_complete(round, phase);
        }

        Err(Self::run_failed(
            InvokeError::Internal("debate ended without a synthesis round".to_string()),
            DebatePhase::Synthesis,
            plan.synthesis_round(),
            None,
            &transcript,
        ))
    }

    /// Invoke every analyst for one round and return their records in
    /// registry order.
    #[allow(clippy::too_many_arguments)]
    async fn run_round(
        &self,
        invoker: &RoleInvoker<G>,
        plan: &RoundPlan,
        round: u32,
        phase: DebatePhase,
        claim: &Arc<Claim>,
        source: &Arc<SourceText>,
        transcript: &Transcript,
        progress: &dyn DebateProgressNotifier,
    ) -> Result<Vec<TranscriptEntry>, RoundFailure> {
        debug!(
            "Round {}/{} snapshot has {} records",
            round,
            plan.total_rounds(),
            transcript.len()
        );
        let snapshot = Arc::new(transcript.clone());
        let mut join_set = JoinSet::new();

        for (index, role) in RoleId::ANALYSTS.into_iter().enumerate() {
            let invoker = invoker.clone();
            let claim = Arc::clone(claim);
            let source = Arc::clone(source);
            let snapshot = Arc::clone(&snapshot);

            join_set.spawn(async move {
                let result =
                    Self::invoke_role(invoker, phase, role, round, claim, source, snapshot).await;
                (index, role, result)
            });
        }

        let mut slots: Vec<Option<Vec<TranscriptEntry>>> =
            RoleId::ANALYSTS.iter().map(|_| None).collect();

        loop {
            let joined = match &self.cancellation_token {
                Some(token) => tokio::select! {
                    biased;
                    _ = token.cancelled() => {
                        join_set.abort_all();
                        return Err((None, InvokeError::Cancelled));
                    }
                    result = join_set.join_next() => result,
                },
                None => join_set.join_next().await,
            };
            let Some(joined) = joined else {
                break;
            };

            match joined {
                Ok((index, role, Ok(entries))) => {
                    debug!(role = %role, round, "Role settled with {} records", entries.len());
                    progress.on_role_complete(round, role, true);
                    slots[index] = Some(entries);
                }
                Ok((_, role, Err(e))) => {
                    warn!(role = %role, round, "Role failed: {}", e);
                    progress.on_role_complete(round, role, false);
                    join_set.abort_all();
                    return Err((Some(role), e));
                }
                Err(e) => {
                    join_set.abort_all();
                    return Err((None, InvokeError::Internal(format!("Task join error: {}", e))));
                }
            }
        }

        let mut entries = Vec::new();
        for (slot, role) in slots.into_iter().zip(RoleId::ANALYSTS) {
            match slot {
                Some(records) => entries.extend(records),
                None => {
                    return Err((
                        Some(role),
                        InvokeError::Internal("role produced no records".to_string()),
                    ));
                }
            }
        }
        Ok(entries)
    }

    /// One analyst's invocation for the given phase
    async fn invoke_role(
        invoker: RoleInvoker<G>,
        phase: DebatePhase,
        role: RoleId,
        round: u32,
        claim: Arc<Claim>,
        source: Arc<SourceText>,
        transcript: Arc<Transcript>,
    ) -> Result<Vec<TranscriptEntry>, InvokeError> {
        let schema = ResponseSchema::for_phase(phase, role);

        match phase {
            DebatePhase::Stance => {
                let context = PromptTemplate::stance(&claim, &source, role);
                let call = RoleCall::new(role, round, phase, schema, context);
                let output: StanceOutput = invoker.invoke(&call, |_| Ok(())).await?;
                Ok(vec![TranscriptEntry::Turn(output.into_turn(role, round))])
            }
            DebatePhase::CrossExamination => {
                let stance = transcript.turn(role, 1).ok_or_else(|| {
                    InvokeError::Internal(format!("{} has no stance to defend", role))
                })?;
                let context = PromptTemplate::cross_examination(&claim, &source, role, &transcript);
                let call = RoleCall::new(role, round, phase, schema, context);
                let output: CrossExamOutput = invoker
                    .invoke(&call, |out| validate_cross_exam(role, round, out, &transcript))
                    .await?;
                let (actions, turn) = output.into_records(stance, round);
                Ok(into_entries(actions, turn))
            }
            DebatePhase::Counter => {
                let context = PromptTemplate::counter(&claim, &source, role, round, &transcript);
                let call = RoleCall::new(role, round, phase, schema, context);
                let output: CounterOutput = invoker
                    .invoke(&call, |out| validate_counter(role, round, out, &transcript))
                    .await?;
                let (actions, turn) = output.into_records(role, round);
                Ok(into_entries(actions, turn))
            }
            DebatePhase::Synthesis => Err(InvokeError::Internal(
                "synthesis is not an analyst phase".to_string(),
            )),
        }
    }

    /// Single synthesizer call over the complete transcript
    async fn run_synthesis(
        &self,
        invoker: &RoleInvoker<G>,
        round: u32,
        claim: &Claim,
        source: &SourceText,
        transcript: &Transcript,
    ) -> Result<SynthesisOutput, InvokeError> {
        info!("Synthesis over {} rounds", transcript.rounds_completed());
        let context = PromptTemplate::synthesis(claim, source, transcript);
        let call = RoleCall::new(
            RoleId::SYNTHESIZER,
            round,
            DebatePhase::Synthesis,
            ResponseSchema::Synthesis,
            context,
        );
        invoker
            .invoke(&call, |out| validate_synthesis(out, transcript))
            .await
    }

    fn run_failed(
        reason: InvokeError,
        phase: DebatePhase,
        round: u32,
        role: Option<RoleId>,
        transcript: &Transcript,
    ) -> DebateError {
        if reason.is_cancelled() {
            return DebateError::Cancelled;
        }
        DebateError::RunFailed(Box::new(DebateRunFailed {
            reason,
            phase,
            round,
            role,
            partial_transcript: transcript.clone(),
        }))
    }
}

/// Actions first, then the revised turn
fn into_entries(
    actions: Vec<tribunal_domain::CrossExamAction>,
    turn: tribunal_domain::RoleTurn,
) -> Vec<TranscriptEntry> {
    actions
        .into_iter()
        .map(TranscriptEntry::CrossExam)
        .chain(std::iter::once(TranscriptEntry::Turn(turn)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::llm_gateway::{GatewayError, InferenceRequest};
    use crate::ports::round_counter::{FixedRoundCounter, RandomRoundCounter};
    use async_trait::async_trait;
    use serde_json::{Value, json};
    use std::collections::{BTreeSet, HashMap, VecDeque};
    use std::sync::Mutex;
    use std::time::Duration;
    use tribunal_domain::{ROLE_DEFINITIONS, ValidationFailure, Verdict};

    // ==================== Test Mocks ====================

    type Reply = Result<String, GatewayError>;

    /// Replies scripted per (schema, role), popped in order
    #[derive(Default)]
    struct MockGateway {
        scripts: Mutex<HashMap<(&'static str, RoleId), VecDeque<Reply>>>,
        requests: Mutex<Vec<(RoleId, InferenceRequest)>>,
    }

    impl MockGateway {
        fn script(self, schema: &'static str, role: RoleId, reply: impl Into<String>) -> Self {
            self.push(schema, role, Ok(reply.into()))
        }

        fn push(self, schema: &'static str, role: RoleId, reply: Reply) -> Self {
            self.scripts
                .lock()
                .unwrap()
                .entry((schema, role))
                .or_default()
                .push_back(reply);
            self
        }

        fn requests(&self) -> Vec<(RoleId, InferenceRequest)> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LlmGateway for MockGateway {
        async fn complete(&self, request: &InferenceRequest) -> Result<String, GatewayError> {
            let role = ROLE_DEFINITIONS
                .iter()
                .find(|d| d.directive == request.directive)
                .map(|d| d.id)
                .ok_or_else(|| GatewayError::Other("unknown directive".to_string()))?;
            self.requests.lock().unwrap().push((role, request.clone()));
            self.scripts
                .lock()
                .unwrap()
                .get_mut(&(request.schema_name, role))
                .and_then(VecDeque::pop_front)
                .unwrap_or_else(|| {
                    Err(GatewayError::Other(format!(
                        "no scripted {} reply for {}",
                        request.schema_name, role
                    )))
                })
        }
    }

    // ==================== Reply Builders ====================

    struct Position {
        verdict: &'static str,
        confidence: f64,
        severity: &'static str,
    }

    fn prefix(role: RoleId) -> &'static str {
        role.argument_prefix().unwrap()
    }

    fn argument(role: RoleId, position: &Position) -> Value {
        json!({
            "id": format!("{}1", prefix(role)),
            "text": format!("{} reading of the numbers", role.display_name()),
            "evidence_quote": "more than 14,500 deaths have been confirmed",
            "severity": position.severity,
        })
    }

    fn responses(role: RoleId, targets: &[RoleId], action: &str) -> Value {
        targets
            .iter()
            .map(|target| {
                json!({
                    "target_role": target.as_str(),
                    "target_argument_id": format!("{}1", prefix(*target)),
                    "action": action,
                    "response_text": format!("{} answers {}", role.as_str(), target.as_str()),
                })
            })
            .collect()
    }

    fn stance(role: RoleId, position: &Position) -> String {
        json!({
            "verdict": position.verdict,
            "confidence": position.confidence,
            "arguments": [argument(role, position)],
            "summary": format!("{} stance", role.display_name()),
        })
        .to_string()
    }

    fn cross_exam(role: RoleId, position: &Position) -> String {
        json!({
            "responses": responses(role, &role.cross_exam_targets(), "attack"),
            "updated_confidence": position.confidence,
            "summary": format!("CROSS-EXAM NOTES OF {}", role.as_str()),
        })
        .to_string()
    }

    fn counter(role: RoleId, position: &Position) -> String {
        json!({
            "responses": responses(role, role.counter_opponents(), "refine"),
            "verdict": position.verdict,
            "confidence": position.confidence,
            "arguments": [argument(role, position)],
            "summary": format!("{} counter", role.display_name()),
        })
        .to_string()
    }

    fn synthesis(verdict: &str, confidence: f64) -> String {
        json!({
            "verdict": verdict,
            "confidence": confidence,
            "majority_position": "majority view",
            "key_agreements": [{"text": "the source gives a lower bound", "argument_ids": ["PR1", "EP1"]}],
            "unresolved_disputes": [{"text": "whether the framing matters", "argument_ids": ["DF1"]}],
            "reasoning": "weighed the transcript",
            "mutation_types": [],
        })
        .to_string()
    }

    /// A well-formed debate with `counter_rounds` COUNTER rounds
    fn scripted_debate(
        positions: [Position; 3],
        counter_rounds: usize,
        final_verdict: &str,
        final_confidence: f64,
    ) -> MockGateway {
        let mut gateway = MockGateway::default();
        for (role, position) in RoleId::ANALYSTS.into_iter().zip(&positions) {
            gateway = gateway
                .script("stance", role, stance(role, position))
                .script("cross_examination", role, cross_exam(role, position));
            for _ in 0..counter_rounds {
                gateway = gateway.script("counter", role, counter(role, position));
            }
        }
        gateway.script("synthesis", RoleId::Foreman, synthesis(final_verdict, final_confidence))
    }

    fn agreeing(verdict: &'static str) -> [Position; 3] {
        [0.9, 0.85, 0.8].map(|confidence| Position {
            verdict,
            confidence,
            severity: "low",
        })
    }

    fn use_case(gateway: Arc<MockGateway>, rounds: u32) -> RunDebateUseCase<MockGateway> {
        RunDebateUseCase::new(
            gateway,
            Arc::new(FixedRoundCounter(rounds)),
            DebateParams::default().with_backoff_base(Duration::ZERO),
        )
    }

    fn claim(text: &str) -> Claim {
        Claim::try_new(text).unwrap()
    }

    fn source(text: &str) -> SourceText {
        SourceText::try_new(text).unwrap()
    }

    // ==================== Tests ====================

    fn boundary_reversal_positions() -> [Position; 3] {
        [
            Position { verdict: "mutated", confidence: 0.85, severity: "high" },
            Position { verdict: "faithful", confidence: 0.55, severity: "low" },
            Position { verdict: "ambiguous", confidence: 0.6, severity: "medium" },
        ]
    }

    async fn run_boundary_reversal(rounds: u32) -> DebateResult {
        let counter_rounds = rounds as usize - 2;
        let gateway = Arc::new(scripted_debate(
            boundary_reversal_positions(),
            counter_rounds,
            "mutated",
            0.8,
        ));
        use_case(gateway, rounds)
            .run_debate(
                claim("Less than 14,550 people have died"),
                source("More than 14,500 deaths have been confirmed"),
                RoundPolicy::fixed(rounds).unwrap(),
            )
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_boundary_reversal_minimum_debate_is_not_faithful() {
        let result = run_boundary_reversal(2).await;

        assert_ne!(result.verdict, Verdict::Faithful);
        assert!(result.confidence.value() <= 0.9);
        assert!(result.has_high_severity_argument());
        assert_eq!(result.rounds_completed, 2);
        assert_eq!(result.full_transcript.rounds_completed(), 2);
        assert!(
            result
                .full_transcript
                .turns()
                .all(|t| t.phase != DebatePhase::Counter)
        );
    }

    #[tokio::test]
    async fn test_boundary_reversal_with_counter_round_is_not_faithful() {
        let result = run_boundary_reversal(3).await;

        assert_ne!(result.verdict, Verdict::Faithful);
        assert!(result.confidence.value() <= 0.9);
        assert!(result.has_high_severity_argument());
        assert_eq!(result.rounds_completed, 3);
        assert_eq!(result.full_transcript.rounds_completed(), 3);
        assert_eq!(result.key_agreements[0].argument_ids.len(), 2);
    }

    #[tokio::test]
    async fn test_verbatim_claim_is_faithful() {
        let text = "More than 14,500 deaths have been confirmed";
        let gateway = Arc::new(scripted_debate(agreeing("faithful"), 0, "faithful", 0.95));
        let result = use_case(gateway, 2)
            .run_debate(claim(text), source(text), RoundPolicy::fixed(2).unwrap())
            .await
            .unwrap();

        assert_eq!(result.verdict, Verdict::Faithful);
        assert!(result.confidence.value() >= 0.8);
        assert!(!result.has_high_severity_argument());
    }

    #[tokio::test]
    async fn test_minimum_debate_skips_counter() {
        let gateway = Arc::new(scripted_debate(agreeing("faithful"), 0, "faithful", 0.9));
        let result = use_case(gateway.clone(), 2)
            .run_debate(claim("c"), source("s"), RoundPolicy::fixed(2).unwrap())
            .await
            .unwrap();

        let schemas: Vec<&str> = gateway.requests().iter().map(|(_, r)| r.schema_name).collect();
        assert!(!schemas.contains(&"counter"));
        assert_eq!(schemas.last(), Some(&"synthesis"));
        assert_eq!(schemas.iter().filter(|s| **s == "synthesis").count(), 1);
        assert_eq!(result.full_transcript.turns().count(), 6);
    }

    #[tokio::test]
    async fn test_transcript_follows_registry_order() {
        let gateway = Arc::new(scripted_debate(agreeing("mutated"), 1, "mutated", 0.7));
        let result = use_case(gateway, 3)
            .run_debate(claim("c"), source("s"), RoundPolicy::fixed(3).unwrap())
            .await
            .unwrap();

        let sequence: Vec<(u32, RoleId)> = result
            .full_transcript
            .turns()
            .map(|t| (t.round, t.role))
            .collect();
        let expected: Vec<(u32, RoleId)> = (1..=3)
            .flat_map(|round| RoleId::ANALYSTS.map(|role| (round, role)))
            .collect();
        assert_eq!(sequence, expected);

        // Each cross-exam turn is preceded by its own actions
        let round_two: Vec<_> = result.full_transcript.entries_in_round(2).collect();
        assert!(matches!(round_two[0], TranscriptEntry::CrossExam(a) if a.acting_role == RoleId::Prosecutor));
        assert!(matches!(round_two[2], TranscriptEntry::Turn(t) if t.role == RoleId::Prosecutor));
    }

    #[tokio::test]
    async fn test_replay_yields_identical_transcript() {
        let positions = || {
            [
                Position { verdict: "mutated", confidence: 0.8, severity: "high" },
                Position { verdict: "faithful", confidence: 0.6, severity: "low" },
                Position { verdict: "ambiguous", confidence: 0.5, severity: "medium" },
            ]
        };

        let mut transcripts = Vec::new();
        for _ in 0..2 {
            let gateway = Arc::new(scripted_debate(positions(), 2, "mutated", 0.75));
            let result = use_case(gateway, 4)
                .run_debate(claim("c"), source("s"), RoundPolicy::fixed(4).unwrap())
                .await
                .unwrap();
            transcripts.push(result.full_transcript);
        }
        assert_eq!(transcripts[0], transcripts[1]);
        assert_eq!(transcripts[0].rounds_completed(), 4);
    }

    #[tokio::test]
    async fn test_random_rounds_stay_in_range() {
        let mut seen = BTreeSet::new();
        for seed in 0..24 {
            let gateway = Arc::new(scripted_debate(agreeing("faithful"), 2, "faithful", 0.9));
            let use_case = RunDebateUseCase::new(
                gateway.clone(),
                Arc::new(RandomRoundCounter::seeded(seed)),
                DebateParams::default(),
            );
            let result = use_case
                .run_debate(claim("c"), source("s"), RoundPolicy::random(2, 4).unwrap())
                .await
                .unwrap();

            assert_eq!(result.rounds_completed, result.full_transcript.rounds_completed());
            let synthesis_calls = gateway
                .requests()
                .iter()
                .filter(|(_, r)| r.schema_name == "synthesis")
                .count();
            assert_eq!(synthesis_calls, 1);
            seen.insert(result.rounds_completed);
        }
        assert!(seen.iter().all(|r| (2..=4).contains(r)));
        assert!(seen.len() > 1);
    }

    #[tokio::test]
    async fn test_cross_exam_context_excludes_peer_cross_exam() {
        let gateway = Arc::new(scripted_debate(agreeing("faithful"), 0, "faithful", 0.9));
        use_case(gateway.clone(), 2)
            .run_debate(claim("c"), source("s"), RoundPolicy::fixed(2).unwrap())
            .await
            .unwrap();

        let requests = gateway.requests();
        let cross_exam: Vec<_> = requests
            .iter()
            .filter(|(_, r)| r.schema_name == "cross_examination")
            .collect();
        assert_eq!(cross_exam.len(), 3);
        for (role, request) in cross_exam {
            for other in RoleId::ANALYSTS.iter().filter(|r| *r != role) {
                let marker = format!("CROSS-EXAM NOTES OF {}", other.as_str());
                assert!(!request.context.contains(&marker));
                let action = format!("{} answers", other.as_str());
                assert!(!request.context.contains(&action));
            }
        }

        // The synthesizer sees everything
        let (_, synthesis) = requests.last().unwrap();
        assert!(synthesis.context.contains("CROSS-EXAM NOTES OF prosecutor"));
    }

    #[tokio::test]
    async fn test_dangling_reference_reprompts_then_fails() {
        let dangling = json!({
            "responses": [
                {"target_role": "defense", "target_argument_id": "DF9", "action": "attack", "response_text": "x"},
                {"target_role": "epistemologist", "target_argument_id": "EP1", "action": "attack", "response_text": "y"},
            ],
            "updated_confidence": 0.7,
        })
        .to_string();
        let gateway = scripted_debate(agreeing("mutated"), 0, "mutated", 0.8);
        // Queue the bad replies ahead of the valid one
        gateway.scripts.lock().unwrap().insert(
            ("cross_examination", RoleId::Prosecutor),
            VecDeque::from([Ok(dangling.clone()), Ok(dangling)]),
        );
        let gateway = Arc::new(gateway);

        let error = use_case(gateway.clone(), 2)
            .run_debate(claim("c"), source("s"), RoundPolicy::fixed(2).unwrap())
            .await
            .unwrap_err();

        let failure = error.run_failure().unwrap();
        assert_eq!(failure.phase, DebatePhase::CrossExamination);
        assert_eq!(failure.round, 2);
        assert_eq!(failure.role, Some(RoleId::Prosecutor));
        assert!(matches!(
            &failure.reason,
            InvokeError::Malformed { failure: ValidationFailure::DanglingReference { .. }, .. }
        ));
        assert_eq!(failure.partial_transcript.rounds_completed(), 1);

        let reprompt = gateway
            .requests()
            .into_iter()
            .filter(|(role, r)| *role == RoleId::Prosecutor && r.schema_name == "cross_examination")
            .nth(1)
            .unwrap();
        assert!(reprompt.1.feedback.is_some());
    }

    #[tokio::test]
    async fn test_dangling_reference_recovers_after_reprompt() {
        let dangling = json!({
            "responses": [
                {"target_role": "defense", "target_argument_id": "DF9", "action": "attack", "response_text": "x"},
            ],
            "updated_confidence": 0.7,
        })
        .to_string();
        let positions = agreeing("mutated");
        let gateway = scripted_debate(agreeing("mutated"), 0, "mutated", 0.8);
        gateway.scripts.lock().unwrap().insert(
            ("cross_examination", RoleId::Prosecutor),
            VecDeque::from([
                Ok(dangling),
                Ok(cross_exam(RoleId::Prosecutor, &positions[0])),
            ]),
        );

        let result = use_case(Arc::new(gateway), 2)
            .run_debate(claim("c"), source("s"), RoundPolicy::fixed(2).unwrap())
            .await
            .unwrap();
        assert_eq!(result.verdict, Verdict::Mutated);
    }

    #[tokio::test]
    async fn test_unknown_citation_fails_synthesis() {
        let bad = json!({
            "verdict": "mutated",
            "confidence": 0.8,
            "majority_position": "mutated",
            "key_agreements": [{"text": "t", "argument_ids": ["PR7"]}],
            "unresolved_disputes": [],
            "reasoning": "r",
        })
        .to_string();
        let gateway = scripted_debate(agreeing("mutated"), 0, "mutated", 0.8);
        gateway.scripts.lock().unwrap().insert(
            ("synthesis", RoleId::Foreman),
            VecDeque::from([Ok(bad.clone()), Ok(bad)]),
        );

        let error = use_case(Arc::new(gateway), 2)
            .run_debate(claim("c"), source("s"), RoundPolicy::fixed(2).unwrap())
            .await
            .unwrap_err();
        let failure = error.run_failure().unwrap();
        assert_eq!(failure.phase, DebatePhase::Synthesis);
        assert_eq!(failure.role, Some(RoleId::Foreman));
        assert_eq!(failure.partial_transcript.rounds_completed(), 2);
    }

    #[tokio::test]
    async fn test_retry_exhaustion_fails_run() {
        let gateway = scripted_debate(agreeing("faithful"), 0, "faithful", 0.9);
        gateway.scripts.lock().unwrap().insert(
            ("stance", RoleId::Defense),
            (0..4).map(|_| Err(GatewayError::Timeout)).collect(),
        );
        let use_case = RunDebateUseCase::new(
            Arc::new(gateway),
            Arc::new(FixedRoundCounter(2)),
            DebateParams::default()
                .with_backoff_base(Duration::ZERO)
                .with_max_retries(1),
        );

        let error = use_case
            .run_debate(claim("c"), source("s"), RoundPolicy::fixed(2).unwrap())
            .await
            .unwrap_err();
        let failure = error.run_failure().unwrap();
        assert_eq!(failure.role, Some(RoleId::Defense));
        assert!(matches!(
            failure.reason,
            InvokeError::RetriesExhausted { attempts: 2, .. }
        ));
        assert!(failure.partial_transcript.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_policy_rejected() {
        let gateway = Arc::new(MockGateway::default());
        let error = use_case(gateway.clone(), 2)
            .run_debate(
                claim("c"),
                source("s"),
                RoundPolicy::FixedRounds(1),
            )
            .await
            .unwrap_err();
        assert!(matches!(error, DebateError::InvalidInput(DomainError::InvalidRoundPolicy(_))));
        assert!(gateway.requests().is_empty());
    }

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let token = CancellationToken::new();
        token.cancel();
        let gateway = Arc::new(scripted_debate(agreeing("faithful"), 0, "faithful", 0.9));
        let error = use_case(gateway.clone(), 2)
            .with_cancellation(token)
            .run_debate(claim("c"), source("s"), RoundPolicy::fixed(2).unwrap())
            .await
            .unwrap_err();
        assert!(error.is_cancelled());
        assert!(gateway.requests().is_empty());
    }
}
