//! Verify Claim Baseline use case
//!
//! A single structured call with the verifier directive. Used to compare
//! the debate's verdict against what one inference call would have said.

use crate::config::DebateParams;
use crate::ports::audit_log::{AuditLog, NoAuditLog};
use crate::ports::llm_gateway::LlmGateway;
use crate::use_cases::invoker::{InvokeError, RoleCall, RoleInvoker};
use crate::use_cases::shared::is_cancelled;
use chrono::Utc;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tribunal_domain::{
    BaselineOutput, BaselineResult, Claim, DebatePhase, PromptTemplate, ResponseSchema, RoleId,
    SourceText,
};

/// Use case for the single-call baseline verifier
pub struct VerifyClaimBaselineUseCase<G: LlmGateway + 'static> {
    gateway: Arc<G>,
    params: DebateParams,
    audit_log: Arc<dyn AuditLog>,
    cancellation_token: Option<CancellationToken>,
}

impl<G: LlmGateway + 'static> VerifyClaimBaselineUseCase<G> {
    pub fn new(gateway: Arc<G>, params: DebateParams) -> Self {
        Self {
            gateway,
            params,
            audit_log: Arc::new(NoAuditLog),
            cancellation_token: None,
        }
    }

    pub fn with_audit_log(mut self, audit_log: Arc<dyn AuditLog>) -> Self {
        self.audit_log = audit_log;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    pub async fn execute(
        &self,
        claim: Claim,
        source: SourceText,
    ) -> Result<BaselineResult, InvokeError> {
        if is_cancelled(&self.cancellation_token) {
            return Err(InvokeError::Cancelled);
        }
        info!("Running single-call baseline on {}", self.params.model);

        let started_at = Utc::now();
        let invoker = RoleInvoker::new(
            Arc::clone(&self.gateway),
            self.params.clone(),
            Arc::clone(&self.audit_log),
            self.cancellation_token.clone(),
        );
        let call = RoleCall::new(
            RoleId::Verifier,
            1,
            DebatePhase::Stance,
            ResponseSchema::Baseline,
            PromptTemplate::baseline(&claim, &source),
        );
        let output: BaselineOutput = invoker.invoke(&call, |_| Ok(())).await?;

        Ok(BaselineResult {
            claim,
            source_text: source,
            verdict: output.verdict,
            confidence: output.confidence,
            reasoning: output.reasoning,
            mutation_types: output.mutation_types,
            key_evidence: output.key_evidence,
            model: self.params.model.clone(),
            started_at,
            finished_at: Utc::now(),
        })
    }
}
