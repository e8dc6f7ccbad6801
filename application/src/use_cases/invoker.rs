//! Role invoker
//!
//! Turns one role call into a validated structured output:
//!
//! 1. render the context document within the budget
//! 2. call the gateway under a concurrency permit and a deadline
//! 3. retry transient failures with exponential backoff
//! 4. decode and validate; on failure re-prompt once with feedback
//!
//! Every gateway attempt is written to the audit log.

use crate::config::DebateParams;
use crate::ports::audit_log::{AuditLog, AuditOutcome, AuditRecord};
use crate::ports::llm_gateway::{GatewayError, InferenceRequest, LlmGateway};
use crate::use_cases::shared::is_cancelled;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use tribunal_domain::{
    ContextDocument, DebatePhase, ResponseSchema, RoleId, StructuredOutput, ValidationFailure,
    ValidationFeedback, decode,
};

/// Errors that escape the invoker's local recovery
#[derive(Error, Debug)]
pub enum InvokeError {
    #[error("{role} failed after {attempts} attempt(s): {last_error}")]
    RetriesExhausted {
        role: RoleId,
        attempts: u32,
        last_error: GatewayError,
    },

    #[error("{role} returned malformed output after a corrective re-prompt: {failure}")]
    Malformed {
        role: RoleId,
        failure: ValidationFailure,
    },

    #[error("{role} request rejected: {error}")]
    Rejected { role: RoleId, error: GatewayError },

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl InvokeError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, InvokeError::Cancelled)
    }
}

/// One role invocation in one round
#[derive(Debug, Clone)]
pub struct RoleCall {
    pub role: RoleId,
    pub round: u32,
    pub phase: DebatePhase,
    pub schema: ResponseSchema,
    pub context: ContextDocument,
}

impl RoleCall {
    pub fn new(
        role: RoleId,
        round: u32,
        phase: DebatePhase,
        schema: ResponseSchema,
        context: ContextDocument,
    ) -> Self {
        Self {
            role,
            round,
            phase,
            schema,
            context,
        }
    }
}

/// Per-run invoker. Cheap to clone; clones share the concurrency bound.
pub struct RoleInvoker<G: LlmGateway + 'static> {
    gateway: Arc<G>,
    params: Arc<DebateParams>,
    semaphore: Arc<Semaphore>,
    audit_log: Arc<dyn AuditLog>,
    cancellation_token: Option<CancellationToken>,
}

impl<G: LlmGateway + 'static> Clone for RoleInvoker<G> {
    fn clone(&self) -> Self {
        Self {
            gateway: Arc::clone(&self.gateway),
            params: Arc::clone(&self.params),
            semaphore: Arc::clone(&self.semaphore),
            audit_log: Arc::clone(&self.audit_log),
            cancellation_token: self.cancellation_token.clone(),
        }
    }
}

impl<G: LlmGateway + 'static> RoleInvoker<G> {
    pub fn new(
        gateway: Arc<G>,
        params: DebateParams,
        audit_log: Arc<dyn AuditLog>,
        cancellation_token: Option<CancellationToken>,
    ) -> Self {
        let permits = params.max_concurrent_calls.max(1);
        Self {
            gateway,
            params: Arc::new(params),
            semaphore: Arc::new(Semaphore::new(permits)),
            audit_log,
            cancellation_token,
        }
    }

    /// Invoke a role and return its validated output.
    ///
    /// `validate` runs after decoding and checks the output against the
    /// transcript. A failure from either step triggers one corrective
    /// re-prompt; a second failure is fatal.
    pub async fn invoke<T, V>(&self, call: &RoleCall, validate: V) -> Result<T, InvokeError>
    where
        T: StructuredOutput,
        V: Fn(&T) -> Result<(), ValidationFailure> + Send + Sync,
    {
        let definition = call.role.definition();
        let mut request = InferenceRequest {
            model: self.params.model.clone(),
            directive: definition.directive.to_string(),
            context: self.render_context(call, None),
            schema_name: call.schema.name(),
            response_schema: call.schema.descriptor(),
            temperature: self.params.temperature.unwrap_or(definition.temperature),
            feedback: None,
        };

        let mut attempt = 0;
        loop {
            let (raw, latency_ms) = self.complete_with_retry(call, &request, &mut attempt).await?;

            let outcome = decode::<T>(&raw, &call.schema).and_then(|output| {
                validate(&output)?;
                Ok(output)
            });

            match outcome {
                Ok(output) => {
                    self.audit(call, attempt, latency_ms, AuditOutcome::Accepted);
                    debug!(role = %call.role, round = call.round, attempt, "Output accepted");
                    return Ok(output);
                }
                Err(failure) => {
                    self.audit(
                        call,
                        attempt,
                        latency_ms,
                        AuditOutcome::Malformed(failure.to_string()),
                    );
                    if request.feedback.is_some() {
                        warn!(role = %call.role, round = call.round, "Malformed again after re-prompt: {}", failure);
                        return Err(InvokeError::Malformed {
                            role: call.role,
                            failure,
                        });
                    }
                    warn!(role = %call.role, round = call.round, "Malformed output, re-prompting: {}", failure);
                    let feedback = ValidationFeedback::new(&call.schema, &failure);
                    request.context = self.render_context(call, Some(&feedback));
                    request.feedback = Some(feedback);
                }
            }
        }
    }

    /// Render the call's context, leaving room for any corrective feedback
    fn render_context(&self, call: &RoleCall, feedback: Option<&ValidationFeedback>) -> String {
        let reserved = feedback.map_or(0, ValidationFeedback::appended_len);
        let rendered = call
            .context
            .render(&self.params.context_budget.reserve(reserved));
        if rendered.omitted_excerpts > 0 {
            debug!(
                role = %call.role,
                round = call.round,
                omitted = rendered.omitted_excerpts,
                "Context over budget, dropped oldest excerpts"
            );
        }
        rendered.text
    }

    /// Call the gateway until it returns text, retrying transient failures.
    async fn complete_with_retry(
        &self,
        call: &RoleCall,
        request: &InferenceRequest,
        attempt: &mut u32,
    ) -> Result<(String, u64), InvokeError> {
        let mut retries = 0;
        loop {
            if is_cancelled(&self.cancellation_token) {
                return Err(InvokeError::Cancelled);
            }
            *attempt += 1;

            let started = Instant::now();
            let result = self.cancellable(self.call_once(request)).await;
            let latency_ms = started.elapsed().as_millis() as u64;

            let error = match result {
                Ok(Ok(raw)) => return Ok((raw, latency_ms)),
                Ok(Err(error)) => error,
                Err(cancelled) => {
                    self.audit(call, *attempt, latency_ms, AuditOutcome::Cancelled);
                    return Err(cancelled);
                }
            };

            if !error.is_transient() {
                self.audit(
                    call,
                    *attempt,
                    latency_ms,
                    AuditOutcome::Rejected(error.to_string()),
                );
                warn!(role = %call.role, round = call.round, "Request rejected: {}", error);
                return Err(InvokeError::Rejected {
                    role: call.role,
                    error,
                });
            }

            self.audit(
                call,
                *attempt,
                latency_ms,
                AuditOutcome::TransientFailure(error.to_string()),
            );
            if retries >= self.params.max_retries {
                return Err(InvokeError::RetriesExhausted {
                    role: call.role,
                    attempts: retries + 1,
                    last_error: error,
                });
            }

            let delay = self.params.backoff_delay(retries);
            retries += 1;
            warn!(
                role = %call.role,
                round = call.round,
                retry = retries,
                "Transient gateway failure, retrying in {:?}: {}",
                delay,
                error
            );
            self.sleep(delay).await?;
        }
    }

    /// One gateway call under a concurrency permit and a deadline
    async fn call_once(&self, request: &InferenceRequest) -> Result<String, GatewayError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|e| GatewayError::Other(e.to_string()))?;

        match tokio::time::timeout(self.params.call_timeout, self.gateway.complete(request)).await {
            Ok(result) => result,
            Err(_) => Err(GatewayError::Timeout),
        }
    }

    async fn sleep(&self, delay: Duration) -> Result<(), InvokeError> {
        if delay.is_zero() {
            return Ok(());
        }
        self.cancellable(tokio::time::sleep(delay)).await
    }

    /// Race a future against the cancellation token
    async fn cancellable<F: Future>(&self, future: F) -> Result<F::Output, InvokeError> {
        match &self.cancellation_token {
            Some(token) => tokio::select! {
                biased;
                _ = token.cancelled() => Err(InvokeError::Cancelled),
                output = future => Ok(output),
            },
            None => Ok(future.await),
        }
    }

    fn audit(&self, call: &RoleCall, attempt: u32, latency_ms: u64, outcome: AuditOutcome) {
        self.audit_log.record(AuditRecord {
            role: call.role,
            round: call.round,
            phase: call.phase,
            attempt,
            latency_ms,
            outcome,
        });
    }
}
