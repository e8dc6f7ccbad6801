//! Port for the gateway call audit log.
//!
//! Defines the [`AuditLog`] trait for recording every inference call
//! (successful or not) to a structured log.
//!
//! This is separate from both `tracing` and the debate transcript: tracing
//! carries human-readable diagnostics, the transcript holds only accepted
//! role outputs, and the audit log holds one record per attempt.

use serde::Serialize;
use tribunal_domain::{DebatePhase, RoleId};

/// Outcome of one gateway attempt
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum AuditOutcome {
    /// Response decoded and validated
    Accepted,
    /// Transient gateway failure, will be retried if budget remains
    TransientFailure(String),
    /// Non-retryable gateway failure
    Rejected(String),
    /// Response received but failed validation
    Malformed(String),
    /// Cancelled while in flight
    Cancelled,
}

/// One audited gateway call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditRecord {
    pub role: RoleId,
    pub round: u32,
    pub phase: DebatePhase,
    /// Gateway attempt number within this invocation, starting at 1
    pub attempt: u32,
    pub latency_ms: u64,
    pub outcome: AuditOutcome,
}

/// Port for recording gateway calls.
///
/// The `record` method is synchronous and non-fallible so that logging
/// failures never disrupt a debate.
pub trait AuditLog: Send + Sync {
    fn record(&self, record: AuditRecord);
}

/// No-op implementation for tests and when auditing is disabled.
pub struct NoAuditLog;

impl AuditLog for NoAuditLog {
    fn record(&self, _record: AuditRecord) {}
}
