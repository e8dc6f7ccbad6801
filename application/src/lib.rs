//! Application layer for claim-tribunal
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::DebateParams;
pub use ports::{
    audit_log::{AuditLog, AuditOutcome, AuditRecord, NoAuditLog},
    llm_gateway::{GatewayError, InferenceRequest, LlmGateway},
    progress::{DebateProgressNotifier, NoProgress},
    round_counter::{FixedRoundCounter, RandomRoundCounter, RoundCounter},
};
pub use use_cases::baseline::VerifyClaimBaselineUseCase;
pub use use_cases::invoker::{InvokeError, RoleCall, RoleInvoker};
pub use use_cases::run_debate::{DebateError, DebateRunFailed, RunDebateUseCase};
