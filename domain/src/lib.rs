//! Domain layer for claim-tribunal
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Tribunal
//!
//! A claim is checked against its source by a multi-round adversarial debate
//! instead of a single inference call:
//!
//! - **Analysts** (prosecutor, defense, epistemologist) take stances,
//!   cross-examine each other and counter their opponents
//! - **Foreman** reads the whole transcript and delivers the verdict
//!
//! ## Structured outputs
//!
//! Every role answers in a declared [`ResponseSchema`]. Replies are decoded
//! into typed records and validated against the transcript; a reply that
//! references an argument nobody made is malformed.

pub mod config;
pub mod context;
pub mod core;
pub mod debate;
pub mod prompt;
pub mod role;
pub mod schema;

// Re-export commonly used types
pub use config::{ConfigIssue, ConfigIssueCode, IssueSeverity, OutputFormat};
pub use context::{ContextBudget, ContextDocument, DEFAULT_CONTEXT_BUDGET_CHARS, RenderedContext};
pub use core::{
    error::DomainError,
    model::{LatencyTier, Model},
    statement::{Claim, SourceText},
};
pub use debate::{
    argument::{Argument, ArgumentId},
    policy::{DebatePhase, DebateState, MIN_ROUNDS, RoundPlan, RoundPolicy},
    result::{BaselineResult, CitedPoint, DebateComparison, DebateResult},
    transcript::Transcript,
    turn::{CrossExamAction, RoleTurn, TranscriptEntry},
    verdict::{Confidence, ExamAction, MutationType, Severity, Verdict},
};
pub use prompt::PromptTemplate;
pub use role::{ROLE_DEFINITIONS, RoleDefinition, RoleId};
pub use schema::{
    BaselineOutput, CounterOutput, CrossExamOutput, ExamResponse, ResponseSchema, StanceOutput,
    StructuredOutput, SynthesisOutput, ValidationFailure, ValidationFeedback, decode,
    validate_counter, validate_cross_exam, validate_synthesis,
};
