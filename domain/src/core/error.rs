//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Invalid {kind}: text cannot be empty")]
    EmptyStatement { kind: &'static str },

    #[error("Invalid round policy: {0}")]
    InvalidRoundPolicy(String),

    #[error("Confidence must be within [0, 1], got {0}")]
    ConfidenceOutOfRange(f64),

    #[error("Unknown {field} value '{value}' (expected one of: {allowed})")]
    UnknownEnumValue {
        field: &'static str,
        value: String,
        allowed: &'static str,
    },

    #[error("Transcript is append-only by round: got round {attempted} after round {last}")]
    RoundRegression { last: u32, attempted: u32 },
}

impl DomainError {
    pub(crate) fn unknown(field: &'static str, value: &str, allowed: &'static str) -> Self {
        DomainError::UnknownEnumValue {
            field,
            value: value.to_string(),
            allowed,
        }
    }
}
