//! Debate domain
//!
//! Entities and value objects of a single debate run: the transcript and
//! its records, the round policy and state machine, and the final result.

pub mod argument;
pub mod policy;
pub mod result;
pub mod transcript;
pub mod turn;
pub mod verdict;
