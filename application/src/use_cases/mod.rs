//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod baseline;
pub mod invoker;
pub mod run_debate;
pub(crate) mod shared;
