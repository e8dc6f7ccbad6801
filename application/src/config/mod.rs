//! Application-level configuration.
//!
//! - [`DebateParams`]: invocation control (model, retries, backoff, deadlines, concurrency)

pub mod debate_params;

pub use debate_params::DebateParams;
