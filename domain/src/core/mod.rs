//! Core domain concepts shared across all subdomains.
//!
//! - [`model::Model`]: inference models and latency tiers
//! - [`statement::Claim`] / [`statement::SourceText`]: the pair under verification
//! - [`error::DomainError`]: domain-level errors

pub mod error;
pub mod model;
pub mod statement;
