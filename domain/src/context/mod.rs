//! Context documents and their size budget.
//!
//! - [`ContextDocument`] - claim/source preamble, history excerpts, focus and task
//! - [`ContextBudget`] - character budget applied when rendering

pub mod budget;
pub mod document;

pub use budget::{ContextBudget, DEFAULT_CONTEXT_BUDGET_CHARS};
pub use document::{ContextDocument, RenderedContext};
