//! Context document sent alongside a role directive.
//!
//! A document has four sections, rendered in this order:
//!
//! 1. **preamble**: claim and source text, never truncated
//! 2. **history**: per-round transcript excerpts, dropped oldest first
//! 3. **focus**: material the role must respond to in this round
//! 4. **task**: what to produce
//!
//! Only the history section is subject to the [`ContextBudget`].

use super::budget::ContextBudget;
use crate::core::statement::{Claim, SourceText};

/// A context document before budgeting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextDocument {
    preamble: String,
    excerpts: Vec<String>,
    focus: String,
    task: String,
}

/// A context document after budgeting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedContext {
    pub text: String,
    /// Number of history excerpts dropped to fit the budget
    pub omitted_excerpts: usize,
}

impl ContextDocument {
    pub fn new(claim: &Claim, source: &SourceText) -> Self {
        Self {
            preamble: format!(
                "CLAIM:\n{}\n\nSOURCE:\n{}\n",
                claim.content(),
                source.content()
            ),
            excerpts: Vec::new(),
            focus: String::new(),
            task: String::new(),
        }
    }

    /// History excerpts, oldest first
    pub fn with_excerpts(mut self, excerpts: Vec<String>) -> Self {
        self.excerpts = excerpts;
        self
    }

    pub fn with_focus(mut self, focus: impl Into<String>) -> Self {
        self.focus = focus.into();
        self
    }

    pub fn with_task(mut self, task: impl Into<String>) -> Self {
        self.task = task.into();
        self
    }

    pub fn excerpts(&self) -> &[String] {
        &self.excerpts
    }

    /// Render within the budget, dropping the oldest excerpts first.
    ///
    /// The preamble, focus and task are always kept, even when they alone
    /// exceed the budget.
    pub fn render(&self, budget: &ContextBudget) -> RenderedContext {
        let mut omitted = 0;
        loop {
            let text = self.assemble(omitted);
            if omitted == self.excerpts.len() || text.chars().count() <= budget.max_chars() {
                return RenderedContext {
                    text,
                    omitted_excerpts: omitted,
                };
            }
            omitted += 1;
        }
    }

    fn assemble(&self, omitted: usize) -> String {
        let mut out = self.preamble.clone();
        let kept = &self.excerpts[omitted..];
        if omitted > 0 || !kept.is_empty() {
            out.push_str("\nDEBATE HISTORY:\n");
            if omitted > 0 {
                out.push_str(&format!("[{} earlier excerpt(s) omitted]\n", omitted));
            }
            for excerpt in kept {
                out.push_str(excerpt);
                if !excerpt.ends_with('\n') {
                    out.push('\n');
                }
            }
        }
        if !self.focus.is_empty() {
            out.push('\n');
            out.push_str(&self.focus);
            if !self.focus.ends_with('\n') {
                out.push('\n');
            }
        }
        if !self.task.is_empty() {
            out.push_str("\nTASK:\n");
            out.push_str(&self.task);
        }
        out
    }
}
