//! Prompt templates for the tribunal flow

pub mod template;

pub use template::PromptTemplate;
