//! Infrastructure layer for claim-tribunal
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod logging;
pub mod openai;

// Re-export commonly used types
pub use config::{
    ConfigLoader, FileAuditConfig, FileConfig, FileDebateConfig, FileGatewayConfig,
    FileOutputConfig,
};
pub use logging::JsonlAuditLog;
pub use openai::{OpenAiGateway, OpenAiGatewayConfig};
