//! Configuration file loading for claim-tribunal
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `TRIBUNAL_` prefixed environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./tribunal.toml` or `./.tribunal.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/claim-tribunal/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    FileAuditConfig, FileConfig, FileDebateConfig, FileGatewayConfig, FileOutputConfig,
};
pub use loader::ConfigLoader;
