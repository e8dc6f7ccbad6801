//! `[output]` section: result format and terminal colour

use serde::{Deserialize, Serialize};
use tribunal_domain::OutputFormat;

/// Raw output configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutputConfig {
    /// Default result format when `-o` is not given
    pub format: Option<OutputFormat>,
    /// Colour the console output
    pub color: bool,
}

impl Default for FileOutputConfig {
    fn default() -> Self {
        Self {
            format: None,
            color: true,
        }
    }
}

impl FileOutputConfig {
    /// Whether colour stays on, given the `--no-color` flag and `NO_COLOR`
    pub fn color_enabled(&self, no_color_flag: bool) -> bool {
        let no_color_env = std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty());
        self.color && !no_color_flag && !no_color_env
    }

    /// Command-line format wins over the configured one
    pub fn resolve_format(&self, requested: Option<OutputFormat>) -> OutputFormat {
        requested.or(self.format).unwrap_or_default()
    }
}
