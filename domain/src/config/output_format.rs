//! Output format value object

use serde::{Deserialize, Serialize};

/// How a debate result is printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Every round of the transcript followed by the verdict
    Full,
    /// Only the final verdict (default)
    #[default]
    Verdict,
    /// The complete result as JSON
    Json,
}
