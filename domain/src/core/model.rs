//! Model value object representing the inference model behind every role

use crate::core::error::DomainError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Available inference models (Value Object)
///
/// Every role in a debate run is served by the same model; the choice only
/// affects the gateway, never the protocol.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Model {
    Gpt41,
    Gpt41Mini,
    Gpt4o,
    Gpt4oMini,
    Custom(String),
}

impl Model {
    /// Get the string identifier for this model
    pub fn as_str(&self) -> &str {
        match self {
            Model::Gpt41 => "gpt-4.1",
            Model::Gpt41Mini => "gpt-4.1-mini",
            Model::Gpt4o => "gpt-4o",
            Model::Gpt4oMini => "gpt-4o-mini",
            Model::Custom(s) => s,
        }
    }

    /// Models known to return JSON objects reliably
    pub fn known_models() -> Vec<Model> {
        vec![Model::Gpt41, Model::Gpt41Mini, Model::Gpt4o, Model::Gpt4oMini]
    }
}

impl Default for Model {
    /// Returns the default model (the fast tier)
    fn default() -> Self {
        LatencyTier::default().model()
    }
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Model {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s {
            "gpt-4.1" => Model::Gpt41,
            "gpt-4.1-mini" => Model::Gpt41Mini,
            "gpt-4o" => Model::Gpt4o,
            "gpt-4o-mini" => Model::Gpt4oMini,
            other => Model::Custom(other.to_string()),
        })
    }
}

impl Serialize for Model {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Model {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let Ok(model) = s.parse::<Model>();
        Ok(model)
    }
}

/// Latency/quality tier used to pick a model when none is given explicitly.
///
/// - **Fast**: cheap model for development runs
/// - **Quality**: stronger model for final evaluations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LatencyTier {
    #[default]
    Fast,
    Quality,
}

impl LatencyTier {
    pub fn model(&self) -> Model {
        match self {
            LatencyTier::Fast => Model::Gpt41Mini,
            LatencyTier::Quality => Model::Gpt41,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LatencyTier::Fast => "fast",
            LatencyTier::Quality => "quality",
        }
    }
}

impl std::fmt::Display for LatencyTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for LatencyTier {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fast" | "dev" => Ok(LatencyTier::Fast),
            "quality" | "presentation" => Ok(LatencyTier::Quality),
            other => Err(DomainError::unknown("tier", other, "fast, quality")),
        }
    }
}
