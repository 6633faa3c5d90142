use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::coldness::ColdnessPolicy;
use crate::error::Result;
use crate::exposure::ExposureParams;
use crate::insolation::InsolationParams;
use crate::path::SearchLimits;

/// Tunable parameters of the exposure pipeline.
///
/// Every section falls back to its default when omitted, so an empty JSON
/// object is a valid configuration.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub exposure: ExposureParams,
    pub insolation: InsolationParams,
    pub coldness: ColdnessPolicy,
    pub search: SearchLimits,
}

impl ModelConfig {
    /// Load a configuration from a JSON file and validate it.
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: ModelConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.exposure.validate()?;
        self.insolation.validate()?;
        self.coldness.validate()
    }
}
