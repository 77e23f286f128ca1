//! Pipeline-level settings.

use crate::errors::{Result, StagewireError, StoreError};
use crate::wiring::WiringOptions;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default requested config name.
pub const DEFAULT_CONFIG_NAME: &str = "config.yaml";

/// Settings of a whole pipeline: its stage order and naming conventions.
///
/// Keys may be given in lower or upper case (`stages` or `STAGES`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineSettings {
    /// Stages in execution order.
    #[serde(alias = "STAGES")]
    pub stages: Vec<String>,
    /// Config name requested for every stage, e.g. `config_mouse|fast.yaml`.
    #[serde(alias = "CONFIG_NAME")]
    pub config_name: String,
    /// Temporary config and namespace names.
    #[serde(flatten)]
    pub wiring: WiringOptions,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            stages: Vec::new(),
            config_name: DEFAULT_CONFIG_NAME.to_string(),
            wiring: WiringOptions::default(),
        }
    }
}

impl PipelineSettings {
    /// Creates settings for the given stages with default names.
    #[must_use]
    pub fn new(stages: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            stages: stages.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Sets the requested config name.
    #[must_use]
    pub fn with_config_name(mut self, name: impl Into<String>) -> Self {
        self.config_name = name.into();
        self
    }

    /// Sets the wiring options.
    #[must_use]
    pub fn with_wiring(mut self, wiring: WiringOptions) -> Self {
        self.wiring = wiring;
        self
    }

    /// Parses settings from YAML.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        serde_yaml::from_str(text).map_err(|e| StagewireError::PipelineSettings(e.to_string()))
    }

    /// Reads settings from a YAML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| StoreError::io(path, e))?;
        Self::from_yaml_str(&text)
    }
}
