//! Stage chaining through per-stage temporary config documents.
//!
//! Each stage owns `<output_dir>/<stage>/<temp_config_name>`. The stage itself
//! declares what it produces under the output namespace key; wiring writes
//! the predecessor's produced path under the next stage's input namespace
//! key. Wiring must finish for the whole stage list before any stage's
//! parameters are finalized.

mod inputs;
mod lookup;
mod output;
mod temp;

pub use inputs::{wire_stage_inputs, StageLink};
pub use lookup::locate_stage;
pub use output::read_stage_output;
pub use temp::{create_temp_configs, set_global_configs};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default file name of a stage's temporary config.
pub const DEFAULT_TEMP_CONFIG_NAME: &str = "temp_config.yaml";
/// Default key a stage declares its output file name under.
pub const DEFAULT_OUTPUT_NAMESPACE: &str = "STAGE_OUTPUT";
/// Default key a stage's input path is written to.
pub const DEFAULT_INPUT_NAMESPACE: &str = "STAGE_INPUT";

/// File and key names used for wiring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WiringOptions {
    /// File name of each stage's temporary config.
    #[serde(alias = "TEMP_CONFIG_NAME")]
    pub temp_config_name: String,
    /// Key holding the stage's input path.
    #[serde(alias = "INPUT_NAMESPACE")]
    pub input_namespace: String,
    /// Key holding the stage's declared output file name.
    #[serde(alias = "OUTPUT_NAMESPACE")]
    pub output_namespace: String,
}

impl Default for WiringOptions {
    fn default() -> Self {
        Self {
            temp_config_name: DEFAULT_TEMP_CONFIG_NAME.to_string(),
            input_namespace: DEFAULT_INPUT_NAMESPACE.to_string(),
            output_namespace: DEFAULT_OUTPUT_NAMESPACE.to_string(),
        }
    }
}

impl WiringOptions {
    /// Sets the temporary config file name.
    #[must_use]
    pub fn with_temp_config_name(mut self, name: impl Into<String>) -> Self {
        self.temp_config_name = name.into();
        self
    }

    /// Path of a stage's temporary config.
    #[must_use]
    pub fn temp_config_path(&self, output_dir: &Path, stage: &str) -> PathBuf {
        output_dir.join(stage).join(&self.temp_config_name)
    }
}
