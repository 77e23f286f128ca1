//! # Stagewire
//!
//! Configuration plumbing for file-based, multi-stage analysis pipelines.
//!
//! Stagewire sits next to a workflow scheduler and provides:
//!
//! - **Config resolution**: Find a stage's YAML config from a requested name
//!   like `config_mouse_anesthetized|fast.yaml`, falling back to less specific
//!   names
//! - **Stage wiring**: Chain each stage's declared output into the next
//!   stage's input through per-stage temporary configs
//! - **Parameter building**: Select, override and merge script parameters,
//!   then render them as command-line flags
//! - **Diagnostics**: Every recoverable problem is returned alongside the
//!   result and emitted through `tracing`
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use stagewire::prelude::*;
//!
//! let layout = PipelineLayout::new(
//!     PipelineSettings::new(["stage01_data_entry", "stage02_processing"])
//!         .with_config_name("config_mouse|fast.yaml"),
//!     "pipeline/configs",
//!     "output",
//! );
//! let store = YamlFileStore::new();
//! layout.prepare(&store)?;
//!
//! let params = layout
//!     .stage_params(&store, "stage02_processing")?
//!     .value
//!     .select(["sampling_rate", "plot_format"])
//!     .build()
//!     .value;
//! let cli = params.finalize(&ParameterSet::new(), &outputs).value;
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod cli;
pub mod config;
pub mod diagnostics;
pub mod errors;
pub mod observability;
pub mod params;
pub mod pipeline;
pub mod settings;
pub mod store;
pub mod wiring;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::cli::{render_value, to_cli_args};
    pub use crate::config::{update_config, ConfigName, ConfigResolver, Resolution};
    pub use crate::diagnostics::{Diagnostic, DiagnosticKind, Diagnostics, Reported, Severity};
    pub use crate::errors::{
        InvalidConfigNameError, StagewireError, StoreError, UnknownStageError,
    };
    pub use crate::observability::{init_tracing, LogFormat};
    pub use crate::params::{
        ParameterSet, ParamsBuilder, Settings, SettingsSource, StaticParams, RESERVED_KEY,
    };
    pub use crate::pipeline::PipelineLayout;
    pub use crate::settings::PipelineSettings;
    pub use crate::store::{ConfigDocument, DocumentStore, MemoryStore, YamlFileStore};
    pub use crate::wiring::{
        create_temp_configs, locate_stage, read_stage_output, set_global_configs,
        wire_stage_inputs, StageLink, WiringOptions,
    };
}
