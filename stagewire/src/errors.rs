//! Error types for the stagewire crate.
//!
//! Missing, empty or unparsable config documents are expected conditions and
//! are reported as diagnostics (see [`crate::diagnostics`]), not as errors.
//! The types here cover the remaining hard failures: an unknown stage name,
//! a config name that cannot be parsed, unusable settings objects, and store
//! IO on the write path.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// The main error type for stagewire operations.
#[derive(Debug, Error)]
pub enum StagewireError {
    /// A document store operation failed.
    #[error("{0}")]
    Store(#[from] StoreError),

    /// A stage name is not part of the pipeline.
    #[error("{0}")]
    UnknownStage(#[from] UnknownStageError),

    /// A requested config file name does not follow the naming convention.
    #[error("{0}")]
    InvalidConfigName(#[from] InvalidConfigNameError),

    /// A settings object cannot be used as a key-value namespace.
    #[error("Invalid settings object: {0}")]
    InvalidSettings(String),

    /// The pipeline settings file could not be read.
    #[error("Invalid pipeline settings: {0}")]
    PipelineSettings(String),
}

/// Errors raised by a [`crate::store::DocumentStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the file failed.
    #[error("IO error on '{}': {source}", path.display())]
    Io {
        /// The file involved.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The file content is not valid YAML.
    #[error("Failed to parse '{}': {message}", path.display())]
    Parse {
        /// The file involved.
        path: PathBuf,
        /// Parser message.
        message: String,
    },

    /// The file parsed, but its root is not a key-value mapping.
    #[error("Document root of '{}' is not a mapping", path.display())]
    NotAMapping {
        /// The file involved.
        path: PathBuf,
    },

    /// The document could not be rendered back to YAML.
    #[error("Failed to serialize document for '{}': {message}", path.display())]
    Serialize {
        /// The file involved.
        path: PathBuf,
        /// Serializer message.
        message: String,
    },
}

impl StoreError {
    /// Wraps an IO error with the path it happened on.
    #[must_use]
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Creates a parse error.
    #[must_use]
    pub fn parse(path: &Path, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }

    /// The path the failed operation targeted.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Io { path, .. }
            | Self::Parse { path, .. }
            | Self::NotAMapping { path }
            | Self::Serialize { path, .. } => path,
        }
    }

    /// True when the failure means the content is unusable rather than unreachable.
    #[must_use]
    pub const fn is_content_error(&self) -> bool {
        matches!(self, Self::Parse { .. } | Self::NotAMapping { .. })
    }
}

/// Raised when a stage name cannot be found in the pipeline's stage list.
///
/// Continuing would silently build a wrong pipeline graph, so this is the one
/// lookup failure that is never degraded to a diagnostic.
#[derive(Debug, Clone, Error)]
#[error("Can't find stage '{stage}'! Please check the spelling and the config file. Known stages: {}", known.join(", "))]
pub struct UnknownStageError {
    /// The stage that was requested.
    pub stage: String,
    /// The stages that are known.
    pub known: Vec<String>,
}

impl UnknownStageError {
    /// Creates a new unknown stage error.
    #[must_use]
    pub fn new(stage: impl Into<String>, known: Vec<String>) -> Self {
        Self {
            stage: stage.into(),
            known,
        }
    }
}

/// Raised when a config file name cannot be split into its parts.
#[derive(Debug, Clone, Error)]
#[error("Invalid config name '{name}': {reason}")]
pub struct InvalidConfigNameError {
    /// The offending name.
    pub name: String,
    /// Why it was rejected.
    pub reason: String,
}

impl InvalidConfigNameError {
    /// Creates a new invalid config name error.
    #[must_use]
    pub fn new(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

/// Result alias for stagewire operations.
pub type Result<T> = std::result::Result<T, StagewireError>;
