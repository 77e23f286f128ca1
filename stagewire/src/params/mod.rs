//! Parameter merging.
//!
//! This module provides:
//! - An insertion-ordered parameter set
//! - Settings objects with case-insensitive key selection
//! - The two-phase parameter builder

mod builder;
mod set;
mod settings;

pub use builder::{ParamsBuilder, StaticParams, RESERVED_KEY};
pub use set::ParameterSet;
pub use settings::{Settings, SettingsSource};
