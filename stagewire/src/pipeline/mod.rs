//! Pipeline construction.
//!
//! This module provides:
//! - A layout binding stage order to config and output directories
//! - The construction pass (temporary configs, then input wiring)
//! - Per-stage settings and parameter builders

mod layout;

pub use layout::PipelineLayout;
