//! Two-phase parameter merging for stage script invocations.
//!
//! Phase one ([`ParamsBuilder::build`]) runs once when a workflow rule is
//! declared and gathers the static parameters. Phase two
//! ([`StaticParams::finalize`]) runs once per scheduled task and merges that
//! task's wildcards and declared outputs before rendering the CLI string.

use super::{ParameterSet, Settings, SettingsSource};
use crate::cli::{render_value, to_cli_args};
use crate::diagnostics::{Diagnostic, DiagnosticKind, Diagnostics, Reported};
use serde_yaml::Value;
use tracing::debug;

/// Parameter name reserved for the stage's primary input, which is wired
/// separately and never taken from wildcards or outputs.
pub const RESERVED_KEY: &str = "data";

/// Collects static parameters.
///
/// Precedence, lowest first: values selected from the settings, the seed
/// mapping (a seeded key is never replaced by a settings lookup), explicit
/// overrides.
#[derive(Debug, Clone, Default)]
pub struct ParamsBuilder {
    seed: ParameterSet,
    settings: Option<Settings>,
    requested: Vec<String>,
    overrides: ParameterSet,
}

impl ParamsBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the parameter set with an explicit mapping.
    #[must_use]
    pub fn with_params(mut self, params: ParameterSet) -> Self {
        self.seed = params;
        self
    }

    /// Sets the settings object requested keys are selected from.
    #[must_use]
    pub fn with_settings(mut self, settings: impl Into<Settings>) -> Self {
        self.settings = Some(settings.into());
        self
    }

    /// Requests keys to be copied from the settings.
    #[must_use]
    pub fn select<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.requested.extend(keys.into_iter().map(Into::into));
        self
    }

    /// Sets an explicit override.
    #[must_use]
    pub fn set(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.overrides.insert(key, value);
        self
    }

    /// Runs the static merge.
    pub fn build(self) -> Reported<StaticParams> {
        let mut diagnostics = Diagnostics::new();
        let mut params = self.seed.clone();

        match &self.settings {
            Some(settings) => {
                for key in &self.requested {
                    if self.seed.contains_key(key) {
                        debug!(key = %key, "Requested parameter already seeded");
                        continue;
                    }
                    if let Some(value) = settings.select(key) {
                        params.insert(key.clone(), value.clone());
                    } else {
                        diagnostics.push(
                            Diagnostic::new(
                                DiagnosticKind::ParameterMissing,
                                format!("Parameter \"{key}\" not found in the config! Set to None!"),
                            )
                            .with_context("key", key),
                        );
                        params.insert(key.clone(), Value::Null);
                    }
                }
            }
            None if !self.requested.is_empty() => {
                debug!(keys = ?self.requested, "No settings given, requested keys ignored");
            }
            None => {}
        }

        for (key, value) in self.overrides {
            params.insert(key, value);
        }

        Reported::new(StaticParams { params }, diagnostics)
    }
}

/// The result of the static merge, ready to be finalized per task.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaticParams {
    params: ParameterSet,
}

impl StaticParams {
    /// Wraps an already merged parameter set.
    #[must_use]
    pub const fn new(params: ParameterSet) -> Self {
        Self { params }
    }

    /// The static parameters.
    #[must_use]
    pub const fn params(&self) -> &ParameterSet {
        &self.params
    }

    /// Merges a task's wildcards, then its outputs, and returns the result.
    ///
    /// Dynamic values replace static ones, outputs replace wildcards, and a
    /// key named [`RESERVED_KEY`] is dropped from both. Every replaced value
    /// that differs is reported as a [`DiagnosticKind::ParameterConflict`].
    pub fn finalize_params(
        &self,
        wildcards: &ParameterSet,
        outputs: &ParameterSet,
    ) -> Reported<ParameterSet> {
        let mut diagnostics = Diagnostics::new();
        let mut params = self.params.clone();

        for (source, items) in [("wildcards", wildcards), ("outputs", outputs)] {
            for (key, value) in items.iter() {
                if key == RESERVED_KEY {
                    diagnostics.push(
                        Diagnostic::new(
                            DiagnosticKind::ReservedKeyDropped,
                            format!("{source} named '{RESERVED_KEY}' are being ignored!"),
                        )
                        .with_context("source", source),
                    );
                    continue;
                }

                if let Some(old) = params.get(key).filter(|old| *old != value) {
                    diagnostics.push(
                        Diagnostic::new(
                            DiagnosticKind::ParameterConflict,
                            format!(
                                "The keyword {key} is used multiple times in the rule's params, \
                                 wildcards, or output! {key}: '{}' is ignored in favor of '{}'",
                                render_value(old),
                                render_value(value)
                            ),
                        )
                        .with_context("key", key)
                        .with_context("old", render_value(old))
                        .with_context("new", render_value(value))
                        .with_context("source", source),
                    );
                }
                params.insert(key, value.clone());
            }
        }

        Reported::new(params, diagnostics)
    }

    /// Merges a task's wildcards and outputs and renders the CLI string.
    pub fn finalize(&self, wildcards: &ParameterSet, outputs: &ParameterSet) -> Reported<String> {
        self.finalize_params(wildcards, outputs)
            .map(|params| to_cli_args(&params))
    }
}
