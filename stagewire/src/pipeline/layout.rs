//! A pipeline bound to its config and output directories.

use crate::config::{ConfigResolver, Resolution};
use crate::diagnostics::{Diagnostic, DiagnosticKind, Diagnostics, Reported};
use crate::errors::{StagewireError, StoreError, UnknownStageError};
use crate::params::{ParamsBuilder, Settings, RESERVED_KEY};
use crate::settings::PipelineSettings;
use crate::store::{ConfigDocument, DocumentStore};
use crate::wiring::{self, StageLink};
use serde_yaml::Value;
use std::path::{Path, PathBuf};
use tracing::info;

/// Everything needed to build a pipeline's stage configs.
///
/// The layout holds no document state; every call goes through the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineLayout {
    settings: PipelineSettings,
    configs_dir: PathBuf,
    output_dir: PathBuf,
}

impl PipelineLayout {
    /// Creates a new layout.
    #[must_use]
    pub fn new(
        settings: PipelineSettings,
        configs_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            settings,
            configs_dir: configs_dir.into(),
            output_dir: output_dir.into(),
        }
    }

    /// The pipeline settings.
    #[must_use]
    pub const fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// Stages in execution order.
    #[must_use]
    pub fn stages(&self) -> &[String] {
        &self.settings.stages
    }

    /// Directory holding the per-stage config directories.
    #[must_use]
    pub fn configs_dir(&self) -> &Path {
        &self.configs_dir
    }

    /// Directory holding the per-stage output directories.
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Position of a stage in the pipeline.
    pub fn stage_index(&self, stage: &str) -> Result<usize, UnknownStageError> {
        wiring::locate_stage(self.stages(), stage)
    }

    /// The stage that runs before `stage`, if any.
    pub fn predecessor(&self, stage: &str) -> Result<Option<&str>, UnknownStageError> {
        let index = self.stage_index(stage)?;
        Ok(index
            .checked_sub(1)
            .map(|i| self.settings.stages[i].as_str()))
    }

    /// Output directory of a stage.
    pub fn stage_output_dir(&self, stage: &str) -> Result<PathBuf, UnknownStageError> {
        self.stage_index(stage)?;
        Ok(self.output_dir.join(stage))
    }

    /// Path of a stage's temporary config.
    pub fn temp_config_path(&self, stage: &str) -> Result<PathBuf, UnknownStageError> {
        self.stage_index(stage)?;
        Ok(self.settings.wiring.temp_config_path(&self.output_dir, stage))
    }

    /// Resolves a stage's config with the pipeline's requested config name.
    pub fn resolve_stage_config(
        &self,
        store: &dyn DocumentStore,
        stage: &str,
    ) -> Result<Reported<Resolution>, StagewireError> {
        self.stage_index(stage)?;
        Ok(ConfigResolver::new(store).resolve(
            &self.configs_dir,
            stage,
            &self.settings.config_name,
        )?)
    }

    /// Writes every stage's resolved config to its temporary config.
    pub fn create_temp_configs(
        &self,
        store: &dyn DocumentStore,
    ) -> Result<Reported<Vec<PathBuf>>, StagewireError> {
        wiring::create_temp_configs(
            store,
            self.stages(),
            &self.configs_dir,
            &self.settings.config_name,
            &self.output_dir,
            &self.settings.wiring,
        )
    }

    /// Chains every stage's declared output into the next stage's input.
    pub fn wire_inputs(
        &self,
        store: &dyn DocumentStore,
    ) -> Result<Reported<Vec<StageLink>>, StoreError> {
        wiring::wire_stage_inputs(store, self.stages(), &self.output_dir, &self.settings.wiring)
    }

    /// Applies the same updates to every stage's temporary config.
    pub fn set_global_configs(
        &self,
        store: &dyn DocumentStore,
        updates: &ConfigDocument,
    ) -> Result<Reported<usize>, StoreError> {
        wiring::set_global_configs(
            store,
            self.stages(),
            &self.output_dir,
            updates,
            &self.settings.wiring,
        )
    }

    /// Creates all temporary configs, then wires stage inputs.
    ///
    /// This is the full pipeline-construction pass; it has to complete before
    /// any stage's parameters are finalized.
    pub fn prepare(
        &self,
        store: &dyn DocumentStore,
    ) -> Result<Reported<Vec<StageLink>>, StagewireError> {
        let mut diagnostics = Diagnostics::new();
        self.create_temp_configs(store)?
            .collect_into(&mut diagnostics);
        let links = self.wire_inputs(store)?.collect_into(&mut diagnostics);

        info!(
            stages = self.stages().len(),
            links = links.len(),
            "Prepared pipeline configs"
        );
        Ok(Reported::new(links, diagnostics))
    }

    /// Loads a stage's temporary config as a settings object.
    ///
    /// An unloadable config yields empty settings with a diagnostic.
    pub fn stage_settings(
        &self,
        store: &dyn DocumentStore,
        stage: &str,
    ) -> Result<Reported<Settings>, UnknownStageError> {
        Ok(self.load_temp_config(store, stage)?.map(Settings::Document))
    }

    /// The input path wired into a stage, if any.
    pub fn stage_input(
        &self,
        store: &dyn DocumentStore,
        stage: &str,
    ) -> Result<Reported<Option<String>>, UnknownStageError> {
        Ok(self
            .load_temp_config(store, stage)?
            .map(|doc| self.input_of(&doc)))
    }

    /// A parameter builder for a stage script.
    ///
    /// The builder selects from the stage's temporary config, and the wired
    /// input path is set as the reserved `data` parameter. A stage with a
    /// predecessor but no wired input gets a diagnostic.
    pub fn stage_params(
        &self,
        store: &dyn DocumentStore,
        stage: &str,
    ) -> Result<Reported<ParamsBuilder>, UnknownStageError> {
        let (document, mut diagnostics) = self.load_temp_config(store, stage)?.into_parts();
        let input = self.input_of(&document);
        let mut builder = ParamsBuilder::new().with_settings(document);

        if let Some(input) = input {
            builder = builder.set(RESERVED_KEY, input);
        } else if let Some(previous) = self.predecessor(stage)? {
            let namespace = &self.settings.wiring.input_namespace;
            diagnostics.push(
                Diagnostic::new(
                    DiagnosticKind::NamespaceKeyMissing,
                    format!("config file of stage {stage} does not define {namespace}!"),
                )
                .with_context("stage", stage)
                .with_context("predecessor", previous)
                .with_context("key", namespace),
            );
        }

        Ok(Reported::new(builder, diagnostics))
    }

    fn input_of(&self, document: &ConfigDocument) -> Option<String> {
        document
            .get(&self.settings.wiring.input_namespace)
            .and_then(Value::as_str)
            .map(str::to_string)
    }

    fn load_temp_config(
        &self,
        store: &dyn DocumentStore,
        stage: &str,
    ) -> Result<Reported<ConfigDocument>, UnknownStageError> {
        let path = self.temp_config_path(stage)?;
        let problem = match store.load(&path) {
            Ok(Some(document)) => return Ok(Reported::clean(document)),
            Ok(None) => format!("config file is empty or missing: {}", path.display()),
            Err(e) => e.to_string(),
        };
        let mut diagnostics = Diagnostics::new();
        diagnostics.push(
            Diagnostic::new(DiagnosticKind::EmptyOrUnparsableDocument, problem)
                .with_context("stage", stage)
                .with_context("path", path.display()),
        );
        Ok(Reported::new(ConfigDocument::new(), diagnostics))
    }
}
