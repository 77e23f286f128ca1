//! Materializing and updating per-stage temporary configs.

use super::WiringOptions;
use crate::config::{update_config, ConfigResolver};
use crate::diagnostics::{Diagnostics, Reported};
use crate::errors::{StagewireError, StoreError};
use crate::store::{ConfigDocument, DocumentStore};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Resolves each stage's config and writes it to the stage's temporary config.
///
/// Stage configs are looked up in `<configs_dir>/<stage>[/configs]` with the
/// usual fallback from `config_name`. A stage without any config gets an
/// empty document (and the resolution diagnostic). Returns the written paths.
pub fn create_temp_configs<S: AsRef<str>>(
    store: &dyn DocumentStore,
    stages: &[S],
    configs_dir: &Path,
    config_name: &str,
    output_dir: &Path,
    options: &WiringOptions,
) -> Result<Reported<Vec<PathBuf>>, StagewireError> {
    let resolver = ConfigResolver::new(store);
    let mut diagnostics = Diagnostics::new();
    let mut written = Vec::with_capacity(stages.len());

    for stage in stages {
        let stage = stage.as_ref();
        let resolution = resolver
            .resolve(configs_dir, stage, config_name)?
            .collect_into(&mut diagnostics);

        let target = options.temp_config_path(output_dir, stage);
        store.save(&target, &resolution.document)?;
        debug!(
            stage,
            source = ?resolution.path,
            target = %target.display(),
            "Created temporary config"
        );
        written.push(target);
    }

    Ok(Reported::new(written, diagnostics))
}

/// Applies the same updates to every stage's temporary config.
///
/// Returns how many configs were updated; unloadable ones are skipped with a
/// diagnostic.
pub fn set_global_configs<S: AsRef<str>>(
    store: &dyn DocumentStore,
    stages: &[S],
    output_dir: &Path,
    updates: &ConfigDocument,
    options: &WiringOptions,
) -> Result<Reported<usize>, StoreError> {
    let mut diagnostics = Diagnostics::new();
    let mut updated = 0;

    for stage in stages {
        let path = options.temp_config_path(output_dir, stage.as_ref());
        if update_config(store, &path, updates)?.collect_into(&mut diagnostics) {
            updated += 1;
        }
    }

    Ok(Reported::new(updated, diagnostics))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DiagnosticKind;
    use crate::store::MemoryStore;
    use serde_yaml::Value;

    #[test]
    fn test_create_temp_configs_resolves_per_stage() {
        let store = MemoryStore::new();
        store.insert_raw("/cfg/s1/configs/config.yaml", "STAGE_OUTPUT: one.nix\n");
        store.insert_raw("/cfg/s1/configs/config_mouse.yaml", "STAGE_OUTPUT: mouse.nix\n");
        store.insert_raw("/cfg/s2/config.yaml", "STAGE_OUTPUT: two.nix\n");

        let reported = create_temp_configs(
            &store,
            &["s1", "s2", "s3"],
            Path::new("/cfg"),
            "config_mouse.yaml",
            Path::new("/out"),
            &WiringOptions::default(),
        )
        .unwrap();

        assert_eq!(reported.value.len(), 3);
        let s1 = store.load(Path::new("/out/s1/temp_config.yaml")).unwrap().unwrap();
        assert_eq!(s1.get("STAGE_OUTPUT"), Some(&Value::from("mouse.nix")));
        let s2 = store.load(Path::new("/out/s2/temp_config.yaml")).unwrap().unwrap();
        assert_eq!(s2.get("STAGE_OUTPUT"), Some(&Value::from("two.nix")));

        let s3 = store.load(Path::new("/out/s3/temp_config.yaml")).unwrap().unwrap();
        assert!(s3.is_empty());
        let exhausted = reported.diagnostics.of_kind(DiagnosticKind::ResolutionExhausted);
        assert_eq!(exhausted.len(), 1);
        assert_eq!(exhausted[0].context_value("stage"), Some("s3"));
    }

    #[test]
    fn test_create_temp_configs_rejects_bad_name() {
        let store = MemoryStore::new();
        let result = create_temp_configs(
            &store,
            &["s1"],
            Path::new("/cfg"),
            "",
            Path::new("/out"),
            &WiringOptions::default(),
        );
        assert!(matches!(result, Err(StagewireError::InvalidConfigName(_))));
    }

    #[test]
    fn test_set_global_configs() {
        let store = MemoryStore::new();
        store.insert_raw("/out/s1/temp_config.yaml", "a: 1\n");
        store.insert_raw("/out/s2/temp_config.yaml", "a: 2\n");

        let updates: ConfigDocument = [("PLOT_FORMAT", "png")].into_iter().collect();
        let reported = set_global_configs(
            &store,
            &["s1", "s2", "s3"],
            Path::new("/out"),
            &updates,
            &WiringOptions::default(),
        )
        .unwrap();

        assert_eq!(reported.value, 2);
        assert_eq!(reported.diagnostics.count(DiagnosticKind::ConfigUpdateFailure), 1);
        for stage in ["s1", "s2"] {
            let doc = store
                .load(&PathBuf::from(format!("/out/{stage}/temp_config.yaml")))
                .unwrap()
                .unwrap();
            assert_eq!(doc.get("PLOT_FORMAT"), Some(&Value::from("png")));
        }
    }
}
