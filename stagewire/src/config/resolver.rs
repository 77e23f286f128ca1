//! Hierarchical config resolution.

use super::ConfigName;
use crate::diagnostics::{Diagnostic, DiagnosticKind, Diagnostics, Reported};
use crate::errors::InvalidConfigNameError;
use crate::store::{ConfigDocument, DocumentStore};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Name of the optional subdirectory holding a stage's config files.
pub const CONFIGS_SUBDIR: &str = "configs";

/// Outcome of a config resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// The resolved document, empty if nothing was found.
    pub document: ConfigDocument,
    /// The file the document came from.
    pub path: Option<PathBuf>,
    /// Every candidate that was tried, in order.
    pub attempts: Vec<ConfigName>,
}

impl Resolution {
    /// True if a non-empty document was found.
    #[must_use]
    pub const fn is_found(&self) -> bool {
        self.path.is_some()
    }

    /// The name of the candidate that matched.
    #[must_use]
    pub fn matched_name(&self) -> Option<&ConfigName> {
        self.path.as_ref().and_then(|_| self.attempts.last())
    }
}

/// Finds the most specific existing config for a stage.
#[derive(Clone, Copy)]
pub struct ConfigResolver<'a> {
    store: &'a dyn DocumentStore,
}

impl std::fmt::Debug for ConfigResolver<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigResolver").finish_non_exhaustive()
    }
}

impl<'a> ConfigResolver<'a> {
    /// Creates a resolver reading through `store`.
    #[must_use]
    pub const fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }

    /// The directory searched for `stage`: `<config_dir>/<stage>/configs` if
    /// it exists, else `<config_dir>/<stage>`.
    #[must_use]
    pub fn search_dir(&self, config_dir: &Path, stage: &str) -> PathBuf {
        let stage_dir = config_dir.join(stage);
        let nested = stage_dir.join(CONFIGS_SUBDIR);
        if self.store.is_dir(&nested) {
            nested
        } else {
            stage_dir
        }
    }

    /// Resolves `requested` for `stage` below `config_dir`.
    ///
    /// A name that cannot be parsed is an error; failing to find any config
    /// is not, and yields an empty document with a
    /// [`DiagnosticKind::ResolutionExhausted`] diagnostic.
    pub fn resolve(
        &self,
        config_dir: &Path,
        stage: &str,
        requested: &str,
    ) -> Result<Reported<Resolution>, InvalidConfigNameError> {
        let name = ConfigName::parse(requested)?;
        let dir = self.search_dir(config_dir, stage);
        let mut reported = self.resolve_in(&dir, &name);
        reported.diagnostics.annotate("stage", stage);
        Ok(reported)
    }

    /// Resolves `requested` directly inside `dir`.
    pub fn resolve_in(&self, dir: &Path, requested: &ConfigName) -> Reported<Resolution> {
        let mut diagnostics = Diagnostics::new();
        let mut attempts = Vec::new();
        let mut chain = requested.fallback_chain().into_iter().peekable();

        while let Some(candidate) = chain.next() {
            let path = dir.join(candidate.to_string());
            attempts.push(candidate.clone());

            match self.store.load(&path) {
                Ok(Some(document)) if !document.is_empty() => {
                    debug!(path = %path.display(), "Resolved config");
                    return Reported::new(
                        Resolution {
                            document,
                            path: Some(path),
                            attempts,
                        },
                        diagnostics,
                    );
                }
                Ok(Some(_)) => diagnostics.push(
                    Diagnostic::new(
                        DiagnosticKind::EmptyOrUnparsableDocument,
                        format!("config file is empty: {}", path.display()),
                    )
                    .with_context("path", path.display()),
                ),
                Ok(None) => {}
                Err(e) => diagnostics.push(
                    Diagnostic::new(DiagnosticKind::EmptyOrUnparsableDocument, e.to_string())
                        .with_context("path", path.display()),
                ),
            }

            if let Some(next) = chain.peek() {
                diagnostics.push(
                    Diagnostic::new(
                        DiagnosticKind::ResolutionFallback,
                        format!("'{candidate}' not found, trying '{next}'."),
                    )
                    .with_context("from", &candidate)
                    .with_context("to", next),
                );
            }
        }

        diagnostics.push(
            Diagnostic::new(
                DiagnosticKind::ResolutionExhausted,
                "No corresponding config file found!",
            )
            .with_context("requested", requested)
            .with_context("dir", dir.display()),
        );
        Reported::new(
            Resolution {
                document: ConfigDocument::new(),
                path: None,
                attempts,
            },
            diagnostics,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, MockDocumentStore};
    use pretty_assertions::assert_eq;
    use serde_yaml::Value;

    fn attempted(resolution: &Resolution) -> Vec<String> {
        resolution.attempts.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_most_specific_wins() {
        let store = MemoryStore::new();
        store.insert_raw("/cfg/stage01/config.yaml", "level: base");
        store.insert_raw("/cfg/stage01/config_a.yaml", "level: a");
        store.insert_raw("/cfg/stage01/config_a_b.yaml", "level: ab");

        let resolved = ConfigResolver::new(&store)
            .resolve(Path::new("/cfg"), "stage01", "config_a_b.yaml")
            .unwrap();

        assert_eq!(resolved.value.document.get("level"), Some(&Value::from("ab")));
        assert_eq!(resolved.value.attempts.len(), 1);
        assert!(resolved.diagnostics.is_empty());
    }

    #[test]
    fn test_falls_back_through_qualifiers() {
        let store = MemoryStore::new();
        store.insert_raw("/cfg/stage01/config_a.yaml", "level: a");

        let resolved = ConfigResolver::new(&store)
            .resolve(Path::new("/cfg"), "stage01", "config_a_b_c.yaml")
            .unwrap();

        assert_eq!(resolved.value.document.get("level"), Some(&Value::from("a")));
        assert_eq!(
            attempted(&resolved.value),
            vec!["config_a_b_c.yaml", "config_a_b.yaml", "config_a.yaml"]
        );
        assert_eq!(
            resolved.value.path.as_deref(),
            Some(Path::new("/cfg/stage01/config_a.yaml"))
        );
        assert_eq!(resolved.diagnostics.count(DiagnosticKind::ResolutionFallback), 2);
    }

    #[test]
    fn test_variant_dropped_only_after_chain_exhausted() {
        let store = MemoryStore::new();
        store.insert_raw("/cfg/stage01/config_a.yaml", "level: a");
        store.insert_raw("/cfg/stage01/config|v.yaml", "level: base-variant");

        let resolved = ConfigResolver::new(&store)
            .resolve(Path::new("/cfg"), "stage01", "config_a|v.yaml")
            .unwrap();

        assert_eq!(
            resolved.value.document.get("level"),
            Some(&Value::from("base-variant"))
        );
        assert_eq!(attempted(&resolved.value), vec!["config_a|v.yaml", "config|v.yaml"]);
    }

    #[test]
    fn test_empty_variant_file_found_literally() {
        let store = MemoryStore::new();
        store.insert_raw("/cfg/stage01/config_a|.yaml", "level: literal");
        store.insert_raw("/cfg/stage01/config.yaml", "level: base");

        let resolved = ConfigResolver::new(&store)
            .resolve(Path::new("/cfg"), "stage01", "config_a|.yaml")
            .unwrap();

        assert!(resolved.value.is_found());
        assert_eq!(
            resolved.value.matched_name().map(ToString::to_string).as_deref(),
            Some("config_a|.yaml")
        );
        assert_eq!(resolved.value.document.get("level"), Some(&Value::from("literal")));
    }

    #[test]
    fn test_empty_variant_falls_back_to_base() {
        let store = MemoryStore::new();
        store.insert_raw("/cfg/stage01/config.yaml", "level: base");

        let resolved = ConfigResolver::new(&store)
            .resolve(Path::new("/cfg"), "stage01", "config_a|.yaml")
            .unwrap();

        assert_eq!(attempted(&resolved.value), vec!["config_a|.yaml", "config.yaml"]);
        assert_eq!(
            resolved.value.matched_name().map(ToString::to_string).as_deref(),
            Some("config.yaml")
        );
    }

    #[test]
    fn test_variant_free_chain_restarts_from_requested() {
        let store = MemoryStore::new();
        store.insert_raw("/cfg/stage01/config_a.yaml", "level: a");

        let resolved = ConfigResolver::new(&store)
            .resolve(Path::new("/cfg"), "stage01", "config_a|v.yaml")
            .unwrap();

        assert_eq!(resolved.value.document.get("level"), Some(&Value::from("a")));
        assert_eq!(
            attempted(&resolved.value),
            vec!["config_a|v.yaml", "config|v.yaml", "config_a.yaml"]
        );
    }

    #[test]
    fn test_prefers_configs_subdir() {
        let store = MemoryStore::new();
        store.insert_raw("/cfg/stage01/config.yaml", "where: top");
        store.insert_raw("/cfg/stage01/configs/config.yaml", "where: nested");

        let resolver = ConfigResolver::new(&store);
        assert_eq!(
            resolver.search_dir(Path::new("/cfg"), "stage01"),
            Path::new("/cfg/stage01/configs")
        );

        let resolved = resolver
            .resolve(Path::new("/cfg"), "stage01", "config.yaml")
            .unwrap();
        assert_eq!(resolved.value.document.get("where"), Some(&Value::from("nested")));
    }

    #[test]
    fn test_empty_file_behaves_like_missing() {
        let store = MemoryStore::new();
        store.insert_raw("/cfg/s/config_a.yaml", "");
        store.insert_raw("/cfg/s/config_b.yaml", "{}");
        store.insert_raw("/cfg/s/config.yaml", "x: 1");

        let resolver = ConfigResolver::new(&store);
        for requested in ["config_a.yaml", "config_b.yaml", "config_c.yaml"] {
            let resolved = resolver.resolve(Path::new("/cfg"), "s", requested).unwrap();
            assert_eq!(resolved.value.document.get("x"), Some(&Value::from(1)));
            assert_eq!(resolved.value.attempts.len(), 2);
        }
    }

    #[test]
    fn test_exhausted_returns_empty_with_error() {
        let store = MemoryStore::new();
        let resolved = ConfigResolver::new(&store)
            .resolve(Path::new("/cfg"), "stage01", "config_a|v.yaml")
            .unwrap();

        assert!(!resolved.value.is_found());
        assert!(resolved.value.document.is_empty());
        let exhausted = resolved.diagnostics.of_kind(DiagnosticKind::ResolutionExhausted);
        assert_eq!(exhausted.len(), 1);
        assert_eq!(exhausted[0].context_value("stage"), Some("stage01"));
    }

    #[test]
    fn test_attempt_counts_against_store() {
        let mut store = MockDocumentStore::new();
        store.expect_is_dir().return_const(false);
        store.expect_load().times(4).returning(|_| Ok(None));

        let resolved = ConfigResolver::new(&store)
            .resolve(Path::new("/cfg"), "stage01", "config_a_b_c.yaml")
            .unwrap();
        assert_eq!(resolved.value.attempts.len(), 4);

        let mut store = MockDocumentStore::new();
        store.expect_is_dir().return_const(false);
        store.expect_load().times(6).returning(|_| Ok(None));

        let resolved = ConfigResolver::new(&store)
            .resolve(Path::new("/cfg"), "stage01", "config_a_b|v.yaml")
            .unwrap();
        assert_eq!(resolved.value.attempts.len(), 6);
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let store = MemoryStore::new();
        store.insert_raw("/cfg/s/config.yaml", "a: [1, 2]\nb: {c: d}\n");

        let resolver = ConfigResolver::new(&store);
        let first = resolver.resolve(Path::new("/cfg"), "s", "config_x.yaml").unwrap();
        let second = resolver.resolve(Path::new("/cfg"), "s", "config_x.yaml").unwrap();
        assert_eq!(first.value, second.value);
    }

    #[test]
    fn test_invalid_requested_name() {
        let store = MemoryStore::new();
        assert!(ConfigResolver::new(&store)
            .resolve(Path::new("/cfg"), "s", "")
            .is_err());
    }
}
