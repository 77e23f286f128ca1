//! In-memory store used by tests and dry runs.

use super::{ConfigDocument, DocumentStore};
use crate::errors::StoreError;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Keeps raw document text keyed by path.
///
/// Text is parsed on every load, so empty or malformed content behaves as it
/// would on disk.
#[derive(Debug, Default)]
pub struct MemoryStore {
    files: RwLock<BTreeMap<PathBuf, String>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Puts raw text at `path`.
    pub fn insert_raw(&self, path: impl Into<PathBuf>, text: impl Into<String>) {
        self.files.write().insert(path.into(), text.into());
    }

    /// Returns the raw text at `path`.
    #[must_use]
    pub fn raw(&self, path: &Path) -> Option<String> {
        self.files.read().get(path).cloned()
    }

    /// Returns true if a file exists at `path`.
    #[must_use]
    pub fn exists(&self, path: &Path) -> bool {
        self.files.read().contains_key(path)
    }

    /// Returns all stored paths.
    #[must_use]
    pub fn paths(&self) -> Vec<PathBuf> {
        self.files.read().keys().cloned().collect()
    }
}

impl DocumentStore for MemoryStore {
    fn load(&self, path: &Path) -> Result<Option<ConfigDocument>, StoreError> {
        match self.files.read().get(path) {
            Some(text) => ConfigDocument::from_yaml_str(text, path),
            None => Ok(None),
        }
    }

    fn save(&self, path: &Path, document: &ConfigDocument) -> Result<(), StoreError> {
        let text = document.to_yaml_string(path)?;
        self.files.write().insert(path.to_path_buf(), text);
        Ok(())
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.files
            .read()
            .keys()
            .any(|p| p != path && p.starts_with(path))
    }
}
