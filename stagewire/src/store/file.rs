//! Filesystem-backed YAML store.

use super::{ConfigDocument, DocumentStore};
use crate::errors::StoreError;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::debug;

/// Stores documents as YAML files on the local filesystem.
///
/// Saving rewrites the whole file; comments in the original file are lost.
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlFileStore;

impl YamlFileStore {
    /// Creates a new file store.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl DocumentStore for YamlFileStore {
    fn load(&self, path: &Path) -> Result<Option<ConfigDocument>, StoreError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "Config file does not exist");
                return Ok(None);
            }
            Err(e) => return Err(StoreError::io(path, e)),
        };
        ConfigDocument::from_yaml_str(&text, path)
    }

    fn save(&self, path: &Path, document: &ConfigDocument) -> Result<(), StoreError> {
        let text = document.to_yaml_string(path)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
        }
        fs::write(path, text).map_err(|e| StoreError::io(path, e))?;
        debug!(path = %path.display(), keys = document.len(), "Wrote config file");
        Ok(())
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_yaml::Value;

    #[test]
    fn test_missing_file_is_no_document() {
        let dir = tempfile::tempdir().unwrap();
        let store = YamlFileStore::new();
        assert!(store.load(&dir.path().join("absent.yaml")).unwrap().is_none());
    }

    #[test]
    fn test_empty_file_is_no_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "").unwrap();

        assert!(YamlFileStore::new().load(&path).unwrap().is_none());
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("stage01").join("temp_config.yaml");
        let store = YamlFileStore::new();

        let mut doc = ConfigDocument::new();
        doc.insert("STAGE_OUTPUT", "result.nix");
        store.save(&path, &doc).unwrap();

        let loaded = store.load(&path).unwrap().unwrap();
        assert_eq!(loaded.get("STAGE_OUTPUT"), Some(&Value::from("result.nix")));
        assert!(store.is_dir(&dir.path().join("out").join("stage01")));
    }

    #[test]
    fn test_save_overwrites_whole_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "# a comment\nold: 1\n").unwrap();

        let doc: ConfigDocument = [("new", 2)].into_iter().collect();
        YamlFileStore::new().save(&path, &doc).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(!text.contains("old"));
        assert!(!text.contains("comment"));
        assert!(text.contains("new: 2"));
    }

    #[test]
    fn test_unparsable_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "key: [unclosed\n").unwrap();

        let err = YamlFileStore::new().load(&path).unwrap_err();
        assert!(err.is_content_error());
    }
}
