//! The key-value config document.

use crate::errors::StoreError;
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use std::path::Path;

/// A structured config document: a mapping from keys to YAML values.
///
/// Key order is preserved on load and save.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigDocument {
    map: Mapping,
}

impl ConfigDocument {
    /// Creates an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an existing mapping.
    #[must_use]
    pub const fn from_mapping(map: Mapping) -> Self {
        Self { map }
    }

    /// Parses YAML text.
    ///
    /// Returns `Ok(None)` when the text holds no document at all (empty,
    /// comments only, or an explicit null). `path` is only used for error
    /// messages.
    pub fn from_yaml_str(text: &str, path: &Path) -> Result<Option<Self>, StoreError> {
        if is_blank_yaml(text) {
            return Ok(None);
        }

        let value: Value =
            serde_yaml::from_str(text).map_err(|e| StoreError::parse(path, e.to_string()))?;

        match value {
            Value::Null => Ok(None),
            Value::Mapping(map) => Ok(Some(Self { map })),
            _ => Err(StoreError::NotAMapping {
                path: path.to_path_buf(),
            }),
        }
    }

    /// Renders the document as block-style YAML.
    pub fn to_yaml_string(&self, path: &Path) -> Result<String, StoreError> {
        serde_yaml::to_string(&self.map).map_err(|e| StoreError::Serialize {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Gets a value by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.map.get(key)
    }

    /// Checks whether a key is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    /// Inserts or overwrites a value, returning the previous one.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.map.insert(Value::String(key.into()), value.into())
    }

    /// Removes a key.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.map.remove(key)
    }

    /// Overwrites this document's entries with those of `other`.
    pub fn update(&mut self, other: &Self) {
        for (key, value) in &other.map {
            self.map.insert(key.clone(), value.clone());
        }
    }

    /// Iterates over entries whose key is representable as a string.
    pub fn entries(&self) -> impl Iterator<Item = (String, &Value)> {
        self.map
            .iter()
            .filter_map(|(k, v)| key_to_string(k).map(|k| (k, v)))
    }

    /// Returns the string-representable keys.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.map.keys().filter_map(key_to_string).collect()
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns true if the document has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Borrows the underlying mapping.
    #[must_use]
    pub const fn as_mapping(&self) -> &Mapping {
        &self.map
    }
}

impl From<Mapping> for ConfigDocument {
    fn from(map: Mapping) -> Self {
        Self::from_mapping(map)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for ConfigDocument {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut doc = Self::new();
        for (k, v) in iter {
            doc.insert(k, v);
        }
        doc
    }
}

fn key_to_string(key: &Value) -> Option<String> {
    match key {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn is_blank_yaml(text: &str) -> bool {
    text.lines().map(str::trim).all(|line| {
        line.is_empty() || line.starts_with('#') || line == "---" || line == "..."
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn p() -> &'static Path {
        Path::new("test.yaml")
    }

    #[test]
    fn test_parse_mapping_preserves_order() {
        let doc = ConfigDocument::from_yaml_str("b: 1\na: two\nc: [1, 2]\n", p())
            .unwrap()
            .unwrap();
        assert_eq!(doc.keys(), vec!["b", "a", "c"]);
        assert_eq!(doc.get("a"), Some(&Value::from("two")));
    }

    #[test]
    fn test_blank_and_null_are_no_document() {
        assert!(ConfigDocument::from_yaml_str("", p()).unwrap().is_none());
        assert!(ConfigDocument::from_yaml_str("\n# only a comment\n", p()).unwrap().is_none());
        assert!(ConfigDocument::from_yaml_str("null\n", p()).unwrap().is_none());
        assert!(ConfigDocument::from_yaml_str("~", p()).unwrap().is_none());
    }

    #[test]
    fn test_explicit_empty_mapping_is_a_document() {
        let doc = ConfigDocument::from_yaml_str("{}", p()).unwrap().unwrap();
        assert!(doc.is_empty());
    }

    #[test]
    fn test_scalar_root_rejected() {
        let err = ConfigDocument::from_yaml_str("just a string", p()).unwrap_err();
        assert!(matches!(err, StoreError::NotAMapping { .. }));
    }

    #[test]
    fn test_invalid_yaml_is_parse_error() {
        let err = ConfigDocument::from_yaml_str("a: [1, 2\nb: :", p()).unwrap_err();
        assert!(matches!(err, StoreError::Parse { .. }));
    }

    #[test]
    fn test_update_overwrites_and_appends() {
        let mut doc: ConfigDocument = [("a", 1), ("b", 2)].into_iter().collect();
        let other: ConfigDocument = [("b", 20), ("c", 30)].into_iter().collect();
        doc.update(&other);

        assert_eq!(doc.keys(), vec!["a", "b", "c"]);
        assert_eq!(doc.get("b"), Some(&Value::from(20)));
    }

    #[test]
    fn test_yaml_round_trip_keeps_null() {
        let mut doc = ConfigDocument::new();
        doc.insert("STAGE_INPUT", Value::Null);
        doc.insert("STAGE_OUTPUT", "out.csv");

        let text = doc.to_yaml_string(p()).unwrap();
        let back = ConfigDocument::from_yaml_str(&text, p()).unwrap().unwrap();
        assert_eq!(back, doc);
    }
}
