//! Insertion-ordered parameter set.

use crate::store::ConfigDocument;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_yaml::Value;

/// A mapping from parameter names to values, iterated in insertion order.
///
/// Overwriting an existing key keeps its original position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterSet {
    entries: IndexMap<String, Value>,
}

impl ParameterSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites a value, returning the previous one.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(key.into(), value.into())
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Gets a value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Checks whether a key is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Removes a key, keeping the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.shift_remove(key)
    }

    /// Iterates over entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the keys in insertion order.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for ParameterSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = Self::new();
        for (k, v) in iter {
            set.insert(k, v);
        }
        set
    }
}

impl IntoIterator for ParameterSet {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl From<&ConfigDocument> for ParameterSet {
    fn from(document: &ConfigDocument) -> Self {
        document
            .entries()
            .map(|(k, v)| (k, v.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_overwrite_keeps_position() {
        let mut set: ParameterSet = [("a", 1), ("b", 2), ("c", 3)].into_iter().collect();
        set.insert("a", 10);

        assert_eq!(set.keys(), vec!["a", "b", "c"]);
        assert_eq!(set.get("a"), Some(&Value::from(10)));
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut set: ParameterSet = [("a", 1), ("b", 2), ("c", 3)].into_iter().collect();
        set.remove("a");
        assert_eq!(set.keys(), vec!["b", "c"]);
    }

    #[test]
    fn test_from_document() {
        let doc: ConfigDocument = [("Z", "z"), ("A", "a")].into_iter().collect();
        let set = ParameterSet::from(&doc);
        assert_eq!(set.keys(), vec!["Z", "A"]);
    }
}
