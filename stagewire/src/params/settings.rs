//! Settings objects parameters are selected from.

use super::ParameterSet;
use crate::errors::StagewireError;
use crate::store::ConfigDocument;
use serde::Serialize;
use serde_yaml::Value;

/// Anything that can enumerate keys and look values up.
pub trait SettingsSource {
    /// Looks a key up verbatim.
    fn lookup(&self, key: &str) -> Option<&Value>;

    /// Returns all keys.
    fn keys(&self) -> Vec<String>;

    /// Looks a key up verbatim, then in its upper-case form.
    ///
    /// Stage configs conventionally use upper-case keys while scripts take
    /// lower-case flags, so `select("event_name")` finds `EVENT_NAME`.
    fn select(&self, key: &str) -> Option<&Value> {
        self.lookup(key)
            .or_else(|| self.lookup(&key.to_uppercase()))
    }
}

impl SettingsSource for ConfigDocument {
    fn lookup(&self, key: &str) -> Option<&Value> {
        self.get(key)
    }

    fn keys(&self) -> Vec<String> {
        Self::keys(self)
    }
}

impl SettingsSource for ParameterSet {
    fn lookup(&self, key: &str) -> Option<&Value> {
        self.get(key)
    }

    fn keys(&self) -> Vec<String> {
        Self::keys(self)
    }
}

/// A settings object: either a raw config document or a flattened namespace.
#[derive(Debug, Clone, PartialEq)]
pub enum Settings {
    /// A config document as loaded from a file.
    Document(ConfigDocument),
    /// Named fields of a typed settings object.
    Namespace(ParameterSet),
}

impl Settings {
    /// Flattens any serializable struct or map into a namespace.
    pub fn from_serializable<T: Serialize>(value: &T) -> Result<Self, StagewireError> {
        let value = serde_yaml::to_value(value)
            .map_err(|e| StagewireError::InvalidSettings(e.to_string()))?;
        match value {
            Value::Mapping(map) => Ok(Self::Namespace(ParameterSet::from(
                &ConfigDocument::from_mapping(map),
            ))),
            other => Err(StagewireError::InvalidSettings(format!(
                "expected a mapping-like settings object, got {other:?}"
            ))),
        }
    }
}

impl SettingsSource for Settings {
    fn lookup(&self, key: &str) -> Option<&Value> {
        match self {
            Self::Document(doc) => doc.lookup(key),
            Self::Namespace(fields) => fields.lookup(key),
        }
    }

    fn keys(&self) -> Vec<String> {
        match self {
            Self::Document(doc) => SettingsSource::keys(doc),
            Self::Namespace(fields) => SettingsSource::keys(fields),
        }
    }
}

impl From<ConfigDocument> for Settings {
    fn from(document: ConfigDocument) -> Self {
        Self::Document(document)
    }
}

impl From<ParameterSet> for Settings {
    fn from(fields: ParameterSet) -> Self {
        Self::Namespace(fields)
    }
}
