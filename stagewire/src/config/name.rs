//! Config file names and their fallback parents.
//!
//! A config name has the shape `<stem>[_<qualifier>]*[|<variant>]<ext>`, for
//! example `config_highres_fast|mouse.yaml`. Qualifiers are removed from the
//! right to get progressively less specific names; the variant is carried
//! along until the whole qualifier chain is exhausted.

use crate::errors::InvalidConfigNameError;
use std::fmt;
use std::str::FromStr;

const QUALIFIER_DELIMITER: char = '_';
const VARIANT_DELIMITER: char = '|';

/// A parsed config file name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConfigName {
    stem: String,
    qualifiers: Vec<String>,
    variant: Option<String>,
    extension: String,
}

impl ConfigName {
    /// Parses a config file name.
    pub fn parse(name: &str) -> Result<Self, InvalidConfigNameError> {
        if name.is_empty() {
            return Err(InvalidConfigNameError::new(name, "name is empty"));
        }
        if name.contains('/') || name.contains('\\') {
            return Err(InvalidConfigNameError::new(
                name,
                "expected a file name, not a path",
            ));
        }

        let (base, extension) = split_extension(name);
        let (main, variant) = match base.split_once(VARIANT_DELIMITER) {
            Some((main, variant)) => (main, Some(variant)),
            None => (base, None),
        };

        let mut parts = main.split(QUALIFIER_DELIMITER);
        let stem = parts.next().unwrap_or_default();
        if stem.is_empty() {
            return Err(InvalidConfigNameError::new(name, "name has no stem"));
        }

        Ok(Self {
            stem: stem.to_string(),
            qualifiers: parts.map(str::to_string).collect(),
            variant: variant.map(str::to_string),
            extension: extension.to_string(),
        })
    }

    /// The leading segment, usually `config`.
    #[must_use]
    pub fn stem(&self) -> &str {
        &self.stem
    }

    /// The qualifiers, least specific first.
    #[must_use]
    pub fn qualifiers(&self) -> &[String] {
        &self.qualifiers
    }

    /// The variant suffix, if any. An empty suffix (`config_a|.yaml`) is
    /// not a variant.
    #[must_use]
    pub fn variant(&self) -> Option<&str> {
        self.variant.as_deref().filter(|v| !v.is_empty())
    }

    /// The extension including its dot, or an empty string.
    #[must_use]
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// True if the name carries a variant.
    #[must_use]
    pub fn has_variant(&self) -> bool {
        self.variant().is_some()
    }

    /// The next less specific name, with the last qualifier removed.
    ///
    /// Returns `None` once no qualifiers remain; the variant and extension
    /// are kept. An empty variant delimiter is dropped.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        let (_, rest) = self.qualifiers.split_last()?;
        Some(Self {
            qualifiers: rest.to_vec(),
            variant: self.variant().map(str::to_string),
            ..self.clone()
        })
    }

    /// The same name without its variant.
    #[must_use]
    pub fn without_variant(&self) -> Self {
        Self {
            variant: None,
            ..self.clone()
        }
    }

    /// Every candidate name in fallback order, starting with `self`.
    ///
    /// With `n` qualifiers this yields `n + 1` names, or `2 * (n + 1)` when a
    /// variant is present: the full chain with the variant first, then the
    /// full chain without it. A name with an empty variant delimiter is
    /// tried literally before its parents.
    #[must_use]
    pub fn fallback_chain(&self) -> Vec<Self> {
        let mut chain = Vec::with_capacity(2 * (self.qualifiers.len() + 1));
        let walk = |chain: &mut Vec<Self>, start: Self| {
            let mut current = Some(start);
            while let Some(name) = current {
                current = name.parent();
                chain.push(name);
            }
        };

        walk(&mut chain, self.clone());
        if chain.last().is_some_and(|last| last.variant.is_some()) {
            walk(&mut chain, self.without_variant());
        }
        chain
    }
}

impl fmt::Display for ConfigName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.stem)?;
        for qualifier in &self.qualifiers {
            write!(f, "{QUALIFIER_DELIMITER}{qualifier}")?;
        }
        if let Some(variant) = &self.variant {
            write!(f, "{VARIANT_DELIMITER}{variant}")?;
        }
        f.write_str(&self.extension)
    }
}

impl FromStr for ConfigName {
    type Err = InvalidConfigNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Splits off the extension at the last dot, ignoring leading dots.
fn split_extension(name: &str) -> (&str, &str) {
    let leading = name.len() - name.trim_start_matches('.').len();
    match name[leading..].rfind('.') {
        Some(idx) => name.split_at(leading + idx),
        None => (name, ""),
    }
}
