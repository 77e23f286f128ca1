//! Structured diagnostics returned alongside every operation result.
//!
//! Operations never log into a process-wide channel only: each one returns a
//! [`Reported`] value carrying the diagnostics it produced, so callers (and
//! tests) can inspect warnings without capturing output streams. Recording a
//! diagnostic also emits a `tracing` event at the matching level.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{error, info, warn};

/// Severity of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Expected, informational condition.
    Info,
    /// Degraded but recoverable condition.
    Warning,
    /// A failed lookup that fell back to a default value.
    Error,
}

/// What a diagnostic is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// A config candidate was not found and a less specific name is tried next.
    ResolutionFallback,
    /// Every candidate config name was tried without success.
    ResolutionExhausted,
    /// A document was empty or could not be parsed.
    EmptyOrUnparsableDocument,
    /// A document lacks the expected namespace key.
    NamespaceKeyMissing,
    /// A namespace key holds a value of the wrong shape.
    InvalidNamespaceValue,
    /// A stage's declared output could not be read, so wiring was skipped.
    OutputUnavailable,
    /// A requested parameter is not present in the settings.
    ParameterMissing,
    /// A reserved key was dropped from a dynamic source.
    ReservedKeyDropped,
    /// Two sources disagree on a parameter value.
    ParameterConflict,
    /// A config update was skipped.
    ConfigUpdateFailure,
}

impl DiagnosticKind {
    /// The severity this kind is reported with.
    #[must_use]
    pub const fn severity(self) -> Severity {
        match self {
            Self::ResolutionFallback | Self::ParameterMissing => Severity::Info,
            Self::EmptyOrUnparsableDocument
            | Self::OutputUnavailable
            | Self::ReservedKeyDropped
            | Self::ParameterConflict
            | Self::ConfigUpdateFailure => Severity::Warning,
            Self::ResolutionExhausted
            | Self::NamespaceKeyMissing
            | Self::InvalidNamespaceValue => Severity::Error,
        }
    }

    /// Stable string name, e.g. `"parameter_conflict"`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ResolutionFallback => "resolution_fallback",
            Self::ResolutionExhausted => "resolution_exhausted",
            Self::EmptyOrUnparsableDocument => "empty_or_unparsable_document",
            Self::NamespaceKeyMissing => "namespace_key_missing",
            Self::InvalidNamespaceValue => "invalid_namespace_value",
            Self::OutputUnavailable => "output_unavailable",
            Self::ParameterMissing => "parameter_missing",
            Self::ReservedKeyDropped => "reserved_key_dropped",
            Self::ParameterConflict => "parameter_conflict",
            Self::ConfigUpdateFailure => "config_update_failure",
        }
    }
}

/// A single diagnostic event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// What happened.
    pub kind: DiagnosticKind,
    /// How bad it is.
    pub severity: Severity,
    /// Human readable message.
    pub message: String,
    /// Additional key-value context (stage, key, path, ...).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub context: BTreeMap<String, String>,
    /// When the diagnostic was recorded.
    pub recorded_at: DateTime<Utc>,
}

impl Diagnostic {
    /// Creates a diagnostic with the kind's default severity.
    #[must_use]
    pub fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: kind.severity(),
            message: message.into(),
            context: BTreeMap::new(),
            recorded_at: Utc::now(),
        }
    }

    /// Adds a context entry.
    #[must_use]
    pub fn with_context(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.context.insert(key.into(), value.to_string());
        self
    }

    /// Gets a context entry.
    #[must_use]
    pub fn context_value(&self, key: &str) -> Option<&str> {
        self.context.get(key).map(String::as_str)
    }

    fn emit(&self) {
        let kind = self.kind.as_str();
        match self.severity {
            Severity::Info => info!(kind, context = ?self.context, "{}", self.message),
            Severity::Warning => warn!(kind, context = ?self.context, "{}", self.message),
            Severity::Error => error!(kind, context = ?self.context, "{}", self.message),
        }
    }
}

/// An ordered collection of diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a diagnostic and emits it as a tracing event.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        diagnostic.emit();
        self.entries.push(diagnostic);
    }

    /// Appends diagnostics that were already emitted elsewhere.
    pub fn extend(&mut self, other: Self) {
        self.entries.extend(other.entries);
    }

    /// Adds a context entry to every recorded diagnostic.
    pub fn annotate(&mut self, key: &str, value: &str) {
        for diagnostic in &mut self.entries {
            diagnostic
                .context
                .insert(key.to_string(), value.to_string());
        }
    }

    /// Iterates over the diagnostics in recording order.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    /// Returns the number of diagnostics.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns all diagnostics of one kind.
    #[must_use]
    pub fn of_kind(&self, kind: DiagnosticKind) -> Vec<&Diagnostic> {
        self.entries.iter().filter(|d| d.kind == kind).collect()
    }

    /// Counts the diagnostics of one kind.
    #[must_use]
    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.entries.iter().filter(|d| d.kind == kind).count()
    }

    /// True if a diagnostic of this kind was recorded.
    #[must_use]
    pub fn contains(&self, kind: DiagnosticKind) -> bool {
        self.entries.iter().any(|d| d.kind == kind)
    }

    /// Returns diagnostics at or above a severity.
    #[must_use]
    pub fn at_least(&self, severity: Severity) -> Vec<&Diagnostic> {
        self.entries.iter().filter(|d| d.severity >= severity).collect()
    }

    /// True if any error-level diagnostic was recorded.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.entries.iter().any(|d| d.severity == Severity::Error)
    }

    /// Exports the diagnostics as a JSON array.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(&self.entries).unwrap_or(serde_json::Value::Null)
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// A value together with the diagnostics produced while computing it.
#[derive(Debug, Clone, PartialEq)]
pub struct Reported<T> {
    /// The primary result.
    pub value: T,
    /// What happened along the way.
    pub diagnostics: Diagnostics,
}

impl<T> Reported<T> {
    /// Wraps a value with its diagnostics.
    #[must_use]
    pub const fn new(value: T, diagnostics: Diagnostics) -> Self {
        Self { value, diagnostics }
    }

    /// Wraps a value that produced no diagnostics.
    #[must_use]
    pub fn clean(value: T) -> Self {
        Self::new(value, Diagnostics::new())
    }

    /// Maps the value, keeping the diagnostics.
    #[must_use]
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Reported<U> {
        Reported::new(f(self.value), self.diagnostics)
    }

    /// Moves the diagnostics into `sink` and returns the value.
    pub fn collect_into(self, sink: &mut Diagnostics) -> T {
        sink.extend(self.diagnostics);
        self.value
    }

    /// Splits into value and diagnostics.
    #[must_use]
    pub fn into_parts(self) -> (T, Diagnostics) {
        (self.value, self.diagnostics)
    }
}
