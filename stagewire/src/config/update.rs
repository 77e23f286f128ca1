//! Read-mutate-rewrite updates of stored config documents.

use crate::diagnostics::{Diagnostic, DiagnosticKind, Diagnostics, Reported};
use crate::errors::StoreError;
use crate::store::{ConfigDocument, DocumentStore};
use std::path::Path;
use tracing::debug;

/// Merges `updates` into the document at `path` and rewrites it whole.
///
/// If the target is absent, empty or unparsable the update is skipped with a
/// [`DiagnosticKind::ConfigUpdateFailure`] warning and the file is left
/// untouched; the returned value tells whether anything was written. Only a
/// failing write is an error.
pub fn update_config(
    store: &dyn DocumentStore,
    path: &Path,
    updates: &ConfigDocument,
) -> Result<Reported<bool>, StoreError> {
    let mut diagnostics = Diagnostics::new();

    let loaded = match store.load(path) {
        Ok(loaded) => loaded,
        Err(e) => {
            diagnostics.push(
                Diagnostic::new(DiagnosticKind::EmptyOrUnparsableDocument, e.to_string())
                    .with_context("path", path.display()),
            );
            None
        }
    };

    let Some(mut document) = loaded else {
        diagnostics.push(
            Diagnostic::new(
                DiagnosticKind::ConfigUpdateFailure,
                format!(
                    "config file {} can not be loaded! Skipping updating config.",
                    path.display()
                ),
            )
            .with_context("path", path.display()),
        );
        return Ok(Reported::new(false, diagnostics));
    };

    document.update(updates);
    store.save(path, &document)?;
    debug!(path = %path.display(), keys = ?updates.keys(), "Updated config");

    Ok(Reported::new(true, diagnostics))
}
