//! Reading a stage's declared output.

use super::WiringOptions;
use crate::diagnostics::{Diagnostic, DiagnosticKind, Diagnostics, Reported};
use crate::store::DocumentStore;
use serde_yaml::Value;
use std::path::Path;

/// Reads the output file name `stage` declares in its temporary config.
///
/// Returns `None` (with a diagnostic) if the config cannot be loaded, does not
/// define the output namespace key, or defines it as something other than a
/// string.
pub fn read_stage_output(
    store: &dyn DocumentStore,
    output_dir: &Path,
    stage: &str,
    options: &WiringOptions,
) -> Reported<Option<String>> {
    let mut diagnostics = Diagnostics::new();
    let path = options.temp_config_path(output_dir, stage);
    let namespace = options.output_namespace.as_str();

    let document = match store.load(&path) {
        Ok(Some(document)) => document,
        Ok(None) | Err(_) => {
            diagnostics.push(
                Diagnostic::new(
                    DiagnosticKind::EmptyOrUnparsableDocument,
                    format!(
                        "config file {} can not be loaded! Skipping reading stage output.",
                        path.display()
                    ),
                )
                .with_context("stage", stage)
                .with_context("path", path.display()),
            );
            return Reported::new(None, diagnostics);
        }
    };

    let output = match document.get(namespace) {
        Some(Value::String(name)) => Some(name.clone()),
        None | Some(Value::Null) => {
            diagnostics.push(
                Diagnostic::new(
                    DiagnosticKind::NamespaceKeyMissing,
                    format!("config file of stage {stage} does not define {namespace}!"),
                )
                .with_context("stage", stage)
                .with_context("key", namespace),
            );
            None
        }
        Some(other) => {
            diagnostics.push(
                Diagnostic::new(
                    DiagnosticKind::InvalidNamespaceValue,
                    format!("{namespace} of stage {stage} must be a file name, got {other:?}"),
                )
                .with_context("stage", stage)
                .with_context("key", namespace),
            );
            None
        }
    };

    Reported::new(output, diagnostics)
}
