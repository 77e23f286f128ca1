//! Propagating declared outputs into the next stage's input.

use super::{read_stage_output, WiringOptions};
use crate::config::update_config;
use crate::diagnostics::{Diagnostic, DiagnosticKind, Diagnostics, Reported};
use crate::errors::StoreError;
use crate::store::{ConfigDocument, DocumentStore};
use serde_yaml::Value;
use std::path::{Path, PathBuf};
use tracing::info;

/// One established producer-consumer link between consecutive stages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageLink {
    /// The producing stage.
    pub from: String,
    /// The consuming stage.
    pub to: String,
    /// The path written to the consumer's input namespace.
    pub input: PathBuf,
}

/// Chains `stages` in order: each stage's declared output becomes the next
/// stage's input.
///
/// The first stage's input is set to null. For every consecutive pair whose
/// producer declares an output, the consumer's temporary config gets
/// `<output_dir>/<producer>/<declared output>` as its input; pairs without a
/// readable output are skipped with a warning and the consumer's config is
/// left as it was. Documents are always read, updated and rewritten whole.
///
/// Only a failing write is an error.
pub fn wire_stage_inputs<S: AsRef<str>>(
    store: &dyn DocumentStore,
    stages: &[S],
    output_dir: &Path,
    options: &WiringOptions,
) -> Result<Reported<Vec<StageLink>>, StoreError> {
    let mut diagnostics = Diagnostics::new();
    let mut links = Vec::new();

    let Some(first) = stages.first() else {
        return Ok(Reported::clean(links));
    };

    let mut reset = ConfigDocument::new();
    reset.insert(options.input_namespace.clone(), Value::Null);
    update_config(
        store,
        &options.temp_config_path(output_dir, first.as_ref()),
        &reset,
    )?
    .collect_into(&mut diagnostics);

    for pair in stages.windows(2) {
        let (stage, next) = (pair[0].as_ref(), pair[1].as_ref());

        let Some(output_name) =
            read_stage_output(store, output_dir, stage, options).collect_into(&mut diagnostics)
        else {
            diagnostics.push(
                Diagnostic::new(
                    DiagnosticKind::OutputUnavailable,
                    format!(
                        "Could not read stage output for {stage}! \
                         Skipping setting input for subsequent stage."
                    ),
                )
                .with_context("stage", stage)
                .with_context("next", next),
            );
            continue;
        };

        let input = output_dir.join(stage).join(output_name);
        let mut update = ConfigDocument::new();
        update.insert(
            options.input_namespace.clone(),
            input.to_string_lossy().into_owned(),
        );

        let written = update_config(store, &options.temp_config_path(output_dir, next), &update)?
            .collect_into(&mut diagnostics);
        if written {
            info!(from = stage, to = next, input = %input.display(), "Wired stage input");
            links.push(StageLink {
                from: stage.to_string(),
                to: next.to_string(),
                input,
            });
        }
    }

    Ok(Reported::new(links, diagnostics))
}
