//! Analysis stage.
//!
//! Reads every version of every source file and analyzes the files in
//! parallel. A file that cannot be read or decoded is recorded as failed and
//! the run continues.

use super::SourceFile;
use crate::aggregate::{Comparison, FileOutcome};
use crate::analysis::{AnalysisOptions, DiffAnalyzer, VersionInput};
use crate::filter::FilterRegistry;
use rayon::prelude::*;

/// Analyze all sources and collect their outcomes, sorted by path.
///
/// `labels` names the versions, one per root.
pub fn compare_sources(
    sources: &[SourceFile],
    labels: &[String],
    registry: &FilterRegistry,
    options: &AnalysisOptions,
    quiet: bool,
) -> Comparison {
    let analyzer = DiffAnalyzer::new(registry, options.clone());

    if !quiet {
        tracing::info!("Analyzing {} files...", sources.len());
    }

    let outcomes: Vec<FileOutcome> = sources
        .par_iter()
        .map(|source| analyze_source(&analyzer, source, labels))
        .collect();

    let comparison = Comparison::new(outcomes);
    let totals = comparison.totals();
    if !quiet {
        tracing::info!(
            "Compared {} files: {} base, {} deleted, {} modified, {} added ({} skipped, {} failed)",
            totals.files_seen(),
            totals.lines.base,
            totals.lines.deleted,
            totals.lines.modified,
            totals.lines.added,
            totals.skipped,
            totals.failed
        );
    }
    comparison
}

fn analyze_source(analyzer: &DiffAnalyzer<'_>, source: &SourceFile, labels: &[String]) -> FileOutcome {
    let mut inputs = Vec::with_capacity(source.versions.len());
    for (index, location) in source.versions.iter().enumerate() {
        let label = labels
            .get(index)
            .cloned()
            .unwrap_or_else(|| format!("v{}", index + 1));
        let input = match location {
            Some(path) => match std::fs::read(path) {
                Ok(bytes) => VersionInput::new(label, bytes),
                Err(e) => {
                    tracing::warn!("Cannot read {}: {}", path.display(), e);
                    return FileOutcome::Failed {
                        path: source.path.clone(),
                        error: format!("cannot read {}: {e}", path.display()),
                    };
                }
            },
            None => VersionInput::absent(label),
        };
        inputs.push(input);
    }

    match analyzer.analyze_file(&source.path, &inputs) {
        Ok(Some(result)) => {
            tracing::debug!(
                "{}: {} ({} base, {} deleted, {} modified, {} added)",
                source.path,
                result.change_type(),
                result.counts().base,
                result.counts().deleted,
                result.counts().modified,
                result.counts().added
            );
            FileOutcome::Analyzed(result)
        }
        Ok(None) => FileOutcome::Skipped {
            path: source.path.clone(),
        },
        Err(e) => {
            let error = error_chain(&e);
            tracing::warn!("Skipping {}: {}", source.path, error);
            FileOutcome::Failed {
                path: source.path.clone(),
                error,
            }
        }
    }
}

/// An error and its sources joined with `: `.
fn error_chain(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
