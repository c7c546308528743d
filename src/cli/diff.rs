//! Diff command handlers.
//!
//! Implements the `diff` subcommand (two files or trees) and the `diff3`
//! subcommand (base, A and B).

use crate::aggregate::Comparison;
use crate::config::CompareConfig;
use crate::filter::FilterRegistry;
use crate::pipeline::{compare_sources, exit_codes, output_report, resolve_sources, PipelineError};
use anyhow::Result;

/// Labels given to the versions of a run, oldest first.
#[must_use]
pub fn version_labels(count: usize) -> Vec<String> {
    match count {
        2 => vec!["before".to_string(), "after".to_string()],
        3 => vec!["base".to_string(), "a".to_string(), "b".to_string()],
        n => (1..=n).map(|i| format!("v{i}")).collect(),
    }
}

/// Run a comparison, returning the desired exit code.
///
/// The caller is responsible for calling `std::process::exit()` with the
/// returned code when it is non-zero.
#[allow(clippy::needless_pass_by_value)]
pub fn run_diff(config: CompareConfig, registry: &FilterRegistry) -> Result<i32> {
    if config.versions.len() < 2 {
        anyhow::bail!(
            "at least two versions are required, got {}",
            config.versions.len()
        );
    }

    let quiet = config.behavior.quiet;
    if !quiet {
        tracing::info!(
            "Comparing {}",
            config
                .versions
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(" → ")
        );
    }

    let sources = resolve_sources(&config.versions)?;
    let labels = version_labels(config.versions.len());
    let comparison = compare_sources(&sources, &labels, registry, &config.analysis, quiet);

    output_report(&config, &comparison)
        .map_err(|source| PipelineError::ReportFailed { source })?;

    Ok(determine_exit_code(&config, &comparison))
}

/// Determine the exit code from the comparison and config flags.
#[must_use]
pub fn determine_exit_code(config: &CompareConfig, comparison: &Comparison) -> i32 {
    if config.behavior.fail_on_change && comparison.totals().has_changes() {
        return exit_codes::CHANGES_DETECTED;
    }
    exit_codes::SUCCESS
}
