//! Report output stage.
//!
//! Turns a finished comparison into the configured report and writes it to
//! the configured destination.

use crate::aggregate::Comparison;
use crate::config::CompareConfig;
use crate::reports::{create_reporter_with_options, ReportConfig, ReportMetadata};
use anyhow::Result;

use super::{auto_detect_format, should_use_color, write_output, OutputTarget};

/// Build the report configuration for a run.
#[must_use]
pub fn report_config(config: &CompareConfig) -> ReportConfig {
    let mut metadata = ReportMetadata::new(
        config
            .versions
            .iter()
            .map(|path| path.display().to_string())
            .collect(),
    );
    metadata.options.clone_from(&config.option_string);

    ReportConfig {
        title: None,
        tab_width: config.analysis.tab_width,
        include_unchanged: !config.analysis.skip_identical,
        metadata,
    }
}

/// Output a comparison report to the configured destination.
pub fn output_report(config: &CompareConfig, comparison: &Comparison) -> Result<()> {
    let output_target = OutputTarget::from_option(config.output.file.clone());
    let effective_output = auto_detect_format(config.output.format, &output_target);
    let use_color = should_use_color(config.output.no_color) && output_target.is_terminal();

    tracing::debug!("Writing {} report", effective_output);
    let reporter = create_reporter_with_options(effective_output, use_color);
    let report = reporter.generate(comparison, &report_config(config))?;

    write_output(&report, &output_target, config.behavior.quiet)
}
