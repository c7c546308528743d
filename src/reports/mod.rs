//! Report generation for comparison runs.
//!
//! This module provides multiple output formats for a [`Comparison`]:
//! - Summary: totals per accounting type, for terminals
//! - Count: a single integer, for scripts
//! - JSON: structured data for programmatic integration
//! - Redline: plain-text redlines with `-`/`+` prefixes
//! - HTML: a self-contained, browsable redline report
//!
//! # Security
//!
//! The `escape` module provides utilities for safe output generation.
//! Source text and file names are escaped before they are embedded in HTML.

pub mod escape;
mod html;
mod json;
mod redline;
mod summary;
mod types;

pub use html::HtmlReporter;
pub use json::JsonReporter;
pub use redline::RedlineReporter;
pub use summary::{CountReporter, SummaryReporter};
pub use types::{ReportConfig, ReportFormat, ReportMetadata};

use crate::aggregate::Comparison;
use std::io::Write;
use thiserror::Error;

/// Errors that can occur during report generation
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Format error: {0}")]
    FormatError(#[from] std::fmt::Error),
}

impl From<serde_json::Error> for ReportError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

/// Trait for report generators
pub trait ReportGenerator {
    /// Generate a report for a comparison run
    fn generate(&self, comparison: &Comparison, config: &ReportConfig)
        -> Result<String, ReportError>;

    /// Write report to a writer
    fn write_report(
        &self,
        comparison: &Comparison,
        config: &ReportConfig,
        writer: &mut dyn Write,
    ) -> Result<(), ReportError> {
        let report = self.generate(comparison, config)?;
        writer.write_all(report.as_bytes())?;
        Ok(())
    }

    /// Get the format this generator produces
    fn format(&self) -> ReportFormat;
}

/// Create a report generator for the given format
#[must_use]
pub fn create_reporter(format: ReportFormat) -> Box<dyn ReportGenerator> {
    create_reporter_with_options(format, true)
}

/// Create a report generator with color control
#[must_use]
pub fn create_reporter_with_options(
    format: ReportFormat,
    use_color: bool,
) -> Box<dyn ReportGenerator> {
    match format {
        ReportFormat::Auto | ReportFormat::Summary => {
            if use_color {
                Box::new(SummaryReporter::new())
            } else {
                Box::new(SummaryReporter::new().no_color())
            }
        }
        ReportFormat::Count => Box::new(CountReporter),
        ReportFormat::Json => Box::new(JsonReporter::new()),
        ReportFormat::Redline => {
            if use_color {
                Box::new(RedlineReporter::new())
            } else {
                Box::new(RedlineReporter::new().no_color())
            }
        }
        ReportFormat::Html => Box::new(HtmlReporter::new()),
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::aggregate::{Comparison, FileOutcome};
    use crate::analysis::{AnalysisOptions, DiffAnalyzer, VersionInput};
    use crate::filter::FilterRegistry;

    /// A run with one file of every outcome.
    ///
    /// Totals: Base 2, Deleted 1, Modified 1, Added 1; one file each
    /// added, modified, deleted, skipped and failed.
    pub(crate) fn sample_comparison() -> Comparison {
        let registry = FilterRegistry::builtin().expect("builtin filters");
        let analyzer = DiffAnalyzer::new(&registry, AnalysisOptions::default());
        let analyze = |name: &str, before: VersionInput, after: VersionInput| {
            let result = analyzer
                .analyze_file(name, &[before, after])
                .expect("analysis succeeds")
                .expect("files differ");
            FileOutcome::Analyzed(result)
        };

        Comparison::new(vec![
            analyze(
                "src/main.c",
                VersionInput::new("before", "int main() {\n\treturn 0; // ok\n}\n"),
                VersionInput::new("after", "int main() {\n\treturn 1; // ok\n}\n"),
            ),
            analyze(
                "src/new.c",
                VersionInput::absent("before"),
                VersionInput::new("after", "int x;\n"),
            ),
            analyze(
                "old.sh",
                VersionInput::new("before", "echo <hi>\n"),
                VersionInput::absent("after"),
            ),
            FileOutcome::Skipped {
                path: "same.txt".to_string(),
            },
            FileOutcome::Failed {
                path: "blob.bin".to_string(),
                error: "binary content".to_string(),
            },
        ])
    }
}
