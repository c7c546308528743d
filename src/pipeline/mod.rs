//! Pipeline orchestration for comparison runs.
//!
//! This module provides shared orchestration logic for the
//! collect → analyze → report workflow used by the CLI command handlers.

mod diff_stage;
mod output;
mod report_stage;
mod sources;

pub use diff_stage::compare_sources;
pub use output::{auto_detect_format, should_use_color, write_output, OutputTarget};
pub use report_stage::{output_report, report_config};
pub use sources::{collect_files, pair_sources, probe_case_sensitivity, resolve_sources, SourceFile};

use std::path::PathBuf;

/// Structured pipeline error types for better diagnostics.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// A root could not be read or paired
    #[error("Cannot collect sources from {}: {message}", path.display())]
    SourcesFailed { path: PathBuf, message: String },

    /// Report generation or output failed
    #[error("Report failed: {source}")]
    ReportFailed {
        #[source]
        source: anyhow::Error,
    },
}

/// Exit codes for CI/CD integration
pub mod exit_codes {
    /// Success - no changes detected (or no --fail-on-change)
    pub const SUCCESS: i32 = 0;
    /// Changes were detected
    pub const CHANGES_DETECTED: i32 = 1;
    /// An error occurred
    pub const ERROR: i32 = 3;
}
