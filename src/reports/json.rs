//! JSON report generator.

use super::{ReportConfig, ReportError, ReportFormat, ReportGenerator};
use crate::aggregate::{AggregateCounts, Comparison, FileOutcome, FileTally};
use crate::analysis::{AccountingType, DiffFragment, DiffResult, FileChangeType};
use crate::diff::MergeClass;
use indexmap::IndexMap;
use serde::Serialize;
use std::ops::Range;

/// JSON report generator
pub struct JsonReporter {
    /// Whether to only include totals
    summary_only: bool,
    /// Pretty print output
    pretty: bool,
}

impl JsonReporter {
    /// Create a new JSON reporter
    #[must_use]
    pub const fn new() -> Self {
        Self {
            summary_only: false,
            pretty: true,
        }
    }

    /// Create a summary-only reporter
    #[must_use]
    pub const fn summary_only() -> Self {
        Self {
            summary_only: true,
            pretty: true,
        }
    }

    /// Set pretty printing
    #[must_use]
    pub const fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for JsonReporter {
    fn generate(
        &self,
        comparison: &Comparison,
        config: &ReportConfig,
    ) -> Result<String, ReportError> {
        let report = JsonComparisonReport {
            metadata: JsonReportMetadata {
                tool: ToolInfo {
                    name: "loc-diff",
                    version: env!("CARGO_PKG_VERSION"),
                },
                generated_at: config.metadata.generated_at_rfc3339(),
                roots: &config.metadata.roots,
                options: config.metadata.options.as_deref(),
            },
            totals: JsonTotals::from(comparison.totals()),
            files: if self.summary_only {
                None
            } else {
                Some(comparison.outcomes().iter().map(JsonFile::from).collect())
            },
        };

        let json = if self.pretty {
            serde_json::to_string_pretty(&report)
        } else {
            serde_json::to_string(&report)
        }?;

        Ok(json)
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Json
    }
}

// JSON report structures

#[derive(Serialize)]
struct JsonComparisonReport<'a> {
    metadata: JsonReportMetadata<'a>,
    totals: JsonTotals,
    #[serde(skip_serializing_if = "Option::is_none")]
    files: Option<Vec<JsonFile<'a>>>,
}

#[derive(Serialize)]
struct JsonReportMetadata<'a> {
    tool: ToolInfo,
    generated_at: String,
    roots: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<&'a str>,
}

#[derive(Serialize)]
struct ToolInfo {
    name: &'static str,
    version: &'static str,
}

#[derive(Serialize)]
struct JsonTotals {
    lines: IndexMap<AccountingType, usize>,
    new_and_changed: usize,
    files: FileTally,
    skipped: usize,
    failed: usize,
}

impl From<&AggregateCounts> for JsonTotals {
    fn from(totals: &AggregateCounts) -> Self {
        Self {
            lines: totals.lines.as_map(),
            new_and_changed: totals.lines.new_and_changed(),
            files: totals.files,
            skipped: totals.skipped,
            failed: totals.failed,
        }
    }
}

#[derive(Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
enum JsonFile<'a> {
    Analyzed {
        path: &'a str,
        filter: &'a str,
        change_type: FileChangeType,
        versions: &'a [String],
        counts: IndexMap<AccountingType, usize>,
        fragments: Vec<JsonFragment<'a>>,
    },
    Skipped {
        path: &'a str,
    },
    Failed {
        path: &'a str,
        error: &'a str,
    },
}

impl<'a> From<&'a FileOutcome> for JsonFile<'a> {
    fn from(outcome: &'a FileOutcome) -> Self {
        match outcome {
            FileOutcome::Analyzed(result) => analyzed(result),
            FileOutcome::Skipped { path } => Self::Skipped { path },
            FileOutcome::Failed { path, error } => Self::Failed { path, error },
        }
    }
}

fn analyzed(result: &DiffResult) -> JsonFile<'_> {
    JsonFile::Analyzed {
        path: result.file_name(),
        filter: result.filter_name(),
        change_type: result.change_type(),
        versions: result.version_labels(),
        counts: result.counts().as_map(),
        fragments: result.fragments().iter().map(JsonFragment::from).collect(),
    }
}

#[derive(Serialize)]
struct JsonFragment<'a> {
    classification: AccountingType,
    #[serde(skip_serializing_if = "Option::is_none")]
    origin: Option<MergeClass>,
    text: &'a str,
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    comment_spans: &'a [Range<usize>],
}

impl<'a> From<&'a DiffFragment> for JsonFragment<'a> {
    fn from(fragment: &'a DiffFragment) -> Self {
        Self {
            classification: fragment.classification,
            origin: fragment.origin,
            text: fragment.text(),
            comment_spans: fragment.comment_spans(),
        }
    }
}
