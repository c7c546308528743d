//! Report type definitions.

use crate::analysis::DEFAULT_TAB_WIDTH;
use chrono::{DateTime, Utc};
use clap::ValueEnum;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Output format for reports
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Summary on a terminal
    #[default]
    Auto,
    /// Totals per accounting type and per file category
    Summary,
    /// A single integer: the total line count
    Count,
    /// Structured JSON output
    Json,
    /// Plain-text redlines with -/+ line prefixes
    Redline,
    /// Self-contained HTML redline report
    Html,
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Summary => write!(f, "summary"),
            Self::Count => write!(f, "count"),
            Self::Json => write!(f, "json"),
            Self::Redline => write!(f, "redline"),
            Self::Html => write!(f, "html"),
        }
    }
}

/// Configuration for report generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Title for the report
    pub title: Option<String>,
    /// Tab stop used when rendering redlines
    pub tab_width: usize,
    /// List unchanged files and render their redlines
    pub include_unchanged: bool,
    /// Additional metadata to include
    pub metadata: ReportMetadata,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            title: None,
            tab_width: DEFAULT_TAB_WIDTH,
            include_unchanged: false,
            metadata: ReportMetadata::default(),
        }
    }
}

impl ReportConfig {
    /// The title, or one built from the compared roots.
    #[must_use]
    pub fn title_or_default(&self) -> String {
        self.title.clone().unwrap_or_else(|| {
            if self.metadata.roots.is_empty() {
                "Line Count Comparison".to_string()
            } else {
                format!("Line Count Comparison: {}", self.metadata.roots.join(" → "))
            }
        })
    }
}

/// Metadata included in reports
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Compared files or trees, oldest first
    pub roots: Vec<String>,
    /// Tool version
    pub tool_version: String,
    /// Generation timestamp
    pub generated_at: Option<DateTime<Utc>>,
    /// Option string the run used
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<String>,
}

impl ReportMetadata {
    #[must_use]
    pub fn new(roots: Vec<String>) -> Self {
        Self {
            roots,
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            generated_at: Some(Utc::now()),
            options: None,
        }
    }

    /// RFC 3339 timestamp, or an empty string when unset.
    #[must_use]
    pub fn generated_at_rfc3339(&self) -> String {
        self.generated_at
            .map(|at| at.to_rfc3339())
            .unwrap_or_default()
    }
}
