//! Configuration types for loc-diff operations.
//!
//! Provides structured configuration for comparison and counting runs.

use crate::analysis::{AnalysisOptions, TextEncoding, DEFAULT_TAB_WIDTH};
use crate::error::Result;
use crate::filter::{FilterDefinition, FilterOptions, FilterRegistry};
use crate::reports::ReportFormat;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ============================================================================
// Unified Application Configuration
// ============================================================================

/// Unified application configuration that can be loaded from CLI args or config files.
///
/// CLI arguments are layered over file settings with [`AppConfig::merge`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppConfig {
    /// Analysis options (identical files, encoding, language flags)
    pub analysis: AnalysisConfig,
    /// Output configuration (format, file, colors)
    pub output: OutputConfig,
    /// Behavior flags
    pub behavior: BehaviorConfig,
    /// Extra language filter definitions
    pub filters: FiltersConfig,
}

impl AppConfig {
    /// Create a new `AppConfig` with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an `AppConfig` builder.
    #[must_use]
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }
}

// ============================================================================
// Builder for AppConfig
// ============================================================================

/// Builder for constructing `AppConfig` with fluent API.
#[derive(Debug, Default)]
#[must_use]
pub struct AppConfigBuilder {
    config: AppConfig,
}

impl AppConfigBuilder {
    pub const fn output_format(mut self, format: ReportFormat) -> Self {
        self.config.output.format = format;
        self
    }

    pub fn output_file(mut self, file: Option<PathBuf>) -> Self {
        self.config.output.file = file;
        self
    }

    pub const fn no_color(mut self, no_color: bool) -> Self {
        self.config.output.no_color = no_color;
        self
    }

    pub const fn fail_on_change(mut self, fail: bool) -> Self {
        self.config.behavior.fail_on_change = fail;
        self
    }

    pub const fn quiet(mut self, quiet: bool) -> Self {
        self.config.behavior.quiet = quiet;
        self
    }

    pub fn language(mut self, language: Option<String>) -> Self {
        self.config.analysis.language = language;
        self
    }

    pub fn options(mut self, options: Option<String>) -> Self {
        self.config.analysis.options = options;
        self
    }

    pub fn filter_definitions_file(mut self, file: Option<PathBuf>) -> Self {
        self.config.filters.definitions_file = file;
        self
    }

    #[must_use]
    pub fn build(self) -> AppConfig {
        self.config
    }
}

// ============================================================================
// Command-specific Configuration Types
// ============================================================================

/// Configuration for a comparison run.
#[derive(Debug, Clone)]
pub struct CompareConfig {
    /// Versions to compare, oldest first: two trees/files, or base, A and B
    pub versions: Vec<PathBuf>,
    /// Parsed analysis options
    pub analysis: AnalysisOptions,
    /// The option string the analysis options were read from
    pub option_string: Option<String>,
    /// Output configuration
    pub output: OutputConfig,
    /// Behavior flags
    pub behavior: BehaviorConfig,
}

impl CompareConfig {
    /// Build a run configuration from the app config and version paths.
    pub fn from_app_config(config: &AppConfig, versions: Vec<PathBuf>) -> Result<Self> {
        Ok(Self {
            versions,
            analysis: config.analysis.to_options()?,
            option_string: config.analysis.options.clone(),
            output: config.output.clone(),
            behavior: config.behavior.clone(),
        })
    }
}

// ============================================================================
// Sub-configuration Types
// ============================================================================

/// Analysis configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Skip files whose versions are byte-identical
    pub skip_identical: bool,
    /// Keep redlines for identical files that are not skipped
    pub show_identical_redlines: bool,
    /// Tab width for redline rendering
    pub tab_width: usize,
    /// Source encoding: utf-8 or latin-1
    pub encoding: TextEncoding,
    /// Force a language filter by name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Count END- scope terminators (COBOL)
    pub count_end: bool,
    /// Count EXIT statements (COBOL)
    pub count_exit: bool,
    /// Count lines holding a lone period (COBOL)
    pub count_solitary_period: bool,
    /// Option string applied on top of the settings above
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            skip_identical: true,
            show_identical_redlines: true,
            tab_width: DEFAULT_TAB_WIDTH,
            encoding: TextEncoding::Utf8,
            language: None,
            count_end: false,
            count_exit: false,
            count_solitary_period: false,
            options: None,
        }
    }
}

impl AnalysisConfig {
    /// Resolve into analysis options, applying the option string last.
    pub fn to_options(&self) -> Result<AnalysisOptions> {
        let mut options = AnalysisOptions {
            skip_identical: self.skip_identical,
            show_identical_redlines: self.show_identical_redlines,
            tab_width: self.tab_width,
            encoding: self.encoding,
            language: self.language.clone(),
            filter: FilterOptions {
                count_end: self.count_end,
                count_exit: self.count_exit,
                count_solitary_period: self.count_solitary_period,
                extra: Vec::new(),
            },
        };
        if let Some(ref extra) = self.options {
            options.apply(extra)?;
        }
        Ok(options)
    }
}

/// Output-related configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format
    pub format: ReportFormat,
    /// Output file path (None for stdout)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    /// Disable colored output
    pub no_color: bool,
}

/// Behavior flags for comparison runs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Exit with code 1 if any line changed
    pub fail_on_change: bool,
    /// Suppress non-essential output
    pub quiet: bool,
}

/// Extra language filters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct FiltersConfig {
    /// Inline filter definitions, consulted before the built-in filters
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub definitions: Vec<FilterDefinition>,
    /// YAML file holding a list of filter definitions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub definitions_file: Option<PathBuf>,
}

impl FiltersConfig {
    /// Build the filter registry: file definitions, inline definitions, built-ins.
    pub fn build_registry(&self) -> Result<FilterRegistry> {
        let mut definitions = match self.definitions_file {
            Some(ref path) => FilterRegistry::load_definitions(path)?,
            None => Vec::new(),
        };
        definitions.extend(self.definitions.iter().cloned());
        FilterRegistry::with_definitions(definitions)
    }
}
