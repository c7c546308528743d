//! Configuration validation for loc-diff.
//!
//! Provides validation traits and implementations for all configuration types.

use super::types::{AnalysisConfig, AppConfig, BehaviorConfig, FiltersConfig, OutputConfig};
use crate::analysis::AnalysisOptions;
use crate::filter::FilterDefinition;

/// Accepted tab widths for redline rendering.
const TAB_WIDTH_RANGE: std::ops::RangeInclusive<usize> = 1..=32;

// ============================================================================
// Configuration Error
// ============================================================================

/// Error type for configuration validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    /// The field that failed validation
    pub field: String,
    /// Description of the validation error
    pub message: String,
}

impl ConfigError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Validation Trait
// ============================================================================

/// Trait for validatable configuration types.
pub trait Validatable {
    /// Validate the configuration, returning any errors found.
    fn validate(&self) -> Vec<ConfigError>;

    /// Check if the configuration is valid.
    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

// ============================================================================
// Validation Implementations
// ============================================================================

impl Validatable for AppConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        errors.extend(self.analysis.validate());
        errors.extend(self.output.validate());
        errors.extend(self.behavior.validate());
        errors.extend(self.filters.validate());
        errors
    }
}

impl Validatable for AnalysisConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if !TAB_WIDTH_RANGE.contains(&self.tab_width) {
            errors.push(ConfigError::new(
                "analysis.tab_width",
                format!(
                    "Tab width must be between {} and {}, got {}",
                    TAB_WIDTH_RANGE.start(),
                    TAB_WIDTH_RANGE.end(),
                    self.tab_width
                ),
            ));
        }

        if let Some(ref language) = self.language {
            if language.trim().is_empty() {
                errors.push(ConfigError::new(
                    "analysis.language",
                    "Language name must not be empty",
                ));
            }
        }

        if let Some(ref options) = self.options {
            match AnalysisOptions::parse(options) {
                Ok(parsed) if !TAB_WIDTH_RANGE.contains(&parsed.tab_width) => {
                    errors.push(ConfigError::new(
                        "analysis.options",
                        format!("-tabWidth out of range: {}", parsed.tab_width),
                    ));
                }
                Ok(_) => {}
                Err(e) => errors.push(ConfigError::new("analysis.options", e.to_string())),
            }
        }

        errors
    }
}

impl Validatable for OutputConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if let Some(ref file_path) = self.file {
            if let Some(parent) = file_path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    errors.push(ConfigError::new(
                        "output.file",
                        format!("Parent directory does not exist: {}", parent.display()),
                    ));
                }
            }
        }

        errors
    }
}

impl Validatable for BehaviorConfig {
    fn validate(&self) -> Vec<ConfigError> {
        Vec::new()
    }
}

impl Validatable for FiltersConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        for (index, definition) in self.definitions.iter().enumerate() {
            errors.extend(definition.validate().into_iter().map(|mut e| {
                e.field = format!("filters.definitions[{index}]");
                e
            }));
        }

        if let Some(ref path) = self.definitions_file {
            if !path.exists() {
                errors.push(ConfigError::new(
                    "filters.definitions_file",
                    format!("File does not exist: {}", path.display()),
                ));
            }
        }

        errors
    }
}

impl Validatable for FilterDefinition {
    fn validate(&self) -> Vec<ConfigError> {
        self.problems()
            .into_iter()
            .map(|message| ConfigError::new(self.name.clone(), message))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::CommentSyntax;
    use std::path::PathBuf;

    #[test]
    fn test_default_config_is_valid() {
        assert!(AppConfig::default().is_valid());
    }

    #[test]
    fn test_tab_width_range() {
        let config = AnalysisConfig {
            tab_width: 0,
            ..Default::default()
        };
        let errors = config.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "analysis.tab_width");

        let config = AnalysisConfig {
            options: Some("-tabWidth=64".to_string()),
            ..Default::default()
        };
        assert!(!config.is_valid());
    }

    #[test]
    fn test_bad_option_string() {
        let config = AnalysisConfig {
            options: Some("-encoding=ebcdic".to_string()),
            ..Default::default()
        };
        let errors = config.validate();
        assert_eq!(errors[0].field, "analysis.options");
    }

    #[test]
    fn test_output_parent_must_exist() {
        let config = OutputConfig {
            file: Some(PathBuf::from("/nonexistent/dir/report.html")),
            ..Default::default()
        };
        assert!(!config.is_valid());
    }

    #[test]
    fn test_filter_definition_problems_are_reported() {
        let filters = FiltersConfig {
            definitions: vec![FilterDefinition {
                name: String::new(),
                file_endings: Vec::new(),
                comments: vec![CommentSyntax::line("")],
                strings: Vec::new(),
                first_line_patterns: Vec::new(),
                ignore_lines: Vec::new(),
            }],
            definitions_file: None,
        };
        let errors = filters.validate();
        assert_eq!(errors.len(), 3);
        assert!(errors.iter().all(|e| e.field == "filters.definitions[0]"));
    }
}
