//! Configuration module for loc-diff.
//!
//! This module provides a unified configuration system with:
//! - Type-safe configuration structures
//! - Validation for all configuration values
//! - YAML config file loading and discovery
//! - CLI argument merging
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use loc_diff::config::AppConfig;
//!
//! // Use builder
//! let config = AppConfig::builder()
//!     .language(Some("cobol".into()))
//!     .fail_on_change(true)
//!     .build();
//!
//! // Load from file
//! use loc_diff::config::file::load_or_default;
//! let (config, loaded_from) = load_or_default(None);
//! ```
//!
//! # Configuration File
//!
//! Place a `.loc-diff.yaml` file in your project root or `~/.config/loc-diff/`:
//!
//! ```yaml
//! analysis:
//!   count_end: true
//!   encoding: latin-1
//! behavior:
//!   fail_on_change: true
//! ```

pub mod file;
mod types;
mod validation;

pub use types::{
    AnalysisConfig, AppConfig, AppConfigBuilder, BehaviorConfig, CompareConfig, FiltersConfig,
    OutputConfig,
};
pub use validation::{ConfigError, Validatable};

pub use file::{
    default_config_path, discover_config_file, generate_full_example_config, load_config_file,
    load_or_default, ConfigFileError,
};

/// Generate a JSON Schema for the `AppConfig` configuration format.
///
/// This schema documents all configuration options that can be set in
/// `.loc-diff.yaml` config files. It can be used by editors for
/// validation and autocompletion.
pub fn generate_json_schema() -> Result<String, serde_json::Error> {
    let schema = schemars::schema_for!(AppConfig);
    serde_json::to_string_pretty(&schema)
}
