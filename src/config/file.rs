//! Configuration file loading and discovery.
//!
//! Supports loading configuration from YAML files with automatic discovery.

use super::types::AppConfig;
use std::path::{Path, PathBuf};

// ============================================================================
// Configuration File Discovery
// ============================================================================

/// Standard config file names to search for.
pub const CONFIG_FILE_NAMES: &[&str] = &[
    ".loc-diff.yaml",
    ".loc-diff.yml",
    "loc-diff.yaml",
    "loc-diff.yml",
];

/// Discover a config file by searching standard locations.
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Current directory
/// 3. Git repository root (if in a repo)
/// 4. User config directory (~/.config/loc-diff/)
/// 5. Home directory
#[must_use]
pub fn discover_config_file(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        if path.exists() {
            return Some(path.to_path_buf());
        }
    }

    if let Some(path) = std::env::current_dir()
        .ok()
        .and_then(|cwd| find_config_in_dir(&cwd))
    {
        return Some(path);
    }

    if let Some(path) = find_git_root().and_then(|root| find_config_in_dir(&root)) {
        return Some(path);
    }

    if let Some(path) =
        dirs::config_dir().and_then(|dir| find_config_in_dir(&dir.join("loc-diff")))
    {
        return Some(path);
    }

    dirs::home_dir().and_then(|home| find_config_in_dir(&home))
}

/// Find a config file in a specific directory.
fn find_config_in_dir(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.exists())
}

/// Find the git repository root by walking up the directory tree.
fn find_git_root() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    cwd.ancestors()
        .find(|dir| dir.join(".git").exists())
        .map(Path::to_path_buf)
}

/// Where `config init` writes a new file.
#[must_use]
pub fn default_config_path() -> PathBuf {
    PathBuf::from(CONFIG_FILE_NAMES[0])
}

// ============================================================================
// Configuration File Loading
// ============================================================================

/// Error type for config file operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Load an `AppConfig` from a YAML file.
pub fn load_config_file(path: &Path) -> Result<AppConfig, ConfigFileError> {
    if !path.exists() {
        return Err(ConfigFileError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;
    let config: AppConfig = serde_yaml::from_str(&content)?;
    Ok(config)
}

/// Load config from discovered file, or return default.
#[must_use]
pub fn load_or_default(explicit_path: Option<&Path>) -> (AppConfig, Option<PathBuf>) {
    discover_config_file(explicit_path).map_or_else(
        || (AppConfig::default(), None),
        |path| match load_config_file(&path) {
            Ok(config) => {
                tracing::debug!("Loaded config from {}", path.display());
                (config, Some(path))
            }
            Err(e) => {
                tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                (AppConfig::default(), None)
            }
        },
    )
}

// ============================================================================
// Configuration Merging
// ============================================================================

impl AppConfig {
    /// Merge another config into this one, with `other` taking precedence.
    ///
    /// Only values that differ from the defaults are taken from `other`, so
    /// CLI arguments that were not given leave file settings alone.
    pub fn merge(&mut self, other: &Self) {
        let defaults = Self::default();

        // Analysis config
        if !other.analysis.skip_identical {
            self.analysis.skip_identical = false;
        }
        if !other.analysis.show_identical_redlines {
            self.analysis.show_identical_redlines = false;
        }
        if other.analysis.tab_width != defaults.analysis.tab_width {
            self.analysis.tab_width = other.analysis.tab_width;
        }
        if other.analysis.encoding != defaults.analysis.encoding {
            self.analysis.encoding = other.analysis.encoding;
        }
        if other.analysis.language.is_some() {
            self.analysis.language.clone_from(&other.analysis.language);
        }
        if other.analysis.count_end {
            self.analysis.count_end = true;
        }
        if other.analysis.count_exit {
            self.analysis.count_exit = true;
        }
        if other.analysis.count_solitary_period {
            self.analysis.count_solitary_period = true;
        }
        if let Some(ref options) = other.analysis.options {
            self.analysis.options = Some(match self.analysis.options.take() {
                Some(existing) => format!("{existing} {options}"),
                None => options.clone(),
            });
        }

        // Output config - only override if explicitly set
        if other.output.format != defaults.output.format {
            self.output.format = other.output.format;
        }
        if other.output.file.is_some() {
            self.output.file.clone_from(&other.output.file);
        }
        if other.output.no_color {
            self.output.no_color = true;
        }

        // Behavior config (booleans - if set to true, override)
        if other.behavior.fail_on_change {
            self.behavior.fail_on_change = true;
        }
        if other.behavior.quiet {
            self.behavior.quiet = true;
        }

        // Filters config
        self.filters
            .definitions
            .extend(other.filters.definitions.iter().cloned());
        if other.filters.definitions_file.is_some() {
            self.filters
                .definitions_file
                .clone_from(&other.filters.definitions_file);
        }
    }

    /// Load from file and merge with CLI overrides.
    #[must_use]
    pub fn from_file_with_overrides(
        config_path: Option<&Path>,
        cli_overrides: &Self,
    ) -> (Self, Option<PathBuf>) {
        let (mut config, loaded_from) = load_or_default(config_path);
        config.merge(cli_overrides);
        (config, loaded_from)
    }
}

// ============================================================================
// Example Config Generation
// ============================================================================

/// Generate a commented example config with all options.
#[must_use]
pub fn generate_full_example_config() -> String {
    r#"# loc-diff configuration file
# =============================
#
# Place it at:
#   - .loc-diff.yaml in your project root
#   - ~/.config/loc-diff/loc-diff.yaml for global config
#
# CLI arguments always override file settings.

# How files are compared and counted
analysis:
  # Skip files whose versions are byte-identical
  skip_identical: true
  # Keep redlines for identical files that are not skipped
  show_identical_redlines: true
  # Tab width for redline rendering (1-32)
  tab_width: 8
  # Source encoding: utf-8 or latin-1
  encoding: utf-8
  # Force a language filter by name (see `loc-diff filters`)
  # language: cobol
  # COBOL: count END- terminators, EXIT statements, lone periods
  count_end: false
  count_exit: false
  count_solitary_period: false
  # Extra option string, e.g. "-countEnd -tabWidth=4"
  # options: ""

# Output configuration
output:
  # Format: auto, summary, count, json, redline, html
  format: auto
  # Output file path (omit for stdout)
  # file: redline.html
  # Disable colored output
  no_color: false

# Behavior flags
behavior:
  # Exit with code 1 if any line changed
  fail_on_change: false
  # Suppress non-essential output
  quiet: false

# Extra language filters, consulted before the built-in ones
filters:
  # definitions_file: ./filters.yaml
  definitions: []
  # Example:
  #   - name: ini
  #     file_endings: [".ini"]
  #     comments:
  #       - start: ";"
"#
    .to_string()
}

// ============================================================================
// Tests
// ============================================================================
