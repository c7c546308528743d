//! Per-request analysis options and the option-string parser.

use super::TextEncoding;
use crate::error::{LocDiffError, Result};
use crate::filter::FilterOptions;
use serde::{Deserialize, Serialize};

/// Default tab stop used when rendering redlines.
pub const DEFAULT_TAB_WIDTH: usize = 8;

/// Options controlling one analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisOptions {
    /// Skip files whose versions are byte-identical
    pub skip_identical: bool,
    /// Keep redline fragments for identical files
    pub show_identical_redlines: bool,
    /// Tab stop for rendering
    pub tab_width: usize,
    /// Encoding of every version
    pub encoding: TextEncoding,
    /// Language filter to force, by name
    pub language: Option<String>,
    /// Switches handed to the language filter
    pub filter: FilterOptions,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            skip_identical: true,
            show_identical_redlines: true,
            tab_width: DEFAULT_TAB_WIDTH,
            encoding: TextEncoding::default(),
            language: None,
            filter: FilterOptions::default(),
        }
    }
}

impl AnalysisOptions {
    /// Parse an option string on top of the defaults.
    pub fn parse(options: &str) -> Result<Self> {
        let mut parsed = Self::default();
        parsed.apply(options)?;
        Ok(parsed)
    }

    /// Apply an option string to these options.
    ///
    /// Options are whitespace-separated tokens starting with `-` or `+`,
    /// matched case-insensitively. `name=value` tokens set a value. Tokens
    /// not recognized here are kept for the language filter. Tokens
    /// without a leading `-` or `+` are ignored.
    pub fn apply(&mut self, options: &str) -> Result<()> {
        for token in options.split_whitespace() {
            let Some(name) = token.strip_prefix(['-', '+']) else {
                tracing::debug!("Ignoring option token without prefix: {}", token);
                continue;
            };

            if let Some((key, value)) = name.split_once('=') {
                match key.to_ascii_lowercase().as_str() {
                    "lang" | "language" => {
                        self.language = Some(value.to_string()).filter(|v| !v.is_empty());
                    }
                    "tabwidth" => {
                        self.tab_width = value.parse().map_err(|_| {
                            LocDiffError::config(format!("invalid tab width '{value}'"))
                        })?;
                    }
                    "encoding" => {
                        self.encoding = value
                            .parse()
                            .map_err(|e| LocDiffError::decode("option string", e))?;
                    }
                    _ => self.filter.extra.push(token.to_string()),
                }
                continue;
            }

            match name.to_ascii_lowercase().as_str() {
                "countend" => self.filter.count_end = true,
                "countexit" => self.filter.count_exit = true,
                "countperiod" => self.filter.count_solitary_period = true,
                "includeidentical" => self.skip_identical = false,
                "noidenticalredlines" => self.show_identical_redlines = false,
                _ => self.filter.extra.push(token.to_string()),
            }
        }
        Ok(())
    }
}
