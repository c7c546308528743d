//! Plain-text redline reporter.

use super::escape::expand_tabs;
use super::{ReportConfig, ReportError, ReportFormat, ReportGenerator};
use crate::aggregate::{Comparison, FileOutcome};
use crate::analysis::{AccountingType, DiffResult, FileChangeType};
use crate::filter::{COMMENT_END, COMMENT_START};
use std::fmt::Write;

/// Redline reporter: every analyzed file as prefixed source lines.
///
/// Unchanged lines start with a space, deleted lines with `-` and added
/// lines with `+`.
pub struct RedlineReporter {
    colored: bool,
}

impl RedlineReporter {
    #[must_use]
    pub const fn new() -> Self {
        Self { colored: true }
    }

    #[must_use]
    pub const fn no_color(mut self) -> Self {
        self.colored = false;
        self
    }

    fn paint(&self, text: &str, code: &str) -> String {
        if self.colored {
            format!("\x1b[{code}m{text}\x1b[0m")
        } else {
            text.to_string()
        }
    }

    fn write_file(
        &self,
        out: &mut String,
        result: &DiffResult,
        tab_width: usize,
    ) -> Result<(), ReportError> {
        let header = format!(
            "=== {} ({}, {}) ===",
            result.file_name(),
            result.change_type(),
            result.filter_name()
        );
        writeln!(out, "{}", self.paint(&header, "1"))?;

        for fragment in result.fragments() {
            let (prefix, code) = match fragment.classification {
                AccountingType::Deleted => ('-', Some("31")),
                AccountingType::Added => ('+', Some("32")),
                _ => (' ', None),
            };
            for line in fragment.lines() {
                let line = format!("{prefix}{}", expand_tabs(line, tab_width));
                match code {
                    Some(code) => writeln!(out, "{}", self.paint(&line, code))?,
                    None => writeln!(out, "{line}")?,
                }
            }
        }

        let counts = result.counts();
        writeln!(
            out,
            "{}",
            self.paint(
                &format!(
                    "base {}  deleted {}  modified {}  added {}  total {}",
                    counts.base,
                    counts.deleted,
                    counts.modified,
                    counts.added,
                    counts.total()
                ),
                "2"
            )
        )?;
        writeln!(out)?;
        Ok(())
    }
}

impl Default for RedlineReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for RedlineReporter {
    fn generate(
        &self,
        comparison: &Comparison,
        config: &ReportConfig,
    ) -> Result<String, ReportError> {
        let mut out = String::new();

        for outcome in comparison.outcomes() {
            match outcome {
                FileOutcome::Analyzed(result) => {
                    if result.change_type() == FileChangeType::Unchanged
                        && !config.include_unchanged
                    {
                        continue;
                    }
                    self.write_file(&mut out, result, config.tab_width)?;
                }
                FileOutcome::Failed { path, error } => {
                    let line = format!("=== {path} (failed: {error}) ===");
                    writeln!(out, "{}", self.paint(&line, "31"))?;
                    writeln!(out)?;
                }
                FileOutcome::Skipped { .. } => {}
            }
        }

        // Comment markers carry no meaning in plain text.
        Ok(out.replace([COMMENT_START, COMMENT_END], ""))
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Redline
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::test_support::sample_comparison;

    fn render(config: &ReportConfig) -> String {
        RedlineReporter::new()
            .no_color()
            .generate(&sample_comparison(), config)
            .expect("renders")
    }

    #[test]
    fn test_prefixes_and_tabs() {
        let config = ReportConfig {
            tab_width: 4,
            ..Default::default()
        };
        let report = render(&config);
        let expected = "=== src/main.c (Modified, c) ===\n \
                        int main() {\n\
                        -    return 0; // ok\n\
                        +    return 1; // ok\n \
                        }\n";
        assert!(report.contains(expected), "{report}");
        assert!(report.contains("base 2  deleted 1  modified 1  added 0  total 3"));
        assert!(report.contains("=== src/new.c (Added, c) ===\n+int x;\n"));
        assert!(report.contains("-echo <hi>\n"));
    }

    #[test]
    fn test_failed_and_skipped_files() {
        let report = render(&ReportConfig::default());
        assert!(report.contains("=== blob.bin (failed: binary content) ==="));
        assert!(!report.contains("same.txt"));
    }

    #[test]
    fn test_colored_output() {
        let report = RedlineReporter::new()
            .generate(&sample_comparison(), &ReportConfig::default())
            .expect("renders");
        assert!(report.contains("\x1b[32m+int x;\x1b[0m"));
    }

    #[test]
    fn test_unchanged_files_hidden_by_default() {
        use crate::analysis::{analyze, Version};
        use crate::filter::{FilterOptions, FilterRegistry};

        let registry = FilterRegistry::builtin().expect("builtin filters");
        let filter = registry.generic();
        let options = FilterOptions::default();
        let versions = [
            Version::tokenize("a", "same\n", filter, &options),
            Version::tokenize("b", "same\n", filter, &options),
        ];
        let result = analyze("keep.txt", &versions, filter).expect("analyzes");
        let comparison = Comparison::new(vec![FileOutcome::Analyzed(result)]);

        let reporter = RedlineReporter::new().no_color();
        let hidden = reporter
            .generate(&comparison, &ReportConfig::default())
            .expect("renders");
        assert!(hidden.is_empty());

        let config = ReportConfig {
            include_unchanged: true,
            ..Default::default()
        };
        let shown = reporter.generate(&comparison, &config).expect("renders");
        assert!(shown.contains("=== keep.txt (Unchanged, generic) ===\n same\n"));
    }
}
