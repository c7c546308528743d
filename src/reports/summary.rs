//! Summary and count report generators for shell output.
//!
//! Provides compact, human-readable totals for terminal usage, and a bare
//! total for scripts.

use super::{ReportConfig, ReportError, ReportFormat, ReportGenerator};
use crate::aggregate::Comparison;
use crate::analysis::{AccountingType, FileChangeType};

/// Apply ANSI color formatting if colored output is enabled.
fn ansi_color(text: &str, color: &str, colored: bool) -> String {
    if colored {
        match color {
            "red" => format!("\x1b[31m{text}\x1b[0m"),
            "green" => format!("\x1b[32m{text}\x1b[0m"),
            "yellow" => format!("\x1b[33m{text}\x1b[0m"),
            "cyan" => format!("\x1b[36m{text}\x1b[0m"),
            "bold" => format!("\x1b[1m{text}\x1b[0m"),
            "dim" => format!("\x1b[2m{text}\x1b[0m"),
            _ => text.to_string(),
        }
    } else {
        text.to_string()
    }
}

const fn accounting_color(kind: AccountingType) -> &'static str {
    match kind {
        AccountingType::Base => "dim",
        AccountingType::Deleted => "red",
        AccountingType::Modified => "yellow",
        AccountingType::Added => "green",
        AccountingType::Total => "bold",
    }
}

/// Summary reporter for shell output
pub struct SummaryReporter {
    /// Use colored output
    colored: bool,
}

impl SummaryReporter {
    /// Create a new summary reporter
    #[must_use]
    pub const fn new() -> Self {
        Self { colored: true }
    }

    /// Disable colored output
    #[must_use]
    pub const fn no_color(mut self) -> Self {
        self.colored = false;
        self
    }

    fn color(&self, text: &str, color: &str) -> String {
        ansi_color(text, color, self.colored)
    }
}

impl Default for SummaryReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for SummaryReporter {
    fn generate(
        &self,
        comparison: &Comparison,
        config: &ReportConfig,
    ) -> Result<String, ReportError> {
        let totals = comparison.totals();
        let mut lines = Vec::new();

        lines.push(self.color("Line Count Summary", "bold"));
        lines.push(self.color("─".repeat(40).as_str(), "dim"));

        if !config.metadata.roots.is_empty() {
            lines.push(format!(
                "{}  {}",
                self.color("Versions:", "cyan"),
                config.metadata.roots.join(" → ")
            ));
            lines.push(String::new());
        }

        lines.push(self.color("Lines:", "bold"));
        for kind in AccountingType::ALL {
            let label = format!("{:<15}", kind.label());
            lines.push(format!(
                "  {}{:>10}",
                self.color(&label, accounting_color(kind)),
                totals.count(kind)
            ));
        }
        lines.push(format!(
            "  {}{:>10}",
            self.color(&format!("{:<15}", "New & Changed"), "cyan"),
            totals.lines.new_and_changed()
        ));

        lines.push(String::new());
        lines.push(self.color("Files:", "bold"));
        let files = &totals.files;
        lines.push(format!(
            "  {} added  {} modified  {} deleted  {} unchanged",
            self.color(&format!("+{}", files.get(FileChangeType::Added)), "green"),
            self.color(&format!("~{}", files.get(FileChangeType::Modified)), "yellow"),
            self.color(&format!("-{}", files.get(FileChangeType::Deleted)), "red"),
            files.get(FileChangeType::Unchanged)
        ));
        if totals.skipped > 0 {
            lines.push(format!(
                "  {}",
                self.color(&format!("{} identical, skipped", totals.skipped), "dim")
            ));
        }

        if totals.failed > 0 {
            lines.push(String::new());
            lines.push(self.color(&format!("Failed ({}):", totals.failed), "red"));
            for (path, error) in comparison.failures() {
                lines.push(format!("  {path}: {error}"));
            }
        }

        lines.push(String::new());
        Ok(lines.join("\n"))
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Summary
    }
}

/// Reporter printing only the total line count.
#[derive(Debug, Clone, Copy, Default)]
pub struct CountReporter;

impl ReportGenerator for CountReporter {
    fn generate(
        &self,
        comparison: &Comparison,
        _config: &ReportConfig,
    ) -> Result<String, ReportError> {
        Ok(format!(
            "{}\n",
            comparison.totals().count(AccountingType::Total)
        ))
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::test_support::sample_comparison;
    use crate::reports::ReportMetadata;

    #[test]
    fn test_summary_lists_every_accounting_type() {
        let config = ReportConfig {
            metadata: ReportMetadata::new(vec!["v1".to_string(), "v2".to_string()]),
            ..Default::default()
        };
        let report = SummaryReporter::new()
            .no_color()
            .generate(&sample_comparison(), &config)
            .expect("renders");

        assert!(report.contains("Versions:  v1 → v2"));
        assert!(report.contains(&format!("  {:<15}{:>10}", "Base", 2)));
        assert!(report.contains(&format!("  {:<15}{:>10}", "Deleted", 1)));
        assert!(report.contains(&format!("  {:<15}{:>10}", "Total", 4)));
        assert!(report.contains(&format!("  {:<15}{:>10}", "New & Changed", 2)));
        assert!(report.contains("+1 added  ~1 modified  -1 deleted  0 unchanged"));
        assert!(report.contains("1 identical, skipped"));
        assert!(report.contains("blob.bin: binary content"));
        assert!(!report.contains('\x1b'));
    }

    #[test]
    fn test_summary_colors() {
        let report = SummaryReporter::new()
            .generate(&sample_comparison(), &ReportConfig::default())
            .expect("renders");
        assert!(report.contains("\x1b[32m+1\x1b[0m"));
    }

    #[test]
    fn test_count_is_total() {
        let report = CountReporter
            .generate(&sample_comparison(), &ReportConfig::default())
            .expect("renders");
        assert_eq!(report, "4\n");
    }
}
