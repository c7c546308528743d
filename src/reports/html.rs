//! HTML report generator.

use super::escape::{anchor_id, escape_html, render_marked_line};
use super::{ReportConfig, ReportError, ReportFormat, ReportGenerator};
use crate::aggregate::Comparison;
use crate::analysis::{AccountingType, DiffResult, FileChangeType};
use std::fmt::Write;

/// HTML report generator
pub struct HtmlReporter {
    /// Include inline CSS
    include_styles: bool,
}

impl HtmlReporter {
    /// Create a new HTML reporter
    #[must_use]
    pub const fn new() -> Self {
        Self {
            include_styles: true,
        }
    }

    /// Leave out the inline stylesheet
    #[must_use]
    pub const fn without_styles(mut self) -> Self {
        self.include_styles = false;
        self
    }

    const fn get_styles(&self) -> &'static str {
        r#"
        <style>
            :root {
                --bg-color: #1e1e2e;
                --text-color: #cdd6f4;
                --accent-color: #89b4fa;
                --success-color: #a6e3a1;
                --warning-color: #f9e2af;
                --error-color: #f38ba8;
                --border-color: #45475a;
                --card-bg: #313244;
                --comment-color: #7f849c;
            }

            body {
                font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
                background-color: var(--bg-color);
                color: var(--text-color);
                margin: 0;
                padding: 20px;
                line-height: 1.6;
            }

            .container {
                max-width: 1200px;
                margin: 0 auto;
            }

            h1, h2, h3 {
                color: var(--accent-color);
            }

            a {
                color: var(--accent-color);
            }

            .header {
                border-bottom: 2px solid var(--border-color);
                padding-bottom: 20px;
                margin-bottom: 30px;
            }

            .summary-cards {
                display: grid;
                grid-template-columns: repeat(auto-fit, minmax(150px, 1fr));
                gap: 20px;
                margin-bottom: 30px;
            }

            .card {
                background-color: var(--card-bg);
                border-radius: 8px;
                padding: 20px;
                border: 1px solid var(--border-color);
            }

            .card-title {
                font-size: 0.9em;
                color: #a6adc8;
                margin-bottom: 10px;
            }

            .card-value {
                font-size: 2em;
                font-weight: bold;
            }

            .card-value.added { color: var(--success-color); }
            .card-value.deleted { color: var(--error-color); }
            .card-value.modified { color: var(--warning-color); }

            table {
                width: 100%;
                border-collapse: collapse;
                margin-bottom: 30px;
                background-color: var(--card-bg);
                border-radius: 8px;
                overflow: hidden;
            }

            th, td {
                padding: 12px 15px;
                text-align: left;
                border-bottom: 1px solid var(--border-color);
            }

            td.num, th.num {
                text-align: right;
                font-variant-numeric: tabular-nums;
            }

            th {
                background-color: #45475a;
                font-weight: 600;
            }

            tr:hover {
                background-color: #3b3d4d;
            }

            .badge {
                display: inline-block;
                padding: 2px 8px;
                border-radius: 4px;
                font-size: 0.85em;
                font-weight: 500;
            }

            .badge-added { background-color: rgba(166, 227, 161, 0.2); color: var(--success-color); }
            .badge-deleted { background-color: rgba(243, 139, 168, 0.2); color: var(--error-color); }
            .badge-modified { background-color: rgba(249, 226, 175, 0.2); color: var(--warning-color); }
            .badge-unchanged { background-color: rgba(110, 118, 129, 0.3); color: #6e7681; }
            .badge-failed { background-color: rgba(243, 139, 168, 0.3); color: var(--error-color); }

            .section {
                margin-bottom: 40px;
            }

            .redline {
                background-color: var(--card-bg);
                border: 1px solid var(--border-color);
                border-radius: 8px;
                padding: 12px 0;
                overflow-x: auto;
                font-family: 'JetBrains Mono', Menlo, Consolas, monospace;
                font-size: 0.9em;
                line-height: 1.4;
            }

            .redline .line { display: block; padding: 0 15px; white-space: pre; }
            .redline .del { background-color: rgba(243, 139, 168, 0.15); color: var(--error-color); text-decoration: line-through; }
            .redline .add { background-color: rgba(166, 227, 161, 0.15); color: var(--success-color); }
            .redline .comment { color: var(--comment-color); font-style: italic; }
            .redline .del .comment, .redline .add .comment { color: inherit; }

            .footer {
                margin-top: 40px;
                padding-top: 20px;
                border-top: 1px solid var(--border-color);
                font-size: 0.9em;
                color: #a6adc8;
            }
        </style>
        "#
    }

    fn write_summary(&self, html: &mut String, comparison: &Comparison) -> Result<(), ReportError> {
        let totals = comparison.totals();
        writeln!(html, "<div class=\"summary-cards\">")?;
        for kind in AccountingType::ALL {
            write_card(
                html,
                kind.label(),
                &totals.count(kind).to_string(),
                card_class(kind),
            )?;
        }
        write_card(
            html,
            "New &amp; Changed",
            &totals.lines.new_and_changed().to_string(),
            "",
        )?;
        writeln!(html, "</div>")?;

        let files = &totals.files;
        writeln!(
            html,
            "<p>Files: {} added, {} modified, {} deleted, {} unchanged, {} identical (skipped), {} failed</p>",
            files.get(FileChangeType::Added),
            files.get(FileChangeType::Modified),
            files.get(FileChangeType::Deleted),
            files.get(FileChangeType::Unchanged),
            totals.skipped,
            totals.failed
        )?;
        Ok(())
    }

    fn write_file_table(
        &self,
        html: &mut String,
        change_type: FileChangeType,
        results: &[&DiffResult],
    ) -> Result<(), ReportError> {
        if results.is_empty() {
            return Ok(());
        }

        writeln!(html, "<div class=\"section\">")?;
        writeln!(
            html,
            "    <h2>{} Files ({})</h2>",
            change_type.label(),
            results.len()
        )?;
        writeln!(html, "    <table>")?;
        writeln!(html, "        <thead>")?;
        writeln!(html, "            <tr>")?;
        writeln!(html, "                <th>Status</th>")?;
        writeln!(html, "                <th>File</th>")?;
        writeln!(html, "                <th>Filter</th>")?;
        for kind in AccountingType::ALL {
            writeln!(html, "                <th class=\"num\">{}</th>", kind.label())?;
        }
        writeln!(html, "            </tr>")?;
        writeln!(html, "        </thead>")?;
        writeln!(html, "        <tbody>")?;

        let badge = badge_class(change_type);
        for result in results {
            writeln!(html, "            <tr>")?;
            writeln!(
                html,
                "                <td><span class=\"badge {badge}\">{}</span></td>",
                change_type.label()
            )?;
            writeln!(
                html,
                "                <td><a href=\"#{}\">{}</a></td>",
                anchor_id(result.file_name()),
                escape_html(result.file_name())
            )?;
            writeln!(
                html,
                "                <td>{}</td>",
                escape_html(result.filter_name())
            )?;
            for kind in AccountingType::ALL {
                writeln!(
                    html,
                    "                <td class=\"num\">{}</td>",
                    result.count(kind)
                )?;
            }
            writeln!(html, "            </tr>")?;
        }

        writeln!(html, "        </tbody>")?;
        writeln!(html, "    </table>")?;
        writeln!(html, "</div>")?;
        Ok(())
    }

    fn write_failures(&self, html: &mut String, comparison: &Comparison) -> Result<(), ReportError> {
        let failures: Vec<(&str, &str)> = comparison.failures().collect();
        if failures.is_empty() {
            return Ok(());
        }

        writeln!(html, "<div class=\"section\">")?;
        writeln!(html, "    <h2>Failed Files ({})</h2>", failures.len())?;
        writeln!(html, "    <table>")?;
        writeln!(html, "        <thead>")?;
        writeln!(html, "            <tr>")?;
        writeln!(html, "                <th>Status</th>")?;
        writeln!(html, "                <th>File</th>")?;
        writeln!(html, "                <th>Error</th>")?;
        writeln!(html, "            </tr>")?;
        writeln!(html, "        </thead>")?;
        writeln!(html, "        <tbody>")?;
        for (path, error) in failures {
            writeln!(html, "            <tr>")?;
            writeln!(
                html,
                "                <td><span class=\"badge badge-failed\">Failed</span></td>"
            )?;
            writeln!(html, "                <td>{}</td>", escape_html(path))?;
            writeln!(html, "                <td>{}</td>", escape_html(error))?;
            writeln!(html, "            </tr>")?;
        }
        writeln!(html, "        </tbody>")?;
        writeln!(html, "    </table>")?;
        writeln!(html, "</div>")?;
        Ok(())
    }

    fn write_redline(
        &self,
        html: &mut String,
        result: &DiffResult,
        tab_width: usize,
    ) -> Result<(), ReportError> {
        writeln!(
            html,
            "<div class=\"section\" id=\"{}\">",
            anchor_id(result.file_name())
        )?;
        writeln!(
            html,
            "    <h3>{} <span class=\"badge {}\">{}</span></h3>",
            escape_html(result.file_name()),
            badge_class(result.change_type()),
            result.change_type().label()
        )?;
        if result.fragments().is_empty() {
            writeln!(html, "    <p>No redline recorded.</p>")?;
            writeln!(html, "</div>")?;
            return Ok(());
        }

        write!(html, "    <pre class=\"redline\">")?;
        for fragment in result.fragments() {
            let class = match fragment.classification {
                AccountingType::Deleted => "line del",
                AccountingType::Added => "line add",
                _ => "line",
            };
            for line in fragment.marked_text().lines() {
                write!(
                    html,
                    "<span class=\"{class}\">{}</span>",
                    render_marked_line(line, tab_width)
                )?;
            }
        }
        writeln!(html, "</pre>")?;
        writeln!(html, "</div>")?;
        Ok(())
    }
}

impl Default for HtmlReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for HtmlReporter {
    fn generate(
        &self,
        comparison: &Comparison,
        config: &ReportConfig,
    ) -> Result<String, ReportError> {
        let mut html = String::new();
        let title = config.title_or_default();

        // HTML header
        writeln!(html, "<!DOCTYPE html>")?;
        writeln!(html, "<html lang=\"en\">")?;
        writeln!(html, "<head>")?;
        writeln!(html, "    <meta charset=\"UTF-8\">")?;
        writeln!(
            html,
            "    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">"
        )?;
        writeln!(html, "    <title>{}</title>", escape_html(&title))?;
        if self.include_styles {
            writeln!(html, "{}", self.get_styles())?;
        }
        writeln!(html, "</head>")?;
        writeln!(html, "<body>")?;
        writeln!(html, "<div class=\"container\">")?;

        // Header
        let generated_at = config
            .metadata
            .generated_at
            .unwrap_or_else(chrono::Utc::now);
        writeln!(html, "<div class=\"header\">")?;
        writeln!(html, "    <h1>{}</h1>", escape_html(&title))?;
        writeln!(
            html,
            "    <p>Generated by loc-diff v{} on {}</p>",
            env!("CARGO_PKG_VERSION"),
            generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        )?;
        if let Some(options) = &config.metadata.options {
            writeln!(html, "    <p>Options: <code>{}</code></p>", escape_html(options))?;
        }
        writeln!(html, "</div>")?;

        self.write_summary(&mut html, comparison)?;

        let shown: Vec<FileChangeType> = FileChangeType::ALL
            .into_iter()
            .filter(|&t| t != FileChangeType::Unchanged || config.include_unchanged)
            .collect();

        for &change_type in &shown {
            let results: Vec<&DiffResult> = comparison.results_with(change_type).collect();
            self.write_file_table(&mut html, change_type, &results)?;
        }
        self.write_failures(&mut html, comparison)?;

        writeln!(html, "<h2>Redlines</h2>")?;
        for result in comparison
            .outcomes()
            .iter()
            .filter_map(|outcome| outcome.result())
            .filter(|result| shown.contains(&result.change_type()))
        {
            self.write_redline(&mut html, result, config.tab_width)?;
        }

        // Footer
        writeln!(html, "<div class=\"footer\">")?;
        writeln!(
            html,
            "    <p>Line counts exclude blank lines and comments. Total = Base + Modified + Added.</p>"
        )?;
        writeln!(html, "</div>")?;

        writeln!(html, "</div>")?;
        writeln!(html, "</body>")?;
        writeln!(html, "</html>")?;

        Ok(html)
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Html
    }
}

fn write_card(html: &mut String, title: &str, value: &str, class: &str) -> Result<(), ReportError> {
    writeln!(html, "    <div class=\"card\">")?;
    writeln!(html, "        <div class=\"card-title\">{title}</div>")?;
    writeln!(html, "        <div class=\"card-value {class}\">{value}</div>")?;
    writeln!(html, "    </div>")?;
    Ok(())
}

const fn card_class(kind: AccountingType) -> &'static str {
    match kind {
        AccountingType::Deleted => "deleted",
        AccountingType::Modified => "modified",
        AccountingType::Added => "added",
        AccountingType::Base | AccountingType::Total => "",
    }
}

const fn badge_class(change_type: FileChangeType) -> &'static str {
    match change_type {
        FileChangeType::Added => "badge-added",
        FileChangeType::Modified => "badge-modified",
        FileChangeType::Deleted => "badge-deleted",
        FileChangeType::Unchanged => "badge-unchanged",
    }
}
