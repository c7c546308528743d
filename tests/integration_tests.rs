//! Integration tests for loc-diff
//!
//! These tests verify end-to-end functionality of source collection, the
//! analyzer, aggregation and report generation against fixture trees.

use loc_diff::{
    cli,
    config::{AppConfig, CompareConfig},
    pipeline::{compare_sources, exit_codes, resolve_sources},
    reports::{create_reporter_with_options, ReportConfig, ReportFormat},
    AccountingType, AnalysisOptions, Comparison, FileChangeType, FileOutcome, FilterRegistry,
    LocCounts, MergeClass,
};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use walkdir::WalkDir;

// ============================================================================
// Test Fixtures
// ============================================================================

const FIXTURES_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");

fn fixture_path(name: &str) -> PathBuf {
    Path::new(FIXTURES_DIR).join(name)
}

/// Copy a fixture tree into a scratch directory, so probes never touch the
/// checked-in fixtures.
fn scratch_copy(name: &str, scratch: &TempDir) -> PathBuf {
    let source = fixture_path(name);
    let target = scratch.path().join(name);
    for entry in WalkDir::new(&source) {
        let entry = entry.expect("walk fixtures");
        let relative = entry.path().strip_prefix(&source).expect("under fixture");
        let destination = target.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&destination).expect("create dir");
        } else {
            fs::copy(entry.path(), &destination).expect("copy file");
        }
    }
    target
}

fn compare_trees(options: &AnalysisOptions) -> Comparison {
    let scratch = TempDir::new().expect("temp dir");
    let before = scratch_copy("before", &scratch);
    let after = scratch_copy("after", &scratch);
    let registry = FilterRegistry::builtin().expect("builtin filters");

    let sources = resolve_sources(&[before, after]).expect("sources resolve");
    let labels = vec!["before".to_string(), "after".to_string()];
    compare_sources(&sources, &labels, &registry, options, true)
}

fn outcome<'a>(comparison: &'a Comparison, path: &str) -> &'a FileOutcome {
    comparison
        .outcomes()
        .iter()
        .find(|o| o.path() == path)
        .unwrap_or_else(|| panic!("no outcome for {path}"))
}

// ============================================================================
// Tree Comparison Tests
// ============================================================================

mod tree_tests {
    use super::*;

    #[test]
    fn test_tree_totals() {
        let comparison = compare_trees(&AnalysisOptions::default());
        let totals = comparison.totals();

        assert_eq!(totals.lines, LocCounts::new(8, 3, 2, 3));
        assert_eq!(totals.count(AccountingType::Total), 13);
        assert_eq!(totals.files.get(FileChangeType::Added), 1);
        assert_eq!(totals.files.get(FileChangeType::Deleted), 1);
        assert_eq!(totals.files.get(FileChangeType::Modified), 2);
        assert_eq!(totals.skipped, 1);
        assert_eq!(totals.failed, 0);
    }

    #[test]
    fn test_outcomes_sorted_by_path() {
        let comparison = compare_trees(&AnalysisOptions::default());
        let paths: Vec<&str> = comparison.outcomes().iter().map(FileOutcome::path).collect();
        assert_eq!(
            paths,
            vec![
                "README.txt",
                "scripts/build.sh",
                "src/extra.c",
                "src/main.c",
                "src/util.c"
            ]
        );
    }

    #[test]
    fn test_modified_file_counts_and_filter() {
        let comparison = compare_trees(&AnalysisOptions::default());
        let main = outcome(&comparison, "src/main.c")
            .result()
            .expect("main.c analyzed");

        assert_eq!(main.filter_name(), "c");
        assert_eq!(main.change_type(), FileChangeType::Modified);
        assert_eq!(main.counts(), LocCounts::new(7, 0, 2, 0));

        // The comment edit is rendered even though it counts for nothing.
        let redline = main.redline_text();
        assert!(redline.contains("-/* Entry point. */|+/* Entry point, prints a sum. */|"));
        assert!(redline.contains("-    int total = 0;|+    long total = 0;|"));
    }

    #[test]
    fn test_comment_only_change_counts_as_base() {
        let comparison = compare_trees(&AnalysisOptions::default());
        let script = outcome(&comparison, "scripts/build.sh")
            .result()
            .expect("build.sh analyzed");

        assert_eq!(script.filter_name(), "shell");
        assert_eq!(script.counts(), LocCounts::new(1, 0, 0, 0));
        assert_eq!(script.change_type(), FileChangeType::Modified);
        assert!(script.has_changed_fragments());
    }

    #[test]
    fn test_added_and_deleted_files() {
        let comparison = compare_trees(&AnalysisOptions::default());
        let extra = outcome(&comparison, "src/extra.c").result().expect("analyzed");
        assert_eq!(extra.change_type(), FileChangeType::Added);
        assert_eq!(extra.count(AccountingType::Added), 3);

        let util = outcome(&comparison, "src/util.c").result().expect("analyzed");
        assert_eq!(util.change_type(), FileChangeType::Deleted);
        assert_eq!(util.count(AccountingType::Deleted), 3);
        assert_eq!(util.count(AccountingType::Total), 0);
    }

    #[test]
    fn test_include_identical_files() {
        let options = AnalysisOptions::parse("-includeIdentical").expect("valid options");
        let comparison = compare_trees(&options);
        let readme = outcome(&comparison, "README.txt")
            .result()
            .expect("README analyzed");

        assert_eq!(readme.change_type(), FileChangeType::Unchanged);
        assert_eq!(readme.count(AccountingType::Base), 1);
        assert_eq!(comparison.totals().skipped, 0);
        assert_eq!(comparison.totals().files.get(FileChangeType::Unchanged), 1);
    }

    #[test]
    fn test_binary_file_fails_alone() {
        let scratch = TempDir::new().expect("temp dir");
        let before = scratch_copy("before", &scratch);
        let after = scratch_copy("after", &scratch);
        fs::write(before.join("logo.png"), b"\x89PNG\0\x01").expect("write");
        fs::write(after.join("logo.png"), b"\x89PNG\0\x02").expect("write");

        let registry = FilterRegistry::builtin().expect("builtin filters");
        let sources = resolve_sources(&[before, after]).expect("sources resolve");
        let labels = vec!["before".to_string(), "after".to_string()];
        let comparison =
            compare_sources(&sources, &labels, &registry, &AnalysisOptions::default(), true);

        assert_eq!(comparison.totals().failed, 1);
        assert_eq!(comparison.totals().lines, LocCounts::new(8, 3, 2, 3));
        let (path, error) = comparison.failures().next().expect("one failure");
        assert_eq!(path, "logo.png");
        assert!(error.contains("binary"), "{error}");
    }
}

// ============================================================================
// Three-Way Tests
// ============================================================================

mod three_way_tests {
    use super::*;

    #[test]
    fn test_diff3_fixture() {
        let roots = vec![
            fixture_path("three_way/base.txt"),
            fixture_path("three_way/a.txt"),
            fixture_path("three_way/b.txt"),
        ];
        let registry = FilterRegistry::builtin().expect("builtin filters");
        let sources = resolve_sources(&roots).expect("sources resolve");
        assert_eq!(sources.len(), 1);

        let comparison = compare_sources(
            &sources,
            &cli::version_labels(3),
            &registry,
            &AnalysisOptions::default(),
            true,
        );
        let result = comparison.outcomes()[0].result().expect("analyzed");

        assert_eq!(result.counts(), LocCounts::new(6, 2, 1, 0));
        assert_eq!(result.version_labels(), &["base", "a", "b"]);
        assert!(result
            .fragments()
            .iter()
            .any(|f| f.origin == Some(MergeClass::DeletedByBoth) && f.text() == "lazy\ndogs.\n"));
    }
}

// ============================================================================
// Command Handler Tests
// ============================================================================

mod command_tests {
    use super::*;

    fn compare_config(versions: Vec<PathBuf>, app: &AppConfig) -> CompareConfig {
        CompareConfig::from_app_config(app, versions).expect("valid config")
    }

    #[test]
    fn test_diff_writes_html_report() {
        let scratch = TempDir::new().expect("temp dir");
        let before = scratch_copy("before", &scratch);
        let after = scratch_copy("after", &scratch);
        let report = scratch.path().join("redline.html");

        let app = AppConfig::builder()
            .output_file(Some(report.clone()))
            .quiet(true)
            .build();
        let registry = FilterRegistry::builtin().expect("builtin filters");
        let code = cli::run_diff(compare_config(vec![before, after], &app), &registry)
            .expect("diff runs");
        assert_eq!(code, exit_codes::SUCCESS);

        let html = fs::read_to_string(report).expect("report written");
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<h2>Added Files (1)</h2>"));
        assert!(html.contains("id=\"file-src-main-c\""));
        assert!(html.contains("<span class=\"comment\">/* Entry point. */</span>"));
    }

    #[test]
    fn test_diff_fail_on_change() {
        let scratch = TempDir::new().expect("temp dir");
        let before = scratch_copy("before", &scratch);
        let after = scratch_copy("after", &scratch);

        let app = AppConfig::builder()
            .output_format(ReportFormat::Count)
            .output_file(Some(scratch.path().join("count.txt")))
            .fail_on_change(true)
            .quiet(true)
            .build();
        let registry = FilterRegistry::builtin().expect("builtin filters");
        let code = cli::run_diff(compare_config(vec![before, after], &app), &registry)
            .expect("diff runs");
        assert_eq!(code, exit_codes::CHANGES_DETECTED);
        assert_eq!(
            fs::read_to_string(scratch.path().join("count.txt")).expect("count written"),
            "13\n"
        );
    }

    #[test]
    fn test_count_cobol_flags() {
        let scratch = TempDir::new().expect("temp dir");
        let tree = scratch_copy("cobol", &scratch);
        let out = scratch.path().join("count.txt");
        let registry = FilterRegistry::builtin().expect("builtin filters");

        let plain = AppConfig::builder()
            .output_format(ReportFormat::Count)
            .output_file(Some(out.clone()))
            .quiet(true)
            .build();
        cli::run_count(compare_config(vec![tree.clone()], &plain), &registry).expect("count runs");
        assert_eq!(fs::read_to_string(&out).expect("count written"), "5\n");

        let flagged = AppConfig::builder()
            .output_format(ReportFormat::Count)
            .output_file(Some(out.clone()))
            .options(Some("-countEnd -countExit -countPeriod".to_string()))
            .quiet(true)
            .build();
        cli::run_count(compare_config(vec![tree], &flagged), &registry).expect("count runs");
        assert_eq!(fs::read_to_string(&out).expect("count written"), "8\n");
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let app = AppConfig::builder().quiet(true).build();
        let registry = FilterRegistry::builtin().expect("builtin filters");
        let result = cli::run_diff(
            compare_config(
                vec![fixture_path("no-such-tree"), fixture_path("after")],
                &app,
            ),
            &registry,
        );
        let message = result.expect_err("missing root").to_string();
        assert!(message.contains("no-such-tree"), "{message}");
    }
}

// ============================================================================
// Report Tests
// ============================================================================

mod report_tests {
    use super::*;

    #[test]
    fn test_every_format_renders_the_tree_comparison() {
        let comparison = compare_trees(&AnalysisOptions::default());
        for format in [
            ReportFormat::Summary,
            ReportFormat::Count,
            ReportFormat::Json,
            ReportFormat::Redline,
            ReportFormat::Html,
        ] {
            let report = create_reporter_with_options(format, false)
                .generate(&comparison, &ReportConfig::default())
                .unwrap_or_else(|e| panic!("{format} report failed: {e}"));
            assert!(!report.is_empty(), "{format} report is empty");
        }
    }

    #[test]
    fn test_json_report_matches_totals() {
        let comparison = compare_trees(&AnalysisOptions::default());
        let json = create_reporter_with_options(ReportFormat::Json, false)
            .generate(&comparison, &ReportConfig::default())
            .expect("json renders");
        let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");

        assert_eq!(value["totals"]["lines"]["base"], 8);
        assert_eq!(value["totals"]["lines"]["total"], 13);
        assert_eq!(value["totals"]["new_and_changed"], 5);
        assert_eq!(value["files"][0]["status"], "skipped");
    }
}
