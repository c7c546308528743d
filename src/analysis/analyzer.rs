//! The multi-version line-of-code analyzer.
//!
//! Two versions are compared with one pairwise diff; three versions are
//! read as {base, A, B} and merged. Either way the aligned units are folded
//! into counts and redline fragments:
//!
//! - matched lines are Base; a changed comment still renders as `-`/`+`
//! - unmatched lines between two anchors form a hunk; within a hunk,
//!   significant deletions and insertions pair up as Modified and the
//!   remainder is Deleted or Added
//! - insignificant lines render but are never counted

use super::line::{Line, Version};
use super::options::AnalysisOptions;
use super::result::{AccountingType, DiffFragment, DiffResult, FileChangeType, LocCounts};
use crate::diff::{diff, merge, MergeClass};
use crate::error::{LocDiffError, Result};
use crate::filter::{FilterRegistry, LanguageFilter};
use xxhash_rust::xxh3::xxh3_64;

// ============================================================================
// Inputs
// ============================================================================

/// Raw content of one version of a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionInput {
    pub label: String,
    /// `None` when the file does not exist in this version
    pub content: Option<Vec<u8>>,
}

impl VersionInput {
    #[must_use]
    pub fn new(label: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            label: label.into(),
            content: Some(content.into()),
        }
    }

    #[must_use]
    pub fn absent(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            content: None,
        }
    }
}

fn all_identical(versions: &[VersionInput]) -> bool {
    let mut hashes = versions
        .iter()
        .map(|v| v.content.as_deref().map(xxh3_64));
    match hashes.next() {
        Some(Some(first)) => hashes.all(|h| h == Some(first)),
        _ => false,
    }
}

// ============================================================================
// Analyzer
// ============================================================================

/// Decodes, tokenizes and analyzes the versions of one file.
///
/// Holds only shared read-only state, so one analyzer can serve any number
/// of threads.
#[derive(Debug, Clone)]
pub struct DiffAnalyzer<'r> {
    registry: &'r FilterRegistry,
    options: AnalysisOptions,
}

impl<'r> DiffAnalyzer<'r> {
    #[must_use]
    pub const fn new(registry: &'r FilterRegistry, options: AnalysisOptions) -> Self {
        Self { registry, options }
    }

    /// Analyze one file.
    ///
    /// Returns `Ok(None)` when identical files are skipped and the versions
    /// are byte-identical or differ in nothing significant. A version that
    /// cannot be decoded fails this file only, with [`LocDiffError::Decode`].
    pub fn analyze_file(
        &self,
        file_name: &str,
        versions: &[VersionInput],
    ) -> Result<Option<DiffResult>> {
        if versions.len() < 2 {
            return Err(LocDiffError::invalid_request(format!(
                "{file_name}: at least two versions are required, got {}",
                versions.len()
            )));
        }

        if all_identical(versions) && self.options.skip_identical {
            tracing::debug!("Skipping identical file {}", file_name);
            return Ok(None);
        }

        let texts = versions
            .iter()
            .map(|version| {
                version
                    .content
                    .as_deref()
                    .map(|bytes| self.options.encoding.decode(bytes))
                    .transpose()
                    .map_err(|e| {
                        LocDiffError::decode(format!("{file_name} ({})", version.label), e)
                    })
            })
            .collect::<Result<Vec<Option<String>>>>()?;

        let first_line = texts.iter().flatten().find_map(|text| text.lines().next());
        let filter = self
            .registry
            .select(file_name, first_line, self.options.language.as_deref());
        tracing::trace!("Using filter '{}' for {}", filter.name(), file_name);

        let tokenized: Vec<Version> = versions
            .iter()
            .zip(&texts)
            .map(|(version, text)| match text {
                Some(text) => {
                    Version::tokenize(&version.label, text, filter, &self.options.filter)
                }
                None => Version::absent(&version.label),
            })
            .collect();

        let mut result = analyze(file_name, &tokenized, filter)?;
        // Bytes may differ while nothing significant does, e.g. whitespace.
        if result.change_type() == FileChangeType::Unchanged {
            if self.options.skip_identical {
                tracing::debug!("Skipping {} with no significant changes", file_name);
                return Ok(None);
            }
            if !self.options.show_identical_redlines {
                result.clear_fragments();
            }
        }
        Ok(Some(result))
    }
}

/// Count and render already tokenized versions of a file.
///
/// Two versions are compared directly and three are read as {base, A, B}.
/// With more than three, the first and last are compared.
pub fn analyze(
    file_name: &str,
    versions: &[Version],
    filter: &dyn LanguageFilter,
) -> Result<DiffResult> {
    let units = match versions {
        [] | [_] => {
            return Err(LocDiffError::invalid_request(format!(
                "{file_name}: at least two versions are required, got {}",
                versions.len()
            )))
        }
        [before, after] => pairwise_units(before, after),
        [base, a, b] => three_way_units(base, a, b),
        [first, .., last] => {
            tracing::debug!(
                "{}: {} versions given, comparing first and last",
                file_name,
                versions.len()
            );
            pairwise_units(first, last)
        }
    };

    let mut tally = Tally::default();
    for unit in units {
        tally.record(unit);
    }
    let (counts, fragments) = tally.finish();

    let first = &versions[0];
    let last = &versions[versions.len() - 1];
    let change_type = if !first.exists() {
        FileChangeType::Added
    } else if !last.exists() {
        FileChangeType::Deleted
    } else if !counts.has_changes() && !fragments.iter().any(DiffFragment::is_change) {
        FileChangeType::Unchanged
    } else {
        FileChangeType::Modified
    };

    Ok(DiffResult::new(
        file_name,
        filter.name(),
        versions.iter().map(|v| v.label().to_string()).collect(),
        change_type,
        counts,
        fragments,
    ))
}

// ============================================================================
// Alignment units
// ============================================================================

#[derive(Debug, Clone, Copy)]
enum Unit<'v> {
    Matched { before: &'v Line, after: &'v Line },
    Removed(&'v Line, Option<MergeClass>),
    Inserted(&'v Line, Option<MergeClass>),
}

fn pairwise_units<'v>(before: &'v Version, after: &'v Version) -> Vec<Unit<'v>> {
    let (x, y) = (before.lines(), after.lines());
    diff(x, y, |a, b| a.key() == b.key())
        .into_iter()
        .map(|entry| match (entry.x, entry.y) {
            (Some(i), Some(j)) => Unit::Matched {
                before: &x[i],
                after: &y[j],
            },
            (Some(i), None) => Unit::Removed(&x[i], None),
            (None, Some(j)) => Unit::Inserted(&y[j], None),
            (None, None) => unreachable!("alignment entry with no position"),
        })
        .collect()
}

fn three_way_units<'v>(base: &'v Version, a: &'v Version, b: &'v Version) -> Vec<Unit<'v>> {
    merge(base.lines(), a.lines(), b.lines(), |x, y| x.key() == y.key())
        .into_iter()
        .map(|item| match item.class {
            MergeClass::Unchanged => {
                let in_a = item.a_pos.map_or(item.value, |p| &a.lines()[p]);
                let in_b = item.b_pos.map_or(item.value, |p| &b.lines()[p]);
                // Show whichever side touched the line's comments, B first.
                let after = if in_b.display_key() != item.value.display_key() {
                    in_b
                } else {
                    in_a
                };
                Unit::Matched {
                    before: item.value,
                    after,
                }
            }
            class if class.is_deletion() => Unit::Removed(item.value, Some(class)),
            class => Unit::Inserted(item.value, Some(class)),
        })
        .collect()
}

// ============================================================================
// Counting fold
// ============================================================================

#[derive(Default)]
struct Tally<'v> {
    counts: LocCounts,
    fragments: Vec<DiffFragment>,
    removed: Vec<(&'v Line, Option<MergeClass>)>,
    inserted: Vec<(&'v Line, Option<MergeClass>)>,
}

impl<'v> Tally<'v> {
    fn record(&mut self, unit: Unit<'v>) {
        match unit {
            Unit::Matched { before, after } => {
                self.close_hunk();
                if after.is_significant() {
                    self.counts.base += 1;
                }
                if before.display_key() == after.display_key() {
                    self.emit(AccountingType::Base, None, after);
                } else {
                    self.emit(AccountingType::Deleted, None, before);
                    self.emit(AccountingType::Added, None, after);
                }
            }
            Unit::Removed(line, origin) => self.removed.push((line, origin)),
            Unit::Inserted(line, origin) => self.inserted.push((line, origin)),
        }
    }

    fn close_hunk(&mut self) {
        let deleted = self.removed.iter().filter(|(l, _)| l.is_significant()).count();
        let added = self.inserted.iter().filter(|(l, _)| l.is_significant()).count();
        let paired = deleted.min(added);
        self.counts.modified += paired;
        self.counts.deleted += deleted - paired;
        self.counts.added += added - paired;

        for (line, origin) in std::mem::take(&mut self.removed) {
            self.emit(AccountingType::Deleted, origin, line);
        }
        for (line, origin) in std::mem::take(&mut self.inserted) {
            self.emit(AccountingType::Added, origin, line);
        }
    }

    fn emit(&mut self, classification: AccountingType, origin: Option<MergeClass>, line: &Line) {
        match self.fragments.last_mut() {
            Some(last) if last.classification == classification && last.origin == origin => {
                last.push_line(line.text(), line.comment_spans());
            }
            _ => {
                let mut fragment = DiffFragment::new(classification, origin);
                fragment.push_line(line.text(), line.comment_spans());
                self.fragments.push(fragment);
            }
        }
    }

    fn finish(mut self) -> (LocCounts, Vec<DiffFragment>) {
        self.close_hunk();
        (self.counts, self.fragments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{FilterOptions, GenericFilter};

    fn registry() -> FilterRegistry {
        FilterRegistry::builtin().expect("builtin filters")
    }

    fn lines(items: &[&str]) -> Vec<u8> {
        items
            .iter()
            .map(|l| format!("{l}\n"))
            .collect::<String>()
            .into_bytes()
    }

    fn analyze_pair(name: &str, before: &str, after: &str) -> DiffResult {
        let registry = registry();
        let analyzer = DiffAnalyzer::new(&registry, AnalysisOptions::default());
        analyzer
            .analyze_file(
                name,
                &[
                    VersionInput::new("before", before),
                    VersionInput::new("after", after),
                ],
            )
            .expect("analysis succeeds")
            .expect("files differ")
    }

    #[test]
    fn test_deletion() {
        let result = analyze_pair("f.txt", "a\nb\nc\n", "a\nc\n");
        assert_eq!(result.counts(), LocCounts::new(2, 1, 0, 0));
        assert_eq!(result.count(AccountingType::Total), 2);
        assert_eq!(result.redline_text(), "a|-b|c|");
        assert_eq!(result.change_type(), FileChangeType::Modified);
    }

    #[test]
    fn test_modification() {
        let result = analyze_pair("f.txt", "a\nb\nc\n", "a\nd\nc\n");
        assert_eq!(result.counts(), LocCounts::new(2, 0, 1, 0));
        assert_eq!(result.count(AccountingType::Total), 3);
        assert_eq!(result.redline_text(), "a|-b|+d|c|");
    }

    #[test]
    fn test_unpaired_lines_in_hunk() {
        let result = analyze_pair("f.txt", "a\nb\nz\n", "a\nc\nd\ne\nz\n");
        assert_eq!(result.counts(), LocCounts::new(2, 0, 1, 2));
        assert_eq!(result.redline_text(), "a|-b|+c|+d|+e|z|");
    }

    #[test]
    fn test_whitespace_only_change_is_base() {
        let registry = registry();
        let versions = [
            VersionInput::new("before", "int x = 1;\n"),
            VersionInput::new("after", "   int   x = 1;\t\n"),
        ];
        let options = AnalysisOptions::parse("-includeIdentical").expect("valid");
        let result = DiffAnalyzer::new(&registry, options)
            .analyze_file("f.c", &versions)
            .expect("ok")
            .expect("not skipped");
        assert_eq!(result.counts(), LocCounts::new(1, 0, 0, 0));
        assert!(!result.has_changed_fragments());
        assert_eq!(result.change_type(), FileChangeType::Unchanged);
        assert_eq!(result.fragments().len(), 1);

        let options =
            AnalysisOptions::parse("-includeIdentical -noIdenticalRedlines").expect("valid");
        let result = DiffAnalyzer::new(&registry, options)
            .analyze_file("f.c", &versions)
            .expect("ok")
            .expect("not skipped");
        assert!(result.fragments().is_empty());
    }

    #[test]
    fn test_whitespace_only_change_skipped_as_identical() {
        let registry = registry();
        let analyzer = DiffAnalyzer::new(&registry, AnalysisOptions::default());
        let versions = [
            VersionInput::new("before", "int x;\n"),
            VersionInput::new("after", "int  x;\n"),
        ];
        assert!(analyzer.analyze_file("f.c", &versions).expect("ok").is_none());
    }

    #[test]
    fn test_comment_only_change_is_base_but_rendered() {
        let result = analyze_pair("f.c", "x = 1; // old\n", "x = 1; // new\n");
        assert_eq!(result.counts(), LocCounts::new(1, 0, 0, 0));
        assert_eq!(result.redline_text(), "-x = 1; // old|+x = 1; // new|");
        assert_eq!(result.fragments()[1].comment_spans(), &[7..13]);
        assert_eq!(result.change_type(), FileChangeType::Modified);
    }

    #[test]
    fn test_comment_change_after_rust_lifetime_is_base() {
        let result = analyze_pair(
            "lib.rs",
            "fn f<'a>(x: &str) // old\n",
            "fn f<'a>(x: &str) // new\n",
        );
        assert_eq!(result.filter_name(), "rust");
        assert_eq!(result.counts(), LocCounts::new(1, 0, 0, 0));
        assert_eq!(result.change_type(), FileChangeType::Modified);
    }

    #[test]
    fn test_insignificant_lines_rendered_not_counted() {
        let result = analyze_pair("f.c", "a;\n", "a;\n\n// note\nb;\n");
        assert_eq!(result.counts(), LocCounts::new(1, 0, 0, 1));
        assert_eq!(result.fragments().len(), 2);
        assert_eq!(result.fragments()[1].line_count(), 3);
    }

    #[test]
    fn test_comment_lines_do_not_pair_as_modified() {
        let result = analyze_pair("f.c", "a;\n// gone\nz;\n", "a;\nb;\nz;\n");
        assert_eq!(result.counts(), LocCounts::new(2, 0, 0, 1));
    }

    #[test]
    fn test_identical_files_skipped() {
        let registry = registry();
        let analyzer = DiffAnalyzer::new(&registry, AnalysisOptions::default());
        let versions = [VersionInput::new("a", "x\n"), VersionInput::new("b", "x\n")];
        assert!(analyzer.analyze_file("f", &versions).expect("ok").is_none());
    }

    #[test]
    fn test_identical_files_included_on_request() {
        let registry = registry();
        let versions = [VersionInput::new("a", "x\n"), VersionInput::new("b", "x\n")];

        let options = AnalysisOptions::parse("-includeIdentical").expect("valid");
        let result = DiffAnalyzer::new(&registry, options)
            .analyze_file("f", &versions)
            .expect("ok")
            .expect("not skipped");
        assert_eq!(result.counts(), LocCounts::new(1, 0, 0, 0));
        assert_eq!(result.fragments().len(), 1);

        let options =
            AnalysisOptions::parse("-includeIdentical -noIdenticalRedlines").expect("valid");
        let result = DiffAnalyzer::new(&registry, options)
            .analyze_file("f", &versions)
            .expect("ok")
            .expect("not skipped");
        assert_eq!(result.counts().base, 1);
        assert!(result.fragments().is_empty());
    }

    #[test]
    fn test_absent_versions() {
        let registry = registry();
        let analyzer = DiffAnalyzer::new(&registry, AnalysisOptions::default());

        let added = analyzer
            .analyze_file(
                "new.txt",
                &[VersionInput::absent("before"), VersionInput::new("after", "a\nb\n")],
            )
            .expect("ok")
            .expect("differs");
        assert_eq!(added.change_type(), FileChangeType::Added);
        assert_eq!(added.counts(), LocCounts::new(0, 0, 0, 2));

        let deleted = analyzer
            .analyze_file(
                "old.txt",
                &[VersionInput::new("before", "a\n"), VersionInput::absent("after")],
            )
            .expect("ok")
            .expect("differs");
        assert_eq!(deleted.change_type(), FileChangeType::Deleted);
        assert_eq!(deleted.counts(), LocCounts::new(0, 1, 0, 0));
    }

    #[test]
    fn test_too_few_versions() {
        let registry = registry();
        let analyzer = DiffAnalyzer::new(&registry, AnalysisOptions::default());
        let err = analyzer
            .analyze_file("f", &[VersionInput::new("only", "x")])
            .expect_err("one version");
        assert!(matches!(err, LocDiffError::InvalidRequest(_)));
        assert!(matches!(
            analyze("f", &[], &GenericFilter::new()),
            Err(LocDiffError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_binary_version_fails_file() {
        let registry = registry();
        let analyzer = DiffAnalyzer::new(&registry, AnalysisOptions::default());
        let err = analyzer
            .analyze_file(
                "blob.bin",
                &[VersionInput::new("a", "x"), VersionInput::new("b", b"x\0y".to_vec())],
            )
            .expect_err("binary");
        assert!(err.as_decode_error().is_some_and(|e| e.is_binary()));
    }

    #[test]
    fn test_forced_language() {
        let registry = registry();
        let options = AnalysisOptions::parse("-lang=c").expect("valid");
        let analyzer = DiffAnalyzer::new(&registry, options);
        let result = analyzer
            .analyze_file(
                "notes.txt",
                &[VersionInput::new("a", "x; // a\n"), VersionInput::new("b", "x; // b\n")],
            )
            .expect("ok")
            .expect("differs");
        assert_eq!(result.filter_name(), "c");
        assert_eq!(result.counts(), LocCounts::new(1, 0, 0, 0));
    }

    #[test]
    fn test_cobol_flags() {
        let registry = registry();
        let before = "000100     MOVE A TO B.\n";
        let after = "000100     MOVE A TO B.\n000200     END-IF\n000300     .\n";
        let versions = [VersionInput::new("a", before), VersionInput::new("b", after)];

        let plain = DiffAnalyzer::new(&registry, AnalysisOptions::default())
            .analyze_file("p.cbl", &versions)
            .expect("ok")
            .expect("differs");
        assert_eq!(plain.counts(), LocCounts::new(1, 0, 0, 0));

        let options = AnalysisOptions::parse("-countEnd -countPeriod").expect("valid");
        let counted = DiffAnalyzer::new(&registry, options)
            .analyze_file("p.cbl", &versions)
            .expect("ok")
            .expect("differs");
        assert_eq!(counted.counts(), LocCounts::new(1, 0, 0, 2));
    }

    #[test]
    fn test_cobol_comment_with_blank_margin_not_counted() {
        let registry = registry();
        let analyzer = DiffAnalyzer::new(&registry, AnalysisOptions::default());
        let result = analyzer
            .analyze_file(
                "p.cbl",
                &[
                    VersionInput::absent("a"),
                    VersionInput::new("b", "      * THIS IS A COMMENT LINE\n       MOVE A TO B.\n"),
                ],
            )
            .expect("ok")
            .expect("added");
        assert_eq!(result.counts(), LocCounts::new(0, 0, 0, 1));
    }

    #[test]
    fn test_three_way_mutual_deletion() {
        let registry = registry();
        let analyzer = DiffAnalyzer::new(&registry, AnalysisOptions::default());
        let base = lines(&["The", "quick", "brown", "fox", "jumps", "over", "the", "lazy", "dogs."]);
        let a = lines(&["The", "quick", "brown", "fox", "jumps", "over", "the"]);
        let b = lines(&["The", "quick", "red", "fox", "jumps", "over", "the"]);

        let result = analyzer
            .analyze_file(
                "fox.txt",
                &[
                    VersionInput::new("base", base),
                    VersionInput::new("a", a),
                    VersionInput::new("b", b),
                ],
            )
            .expect("ok")
            .expect("differs");

        let both: Vec<&DiffFragment> = result
            .fragments()
            .iter()
            .filter(|f| f.origin == Some(MergeClass::DeletedByBoth))
            .collect();
        assert_eq!(both.len(), 1);
        assert_eq!(both[0].text(), "lazy\ndogs.\n");
        assert!(result
            .fragments()
            .iter()
            .any(|f| f.origin == Some(MergeClass::DeletedByB) && f.text() == "brown\n"));
        assert!(result
            .fragments()
            .iter()
            .any(|f| f.origin == Some(MergeClass::InsertedByB) && f.text() == "red\n"));
        assert_eq!(result.counts(), LocCounts::new(6, 2, 1, 0));
        assert_eq!(result.version_labels(), &["base", "a", "b"]);
    }

    #[test]
    fn test_three_way_comment_change_on_one_side() {
        let registry = registry();
        let analyzer = DiffAnalyzer::new(&registry, AnalysisOptions::default());
        let result = analyzer
            .analyze_file(
                "f.c",
                &[
                    VersionInput::new("base", "x; // old\ny;\n"),
                    VersionInput::new("a", "x; // new\ny;\n"),
                    VersionInput::new("b", "x; // old\ny;\nz;\n"),
                ],
            )
            .expect("ok")
            .expect("differs");

        assert_eq!(result.counts(), LocCounts::new(2, 0, 0, 1));
        assert_eq!(result.redline_text(), "-x; // old|+x; // new|y;|+z;|");
        let last = result.fragments().last().expect("fragments");
        assert_eq!(last.origin, Some(MergeClass::InsertedByB));
    }

    #[test]
    fn test_more_than_three_versions_compare_ends() {
        let filter = GenericFilter::new();
        let options = FilterOptions::default();
        let versions: Vec<Version> = ["a\n", "b\n", "c\n", "a\nd\n"]
            .iter()
            .enumerate()
            .map(|(i, text)| Version::tokenize(format!("v{i}"), text, &filter, &options))
            .collect();
        let result = analyze("f", &versions, &filter).expect("ok");
        assert_eq!(result.counts(), LocCounts::new(1, 0, 0, 1));
        assert_eq!(result.redline_text(), "a|+d|");
    }
}
