//! Result types produced by the analyzer.

use crate::diff::MergeClass;
use crate::filter::mark_comments;
use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Range};

// ============================================================================
// Accounting types and counts
// ============================================================================

/// How a line is accounted for.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum AccountingType {
    /// Present, unchanged, in the final version
    Base,
    /// Removed with no counterpart
    Deleted,
    /// Removed and added at the same place
    Modified,
    /// Added with no counterpart
    Added,
    /// Base + Modified + Added
    Total,
}

impl AccountingType {
    pub const ALL: [Self; 5] = [
        Self::Base,
        Self::Deleted,
        Self::Modified,
        Self::Added,
        Self::Total,
    ];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Base => "Base",
            Self::Deleted => "Deleted",
            Self::Modified => "Modified",
            Self::Added => "Added",
            Self::Total => "Total",
        }
    }
}

impl fmt::Display for AccountingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Significant line counts per accounting type.
///
/// Total is derived, so the closure `total = base + modified + added` holds
/// for every value, including sums.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct LocCounts {
    pub base: usize,
    pub deleted: usize,
    pub modified: usize,
    pub added: usize,
}

impl LocCounts {
    #[must_use]
    pub const fn new(base: usize, deleted: usize, modified: usize, added: usize) -> Self {
        Self {
            base,
            deleted,
            modified,
            added,
        }
    }

    #[must_use]
    pub const fn total(&self) -> usize {
        self.base + self.modified + self.added
    }

    /// Added plus modified lines.
    #[must_use]
    pub const fn new_and_changed(&self) -> usize {
        self.added + self.modified
    }

    #[must_use]
    pub const fn get(&self, kind: AccountingType) -> usize {
        match kind {
            AccountingType::Base => self.base,
            AccountingType::Deleted => self.deleted,
            AccountingType::Modified => self.modified,
            AccountingType::Added => self.added,
            AccountingType::Total => self.total(),
        }
    }

    /// Whether anything other than base lines was counted.
    #[must_use]
    pub const fn has_changes(&self) -> bool {
        self.deleted + self.modified + self.added > 0
    }

    /// Every accounting type with its count, in display order.
    #[must_use]
    pub fn as_map(&self) -> IndexMap<AccountingType, usize> {
        AccountingType::ALL
            .iter()
            .map(|&kind| (kind, self.get(kind)))
            .collect()
    }
}

impl Add for LocCounts {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            base: self.base + rhs.base,
            deleted: self.deleted + rhs.deleted,
            modified: self.modified + rhs.modified,
            added: self.added + rhs.added,
        }
    }
}

impl AddAssign for LocCounts {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sum for LocCounts {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

// ============================================================================
// Fragments
// ============================================================================

/// A run of consecutive lines sharing one classification.
///
/// `text` holds every line followed by `\n`. Comment spans are byte ranges
/// into `text`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffFragment {
    /// Base, Deleted or Added
    pub classification: AccountingType,
    /// Which side of a three-way comparison produced the lines
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<MergeClass>,
    text: String,
    comment_spans: Vec<Range<usize>>,
    line_count: usize,
}

impl DiffFragment {
    #[must_use]
    pub const fn new(classification: AccountingType, origin: Option<MergeClass>) -> Self {
        Self {
            classification,
            origin,
            text: String::new(),
            comment_spans: Vec::new(),
            line_count: 0,
        }
    }

    /// Append a line; `spans` are relative to `line`.
    pub fn push_line(&mut self, line: &str, spans: &[Range<usize>]) {
        let offset = self.text.len();
        self.comment_spans
            .extend(spans.iter().map(|s| s.start + offset..s.end + offset));
        self.text.push_str(line);
        self.text.push('\n');
        self.line_count += 1;
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn comment_spans(&self) -> &[Range<usize>] {
        &self.comment_spans
    }

    #[must_use]
    pub const fn line_count(&self) -> usize {
        self.line_count
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.lines()
    }

    /// Text with comment markers inserted.
    #[must_use]
    pub fn marked_text(&self) -> String {
        mark_comments(&self.text, &self.comment_spans)
    }

    /// Deleted or added text.
    #[must_use]
    pub fn is_change(&self) -> bool {
        self.classification != AccountingType::Base
    }
}

// ============================================================================
// File result
// ============================================================================

/// Overall change to a file between its first and last version.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum FileChangeType {
    Added,
    Modified,
    Deleted,
    Unchanged,
}

impl FileChangeType {
    pub const ALL: [Self; 4] = [Self::Added, Self::Modified, Self::Deleted, Self::Unchanged];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Added => "Added",
            Self::Modified => "Modified",
            Self::Deleted => "Deleted",
            Self::Unchanged => "Unchanged",
        }
    }
}

impl fmt::Display for FileChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Counts and redlines for one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffResult {
    file_name: String,
    filter_name: String,
    version_labels: Vec<String>,
    change_type: FileChangeType,
    counts: LocCounts,
    fragments: Vec<DiffFragment>,
}

impl DiffResult {
    #[must_use]
    pub fn new(
        file_name: impl Into<String>,
        filter_name: impl Into<String>,
        version_labels: Vec<String>,
        change_type: FileChangeType,
        counts: LocCounts,
        fragments: Vec<DiffFragment>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            filter_name: filter_name.into(),
            version_labels,
            change_type,
            counts,
            fragments,
        }
    }

    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Name of the language filter that was applied.
    #[must_use]
    pub fn filter_name(&self) -> &str {
        &self.filter_name
    }

    #[must_use]
    pub fn version_labels(&self) -> &[String] {
        &self.version_labels
    }

    #[must_use]
    pub const fn change_type(&self) -> FileChangeType {
        self.change_type
    }

    #[must_use]
    pub const fn counts(&self) -> LocCounts {
        self.counts
    }

    #[must_use]
    pub const fn count(&self, kind: AccountingType) -> usize {
        self.counts.get(kind)
    }

    #[must_use]
    pub fn fragments(&self) -> &[DiffFragment] {
        &self.fragments
    }

    /// Hand the fragments over, leaving the result without them.
    ///
    /// Counts stay available afterwards; a second call yields nothing.
    pub fn take_fragments(&mut self) -> Vec<DiffFragment> {
        std::mem::take(&mut self.fragments)
    }

    #[must_use]
    pub fn has_changed_fragments(&self) -> bool {
        self.fragments.iter().any(DiffFragment::is_change)
    }

    pub(crate) fn clear_fragments(&mut self) {
        self.fragments.clear();
    }

    /// Compact rendering: each line followed by `|`, changed lines
    /// prefixed with `-` or `+`.
    #[must_use]
    pub fn redline_text(&self) -> String {
        let mut out = String::new();
        for fragment in &self.fragments {
            let prefix = match fragment.classification {
                AccountingType::Deleted => "-",
                AccountingType::Added => "+",
                _ => "",
            };
            for line in fragment.lines() {
                out.push_str(prefix);
                out.push_str(line);
                out.push('|');
            }
        }
        out
    }
}
