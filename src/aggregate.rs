//! Totals across many analyzed files.
//!
//! [`AggregateCounts::combine`] is plain addition, so results can be folded
//! in any order and from any number of threads.

use crate::analysis::{AccountingType, DiffResult, FileChangeType, LocCounts};
use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign};

/// Number of files per change type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileTally {
    pub added: usize,
    pub modified: usize,
    pub deleted: usize,
    pub unchanged: usize,
}

impl FileTally {
    #[must_use]
    pub const fn get(&self, change_type: FileChangeType) -> usize {
        match change_type {
            FileChangeType::Added => self.added,
            FileChangeType::Modified => self.modified,
            FileChangeType::Deleted => self.deleted,
            FileChangeType::Unchanged => self.unchanged,
        }
    }

    fn bump(&mut self, change_type: FileChangeType) {
        match change_type {
            FileChangeType::Added => self.added += 1,
            FileChangeType::Modified => self.modified += 1,
            FileChangeType::Deleted => self.deleted += 1,
            FileChangeType::Unchanged => self.unchanged += 1,
        }
    }

    #[must_use]
    pub const fn total(&self) -> usize {
        self.added + self.modified + self.deleted + self.unchanged
    }
}

/// Line and file totals for a comparison run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateCounts {
    pub lines: LocCounts,
    pub files: FileTally,
    /// Files skipped because every version was identical
    pub skipped: usize,
    /// Files that could not be analyzed
    pub failed: usize,
}

impl AggregateCounts {
    /// Totals for a single analyzed file.
    #[must_use]
    pub fn from_result(result: &DiffResult) -> Self {
        let mut counts = Self::default();
        counts.record(result);
        counts
    }

    pub fn record(&mut self, result: &DiffResult) {
        self.lines += result.counts();
        self.files.bump(result.change_type());
    }

    pub fn record_skipped(&mut self) {
        self.skipped += 1;
    }

    pub fn record_failed(&mut self) {
        self.failed += 1;
    }

    /// Sum of two totals.
    #[must_use]
    pub fn combine(self, other: Self) -> Self {
        Self {
            lines: self.lines + other.lines,
            files: FileTally {
                added: self.files.added + other.files.added,
                modified: self.files.modified + other.files.modified,
                deleted: self.files.deleted + other.files.deleted,
                unchanged: self.files.unchanged + other.files.unchanged,
            },
            skipped: self.skipped + other.skipped,
            failed: self.failed + other.failed,
        }
    }

    #[must_use]
    pub const fn count(&self, kind: AccountingType) -> usize {
        self.lines.get(kind)
    }

    /// Files seen, whatever happened to them.
    #[must_use]
    pub const fn files_seen(&self) -> usize {
        self.files.total() + self.skipped + self.failed
    }

    /// Whether any line was deleted, modified or added.
    #[must_use]
    pub const fn has_changes(&self) -> bool {
        self.lines.has_changes()
    }
}

impl Add for AggregateCounts {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        self.combine(rhs)
    }
}

impl AddAssign for AggregateCounts {
    fn add_assign(&mut self, rhs: Self) {
        *self = self.combine(rhs);
    }
}

/// Sum the counts of many results.
pub fn aggregate<'a, I>(results: I) -> AggregateCounts
where
    I: IntoIterator<Item = &'a DiffResult>,
{
    results
        .into_iter()
        .fold(AggregateCounts::default(), |mut acc, result| {
            acc.record(result);
            acc
        })
}

// ============================================================================
// Run outcomes
// ============================================================================

/// What happened to one file in a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum FileOutcome {
    Analyzed(DiffResult),
    /// Every version was byte-identical
    Skipped { path: String },
    /// The file could not be read or decoded
    Failed { path: String, error: String },
}

impl FileOutcome {
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            Self::Analyzed(result) => result.file_name(),
            Self::Skipped { path } | Self::Failed { path, .. } => path,
        }
    }

    #[must_use]
    pub const fn result(&self) -> Option<&DiffResult> {
        match self {
            Self::Analyzed(result) => Some(result),
            _ => None,
        }
    }

    /// Totals contributed by this file alone.
    #[must_use]
    pub fn counts(&self) -> AggregateCounts {
        let mut counts = AggregateCounts::default();
        match self {
            Self::Analyzed(result) => counts.record(result),
            Self::Skipped { .. } => counts.record_skipped(),
            Self::Failed { .. } => counts.record_failed(),
        }
        counts
    }
}

/// Every file outcome of a run, ordered by path, with their totals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comparison {
    outcomes: Vec<FileOutcome>,
    totals: AggregateCounts,
}

impl Comparison {
    /// Sort outcomes by path and total them.
    #[must_use]
    pub fn new(mut outcomes: Vec<FileOutcome>) -> Self {
        outcomes.sort_by(|a, b| a.path().cmp(b.path()));
        let totals = outcomes
            .iter()
            .map(FileOutcome::counts)
            .fold(AggregateCounts::default(), AggregateCounts::combine);
        Self { outcomes, totals }
    }

    #[must_use]
    pub fn outcomes(&self) -> &[FileOutcome] {
        &self.outcomes
    }

    #[must_use]
    pub const fn totals(&self) -> &AggregateCounts {
        &self.totals
    }

    /// Analyzed files with the given change type, in path order.
    pub fn results_with(&self, change_type: FileChangeType) -> impl Iterator<Item = &DiffResult> {
        self.outcomes
            .iter()
            .filter_map(FileOutcome::result)
            .filter(move |r| r.change_type() == change_type)
    }

    /// Failed files as (path, error) pairs.
    pub fn failures(&self) -> impl Iterator<Item = (&str, &str)> {
        self.outcomes.iter().filter_map(|outcome| match outcome {
            FileOutcome::Failed { path, error } => Some((path.as_str(), error.as_str())),
            _ => None,
        })
    }
}
