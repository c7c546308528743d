//! Sequence alignment and three-way merging.
//!
//! This module provides:
//! - [`diff`]: a shortest-edit-script alignment between two sequences with a
//!   caller-supplied equality, so callers decide what "the same line" means
//! - [`merge`]: a provenance-tagged merge of two descendants against a base,
//!   built from two pairwise alignments
//!
//! Both are pure functions over borrowed slices and can run on any number of
//! threads at once.

mod alignment;
mod merge;
mod myers;

pub use alignment::{edit_count, AlignmentEntry, AlignmentTag};
pub use merge::{merge, MergeClass, MergedItem};
pub use myers::{diff, MyersDiff};
