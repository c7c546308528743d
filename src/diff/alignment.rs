//! Alignment entries produced by the sequence diff engine.

use serde::{Deserialize, Serialize};

/// How one step of an alignment relates the two input sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlignmentTag {
    /// The item is present in both sequences
    Matched,
    /// The item is present only in the first (X) sequence
    DeletedFromX,
    /// The item is present only in the second (Y) sequence
    InsertedIntoY,
}

/// One step of an alignment between sequences X and Y.
///
/// Positions index into the original slices. Filtering a full alignment to
/// the entries with `x` present yields `0..x.len()` in order, and likewise
/// for `y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AlignmentEntry {
    /// Position in X, if the entry touches X
    pub x: Option<usize>,
    /// Position in Y, if the entry touches Y
    pub y: Option<usize>,
    /// Relationship between the two sides
    pub tag: AlignmentTag,
}

impl AlignmentEntry {
    #[must_use]
    pub const fn matched(x: usize, y: usize) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            tag: AlignmentTag::Matched,
        }
    }

    #[must_use]
    pub const fn deleted(x: usize) -> Self {
        Self {
            x: Some(x),
            y: None,
            tag: AlignmentTag::DeletedFromX,
        }
    }

    #[must_use]
    pub const fn inserted(y: usize) -> Self {
        Self {
            x: None,
            y: Some(y),
            tag: AlignmentTag::InsertedIntoY,
        }
    }

    #[must_use]
    pub fn is_matched(&self) -> bool {
        self.tag == AlignmentTag::Matched
    }
}

/// Number of non-matched entries, i.e. the length of the edit script.
#[must_use]
pub fn edit_count(alignment: &[AlignmentEntry]) -> usize {
    alignment.iter().filter(|e| !e.is_matched()).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_set_tags() {
        assert!(AlignmentEntry::matched(0, 3).is_matched());
        assert_eq!(AlignmentEntry::deleted(2).y, None);
        assert_eq!(AlignmentEntry::inserted(5).x, None);
    }

    #[test]
    fn test_edit_count() {
        let alignment = vec![
            AlignmentEntry::matched(0, 0),
            AlignmentEntry::deleted(1),
            AlignmentEntry::inserted(1),
            AlignmentEntry::matched(2, 2),
        ];
        assert_eq!(edit_count(&alignment), 2);
    }
}
