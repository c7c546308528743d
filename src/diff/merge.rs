//! Three-way merge of two descendants against their common base.
//!
//! `merge` runs two pairwise diffs (base to A, base to B) and walks them
//! together along the base axis. Every base item is emitted once, tagged by
//! which sides kept it; items a side inserted are emitted in the gap where
//! that side inserted them. Within one gap, A's insertions come first.
//!
//! When A and B are element-wise equal there is only one descendant: its
//! insertions are emitted once as `InsertedByA` with both side positions set.

use super::alignment::{AlignmentEntry, AlignmentTag};
use super::myers::diff;
use serde::{Deserialize, Serialize};

/// Provenance of one merged item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MergeClass {
    /// Present in base, A and B
    Unchanged,
    /// Present in base and B, removed by A
    DeletedByA,
    /// Present in base and A, removed by B
    DeletedByB,
    /// Present only in base
    DeletedByBoth,
    /// Present only in A
    InsertedByA,
    /// Present only in B
    InsertedByB,
}

impl MergeClass {
    /// Classify an anchored base item by whether each side retained it.
    #[must_use]
    pub const fn for_base_item(in_a: bool, in_b: bool) -> Self {
        match (in_a, in_b) {
            (true, true) => Self::Unchanged,
            (false, true) => Self::DeletedByA,
            (true, false) => Self::DeletedByB,
            (false, false) => Self::DeletedByBoth,
        }
    }

    /// True for the three deletion classes.
    #[must_use]
    pub const fn is_deletion(self) -> bool {
        matches!(self, Self::DeletedByA | Self::DeletedByB | Self::DeletedByBoth)
    }

    /// True for the two insertion classes.
    #[must_use]
    pub const fn is_insertion(self) -> bool {
        matches!(self, Self::InsertedByA | Self::InsertedByB)
    }
}

/// One logical unit of a three-way merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergedItem<'a, T> {
    /// The item, taken from base for anchored items and from the inserting side otherwise
    pub value: &'a T,
    pub base_pos: Option<usize>,
    pub a_pos: Option<usize>,
    pub b_pos: Option<usize>,
    pub class: MergeClass,
}

/// What one descendant did relative to base.
struct SideProjection {
    /// For each base position, where the side kept it
    retained: Vec<Option<usize>>,
    /// For each gap (before base item `g`, or at the end for `g == base.len()`),
    /// the side positions inserted there
    inserted: Vec<Vec<usize>>,
}

impl SideProjection {
    fn from_alignment(alignment: &[AlignmentEntry], base_len: usize) -> Self {
        let mut retained = vec![None; base_len];
        let mut inserted = vec![Vec::new(); base_len + 1];
        let mut gap = 0;

        for entry in alignment {
            match (entry.tag, entry.x, entry.y) {
                (AlignmentTag::Matched, Some(x), Some(y)) => {
                    retained[x] = Some(y);
                    gap = x + 1;
                }
                (AlignmentTag::DeletedFromX, Some(x), None) => gap = x + 1,
                (AlignmentTag::InsertedIntoY, None, Some(y)) => inserted[gap].push(y),
                _ => unreachable!("malformed alignment entry {entry:?}"),
            }
        }

        Self { retained, inserted }
    }
}

/// Merge `a` and `b` against their common ancestor `base`.
///
/// Identical content inserted independently by both sides is reported twice,
/// once as `InsertedByA` and once as `InsertedByB`. The merger never rejects
/// input.
pub fn merge<'a, T, F>(base: &'a [T], a: &'a [T], b: &'a [T], equals: F) -> Vec<MergedItem<'a, T>>
where
    F: Fn(&T, &T) -> bool,
{
    let side_a = SideProjection::from_alignment(&diff(base, a, &equals), base.len());
    let side_b = SideProjection::from_alignment(&diff(base, b, &equals), base.len());
    let single_descendant = a.len() == b.len() && a.iter().zip(b).all(|(l, r)| equals(l, r));
    let mut merged = Vec::with_capacity(base.len().max(a.len()).max(b.len()));

    for gap in 0..=base.len() {
        merged.extend(side_a.inserted[gap].iter().map(|&pos| MergedItem {
            value: &a[pos],
            base_pos: None,
            a_pos: Some(pos),
            b_pos: single_descendant.then_some(pos),
            class: MergeClass::InsertedByA,
        }));
        if single_descendant {
            debug_assert_eq!(side_a.inserted[gap], side_b.inserted[gap]);
        } else {
            merged.extend(side_b.inserted[gap].iter().map(|&pos| MergedItem {
                value: &b[pos],
                base_pos: None,
                a_pos: None,
                b_pos: Some(pos),
                class: MergeClass::InsertedByB,
            }));
        }

        if let Some(value) = base.get(gap) {
            let a_pos = side_a.retained[gap];
            let b_pos = side_b.retained[gap];
            merged.push(MergedItem {
                value,
                base_pos: Some(gap),
                a_pos,
                b_pos,
                class: MergeClass::for_base_item(a_pos.is_some(), b_pos.is_some()),
            });
        }
    }

    merged
}
