//! Shortest-edit-script alignment (Myers, "An O(ND) Difference Algorithm").
//!
//! A range is first trimmed of its common prefix, and an empty side is
//! answered directly. Small edit scripts then come from the greedy forward
//! pass and a recorded trace, which keeps the earliest matches on ties. The
//! trace grows with the square of the edit distance, so a range needing more
//! than `TRACE_LIMIT` edits is split at its middle snake and each half is
//! solved on its own. Working memory stays linear in the input lengths.

use super::alignment::{AlignmentEntry, AlignmentTag};
use std::ops::{Index, IndexMut, Range};

/// Largest edit distance solved from a recorded trace.
const TRACE_LIMIT: usize = 1024;

/// Frontier snapshots: `trace[d - 1]` holds diagonals `-(d-1)..=(d-1)` as they
/// were before round `d`.
type Trace = Vec<Vec<usize>>;

/// Furthest-reaching x per diagonal, indexed by signed diagonal.
struct Frontier {
    offset: isize,
    cells: Vec<usize>,
}

impl Frontier {
    /// Room for diagonals `-(max_d + 1)..=(max_d + 1)`.
    fn new(max_d: usize) -> Self {
        Self {
            offset: max_d as isize + 1,
            cells: vec![0; 2 * max_d + 3],
        }
    }
}

impl Index<isize> for Frontier {
    type Output = usize;

    fn index(&self, k: isize) -> &usize {
        &self.cells[(self.offset + k) as usize]
    }
}

impl IndexMut<isize> for Frontier {
    fn index_mut(&mut self, k: isize) -> &mut usize {
        &mut self.cells[(self.offset + k) as usize]
    }
}

/// Myers diff over two slices with a caller-supplied equality.
pub struct MyersDiff<'d, T, F> {
    x: &'d [T],
    y: &'d [T],
    equals: F,
}

impl<'d, T, F> MyersDiff<'d, T, F>
where
    F: Fn(&T, &T) -> bool,
{
    pub const fn new(x: &'d [T], y: &'d [T], equals: F) -> Self {
        Self { x, y, equals }
    }

    fn same(&self, x: usize, y: usize) -> bool {
        (self.equals)(&self.x[x], &self.y[y])
    }

    fn common_prefix(&self, xs: &Range<usize>, ys: &Range<usize>) -> usize {
        xs.clone()
            .zip(ys.clone())
            .take_while(|&(x, y)| self.same(x, y))
            .count()
    }

    fn common_suffix(&self, xs: &Range<usize>, ys: &Range<usize>) -> usize {
        xs.clone()
            .rev()
            .zip(ys.clone().rev())
            .take_while(|&(x, y)| self.same(x, y))
            .count()
    }

    /// Greedy forward pass over `xs` by `ys`, or `None` once more than
    /// `TRACE_LIMIT` edits would be needed.
    fn shortest_edit(&self, xs: &Range<usize>, ys: &Range<usize>) -> Option<Trace> {
        let (n, m) = (xs.len(), ys.len());
        let max = (n + m).min(TRACE_LIMIT) as isize;
        let mut v = Frontier::new(max as usize);
        let mut trace = Vec::new();

        for d in 0..=max {
            if d > 0 {
                trace.push((-(d - 1)..=(d - 1)).map(|k| v[k]).collect());
            }

            let mut k = -d;
            while k <= d {
                // Ties go to the deletion so removed lines precede added ones.
                let mut x = if k == -d || (k != d && v[k - 1] < v[k + 1]) {
                    v[k + 1]
                } else {
                    v[k - 1] + 1
                };
                let mut y = (x as isize - k) as usize;
                while x < n && y < m && self.same(xs.start + x, ys.start + y) {
                    x += 1;
                    y += 1;
                }
                v[k] = x;
                if x >= n && y >= m {
                    return Some(trace);
                }
                k += 2;
            }
        }
        None
    }

    /// Walk a trace back from the end of `xs` and `ys`.
    fn backtrack(
        trace: &Trace,
        xs: &Range<usize>,
        ys: &Range<usize>,
        out: &mut Vec<AlignmentEntry>,
    ) {
        let mut x = xs.len() as isize;
        let mut y = ys.len() as isize;
        let mut entries = Vec::with_capacity(xs.len().max(ys.len()));
        let matched = |x: isize, y: isize| {
            AlignmentEntry::matched(xs.start + x as usize, ys.start + y as usize)
        };

        for (round, frontier) in trace.iter().enumerate().rev() {
            let d = round as isize + 1;
            let at = |k: isize| frontier[(k + d - 1) as usize] as isize;
            let k = x - y;
            let came_down = k == -d || (k != d && at(k - 1) < at(k + 1));
            let prev_k = if came_down { k + 1 } else { k - 1 };
            let prev_x = at(prev_k);
            let prev_y = prev_x - prev_k;

            while x > prev_x && y > prev_y {
                x -= 1;
                y -= 1;
                entries.push(matched(x, y));
            }
            if came_down {
                entries.push(AlignmentEntry::inserted(ys.start + prev_y as usize));
            } else {
                entries.push(AlignmentEntry::deleted(xs.start + prev_x as usize));
            }
            x = prev_x;
            y = prev_y;
        }

        while x > 0 && y > 0 {
            x -= 1;
            y -= 1;
            entries.push(matched(x, y));
        }
        assert!(
            x == 0 && y == 0,
            "alignment backtrack ended at ({x}, {y}) instead of the origin"
        );

        entries.reverse();
        out.extend(entries);
    }

    /// Point on an optimal path through `xs` by `ys` that splits its edits
    /// roughly in half. Both ranges are non-empty and differ at both ends.
    fn middle_snake(
        &self,
        xs: &Range<usize>,
        ys: &Range<usize>,
        forward: &mut Frontier,
        backward: &mut Frontier,
    ) -> (usize, usize) {
        let (n, m) = (xs.len(), ys.len());
        let delta = n as isize - m as isize;
        let odd = delta & 1 == 1;
        forward[1] = 0;
        backward[1] = 0;

        for d in 0..=((n + m + 1) / 2) as isize {
            let mut k = -d;
            while k <= d {
                let mut x = if k == -d || (k != d && forward[k - 1] < forward[k + 1]) {
                    forward[k + 1]
                } else {
                    forward[k - 1] + 1
                };
                let (x0, y0) = (x, (x as isize - k) as usize);
                let mut y = y0;
                while x < n && y < m && self.same(xs.start + x, ys.start + y) {
                    x += 1;
                    y += 1;
                }
                forward[k] = x;
                if odd && (k - delta).abs() < d && x + backward[delta - k] >= n {
                    return (xs.start + x0, ys.start + y0);
                }
                k += 2;
            }

            let mut k = -d;
            while k <= d {
                let mut x = if k == -d || (k != d && backward[k - 1] < backward[k + 1]) {
                    backward[k + 1]
                } else {
                    backward[k - 1] + 1
                };
                let mut y = (x as isize - k) as usize;
                while x < n && y < m && self.same(xs.end - 1 - x, ys.end - 1 - y) {
                    x += 1;
                    y += 1;
                }
                backward[k] = x;
                if !odd && (k - delta).abs() <= d && x + forward[delta - k] >= n {
                    return (xs.end - x, ys.end - y);
                }
                k += 2;
            }
        }
        unreachable!("forward and backward searches always meet")
    }

    /// Align `xs` against `ys`, appending entries in order to `out`.
    fn conquer(
        &self,
        mut xs: Range<usize>,
        mut ys: Range<usize>,
        forward: &mut Frontier,
        backward: &mut Frontier,
        out: &mut Vec<AlignmentEntry>,
    ) {
        let prefix = self.common_prefix(&xs, &ys);
        out.extend((0..prefix).map(|i| AlignmentEntry::matched(xs.start + i, ys.start + i)));
        xs.start += prefix;
        ys.start += prefix;

        if xs.is_empty() || ys.is_empty() {
            out.extend(xs.map(AlignmentEntry::deleted));
            out.extend(ys.map(AlignmentEntry::inserted));
            return;
        }
        if let Some(trace) = self.shortest_edit(&xs, &ys) {
            Self::backtrack(&trace, &xs, &ys, out);
            return;
        }

        let suffix = self.common_suffix(&xs, &ys);
        xs.end -= suffix;
        ys.end -= suffix;
        if xs.is_empty() || ys.is_empty() {
            out.extend(xs.clone().map(AlignmentEntry::deleted));
            out.extend(ys.clone().map(AlignmentEntry::inserted));
        } else {
            let (x_mid, y_mid) = self.middle_snake(&xs, &ys, forward, backward);
            self.conquer(xs.start..x_mid, ys.start..y_mid, forward, backward, out);
            self.conquer(x_mid..xs.end, y_mid..ys.end, forward, backward, out);
        }
        out.extend((0..suffix).map(|i| AlignmentEntry::matched(xs.end + i, ys.end + i)));
    }

    /// Compute the alignment, in order from the start of both sequences.
    #[must_use]
    pub fn alignment(&self) -> Vec<AlignmentEntry> {
        let (n, m) = (self.x.len(), self.y.len());
        let max_d = (n + m + 1) / 2 + 1;
        let mut forward = Frontier::new(max_d);
        let mut backward = Frontier::new(max_d);
        let mut entries = Vec::with_capacity(n.max(m));
        self.conquer(0..n, 0..m, &mut forward, &mut backward, &mut entries);
        group_edits(&mut entries);
        entries
    }
}

/// Order each run of edits between two matches as deletions, then insertions.
fn group_edits(entries: &mut [AlignmentEntry]) {
    for run in entries.split_mut(AlignmentEntry::is_matched) {
        run.sort_by_key(|e| (e.tag != AlignmentTag::DeletedFromX, e.x, e.y));
    }
}

/// Align `x` against `y`, minimizing deletions plus insertions.
///
/// Identical inputs produce only matched entries; an empty side produces
/// only deletions or only insertions.
///
/// # Examples
///
/// ```
/// use loc_diff::diff::{diff, AlignmentTag};
///
/// let before = ["a", "b", "c"];
/// let after = ["a", "c"];
/// let tags: Vec<_> = diff(&before, &after, |l, r| l == r)
///     .into_iter()
///     .map(|e| e.tag)
///     .collect();
/// assert_eq!(
///     tags,
///     [AlignmentTag::Matched, AlignmentTag::DeletedFromX, AlignmentTag::Matched]
/// );
/// ```
pub fn diff<T, F>(x: &[T], y: &[T], equals: F) -> Vec<AlignmentEntry>
where
    F: Fn(&T, &T) -> bool,
{
    MyersDiff::new(x, y, equals).alignment()
}
