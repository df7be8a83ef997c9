//! 1-D interval index used as a pre-filter for overlap candidate lookup.
//!
//! Runs alongside the R-tree: either index alone already returns a superset
//! of true overlaps, querying both guards against gaps in one of them. The
//! exact geometric check downstream is the correctness gate, so this only
//! needs to return candidate supersets, not exact overlap sets.

use rustc_hash::FxHashSet;

/// A closed interval `[min, max]` tagged with a cluster id.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Interval {
    min: f32,
    max: f32,
    id: usize,
}

/// Interval index sorted by interval start.
///
/// There is no deletion: the tree is rebuilt per postprocessing pass rather
/// than mutated incrementally. `find_containing` binary-searches to the
/// insertion point and scans outward, which is not O(log n) when many
/// intervals share a start value; candidate sets stay small in practice, so
/// this is a known performance limitation rather than a correctness issue.
#[derive(Default)]
pub struct IntervalTree {
    intervals: Vec<Interval>,
}

impl IntervalTree {
    /// Create an empty tree.
    pub const fn new() -> Self {
        Self {
            intervals: Vec::new(),
        }
    }

    /// Insert `[min, max]` for `id`, keeping the vector sorted by `min`.
    pub fn insert(&mut self, min: f32, max: f32, id: usize) {
        let pos = self
            .intervals
            .binary_search_by(|interval| interval.min.total_cmp(&min))
            .unwrap_or_else(|e| e);
        self.intervals.insert(pos, Interval { min, max, id });
    }

    /// Ids of all intervals containing `point` (inclusive on both ends).
    pub fn find_containing(&self, point: f32) -> FxHashSet<usize> {
        let mut result = FxHashSet::default();

        let pos = self
            .intervals
            .binary_search_by(|interval| interval.min.total_cmp(&point))
            .unwrap_or_else(|e| e);

        // Intervals starting before the point: walk backward while they can
        // still reach it. Sortedness is by min only, so stop at the first
        // interval that ends before the point.
        for interval in self.intervals[..pos].iter().rev() {
            if point <= interval.max {
                result.insert(interval.id);
            } else {
                break;
            }
        }

        // Intervals starting at or after the point: walk forward while their
        // start has not passed the point.
        for interval in &self.intervals[pos..] {
            if interval.min > point {
                break;
            }
            if point <= interval.max {
                result.insert(interval.id);
            }
        }

        result
    }

    /// Number of stored intervals.
    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    /// Whether the tree holds no intervals.
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree(intervals: &[(f32, f32, usize)]) -> IntervalTree {
        let mut t = IntervalTree::new();
        for &(min, max, id) in intervals {
            t.insert(min, max, id);
        }
        t
    }

    fn sorted(set: FxHashSet<usize>) -> Vec<usize> {
        let mut v: Vec<usize> = set.into_iter().collect();
        v.sort_unstable();
        v
    }

    #[test]
    fn point_inside_single_interval() {
        let t = tree(&[(0.0, 10.0, 1)]);
        assert_eq!(sorted(t.find_containing(5.0)), vec![1]);
    }

    #[test]
    fn boundaries_are_inclusive() {
        let t = tree(&[(0.0, 10.0, 1)]);
        assert_eq!(sorted(t.find_containing(0.0)), vec![1]);
        assert_eq!(sorted(t.find_containing(10.0)), vec![1]);
        assert!(t.find_containing(10.1).is_empty());
    }

    #[test]
    fn overlapping_intervals_all_reported() {
        let t = tree(&[(0.0, 10.0, 1), (5.0, 15.0, 2), (8.0, 9.0, 3), (12.0, 20.0, 4)]);
        assert_eq!(sorted(t.find_containing(8.5)), vec![1, 2, 3]);
        assert_eq!(sorted(t.find_containing(13.0)), vec![2, 4]);
    }

    #[test]
    fn shared_start_values() {
        // Several intervals with the same min must all be found despite the
        // backward scan's early exit.
        let t = tree(&[(5.0, 6.0, 1), (5.0, 20.0, 2), (5.0, 10.0, 3)]);
        assert_eq!(sorted(t.find_containing(5.5)), vec![1, 2, 3]);
    }

    #[test]
    fn insertion_keeps_sorted_order() {
        let t = tree(&[(9.0, 12.0, 1), (1.0, 2.0, 2), (4.0, 11.0, 3)]);
        assert_eq!(t.len(), 3);
        assert_eq!(sorted(t.find_containing(10.0)), vec![1, 3]);
    }

    #[test]
    fn empty_tree_finds_nothing() {
        let t = IntervalTree::new();
        assert!(t.is_empty());
        assert!(t.find_containing(1.0).is_empty());
    }
}
