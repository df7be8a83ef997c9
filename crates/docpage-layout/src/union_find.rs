//! Union-Find (disjoint set) over cluster ids.
//!
//! Overlap resolution discovers pairwise "should merge" edges between
//! clusters; this structure folds them into connected components in
//! near-linear time. Path compression plus union by rank.

use rustc_hash::FxHashMap;

/// Disjoint-set structure keyed by cluster id.
pub struct UnionFind {
    parent: FxHashMap<usize, usize>,
    rank: FxHashMap<usize, usize>,
}

impl UnionFind {
    /// Create a new `UnionFind` with each element in its own set.
    pub fn new(elements: impl Iterator<Item = usize>) -> Self {
        let parent: FxHashMap<usize, usize> = elements.map(|e| (e, e)).collect();
        let rank = parent.keys().map(|&e| (e, 0)).collect();
        Self { parent, rank }
    }

    /// Find the root of `x`, compressing the path along the way.
    pub fn find(&mut self, x: usize) -> usize {
        // First pass: walk to the root.
        let mut root = x;
        while self.parent[&root] != root {
            root = self.parent[&root];
        }
        // Second pass: point everything on the path at the root.
        let mut cur = x;
        while cur != root {
            let next = self.parent[&cur];
            self.parent.insert(cur, root);
            cur = next;
        }
        root
    }

    /// Merge the sets containing `x` and `y`, attaching the smaller tree
    /// under the larger.
    pub fn union(&mut self, x: usize, y: usize) {
        let root_x = self.find(x);
        let root_y = self.find(y);
        if root_x == root_y {
            return;
        }

        let rank_x = self.rank[&root_x];
        let rank_y = self.rank[&root_y];
        match rank_x.cmp(&rank_y) {
            std::cmp::Ordering::Greater => {
                self.parent.insert(root_y, root_x);
            }
            std::cmp::Ordering::Less => {
                self.parent.insert(root_x, root_y);
            }
            std::cmp::Ordering::Equal => {
                self.parent.insert(root_y, root_x);
                self.rank.insert(root_x, rank_x + 1);
            }
        }
    }

    /// Connected components as root → sorted member list.
    ///
    /// Member lists are sorted by id so callers iterate groups
    /// deterministically regardless of union call order.
    pub fn groups(&mut self) -> FxHashMap<usize, Vec<usize>> {
        let elements: Vec<usize> = self.parent.keys().copied().collect();
        let mut groups: FxHashMap<usize, Vec<usize>> = FxHashMap::default();
        for elem in elements {
            let root = self.find(elem);
            groups.entry(root).or_default().push(elem);
        }
        for members in groups.values_mut() {
            members.sort_unstable();
        }
        groups
    }
}
