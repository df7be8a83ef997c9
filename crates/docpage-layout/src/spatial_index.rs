//! Spatial index over the clusters of a single page.
//!
//! Composes an R-tree with two 1-D interval trees (x-span and y-span).
//! `find_candidates` unions the hits from all of them, so it over-reports;
//! the exact `check_overlap` test downstream decides what actually merges.

use rstar::{RTree, AABB};
use rustc_hash::{FxHashMap, FxHashSet};

use docpage_core::{BoundingBox, Cluster};

use crate::interval_tree::IntervalTree;

/// R-tree entry: a cluster's envelope plus its id.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ClusterEnvelope {
    aabb: AABB<[f32; 2]>,
    id: usize,
}

impl ClusterEnvelope {
    fn from_bbox(id: usize, bbox: &BoundingBox) -> Self {
        Self {
            aabb: AABB::from_corners([bbox.l, bbox.t], [bbox.r, bbox.b]),
            id,
        }
    }
}

impl rstar::RTreeObject for ClusterEnvelope {
    type Envelope = AABB<[f32; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.aabb
    }
}

/// Per-page spatial index for overlap candidate lookup.
///
/// Built fresh for each overlap-resolution pass. `remove_cluster` keeps the
/// R-tree and the id map consistent but leaves the interval trees alone
/// (they are rebuilt, not mutated, between passes); stale interval hits are
/// filtered out against the id map in `find_candidates`.
pub struct SpatialClusterIndex {
    rtree: RTree<ClusterEnvelope>,
    x_intervals: IntervalTree,
    y_intervals: IntervalTree,
    bbox_by_id: FxHashMap<usize, BoundingBox>,
}

impl SpatialClusterIndex {
    /// Bulk-load the index from a slice of clusters.
    pub fn new(clusters: &[Cluster]) -> Self {
        let mut envelopes = Vec::with_capacity(clusters.len());
        let mut x_intervals = IntervalTree::new();
        let mut y_intervals = IntervalTree::new();
        let mut bbox_by_id =
            FxHashMap::with_capacity_and_hasher(clusters.len(), Default::default());

        for cluster in clusters {
            let bbox = cluster.bbox;
            envelopes.push(ClusterEnvelope::from_bbox(cluster.id, &bbox));
            x_intervals.insert(bbox.l, bbox.r, cluster.id);
            y_intervals.insert(bbox.t, bbox.b, cluster.id);
            bbox_by_id.insert(cluster.id, bbox);
        }

        Self {
            rtree: RTree::bulk_load(envelopes),
            x_intervals,
            y_intervals,
            bbox_by_id,
        }
    }

    /// Add a cluster to all indexes.
    pub fn add_cluster(&mut self, id: usize, bbox: BoundingBox) {
        self.rtree.insert(ClusterEnvelope::from_bbox(id, &bbox));
        self.x_intervals.insert(bbox.l, bbox.r, id);
        self.y_intervals.insert(bbox.t, bbox.b, id);
        self.bbox_by_id.insert(id, bbox);
    }

    /// Remove a cluster from the R-tree and the id map. Interval-tree
    /// entries stay behind and are masked by the id map instead.
    pub fn remove_cluster(&mut self, id: usize) {
        if let Some(bbox) = self.bbox_by_id.remove(&id) {
            self.rtree.remove(&ClusterEnvelope::from_bbox(id, &bbox));
        }
    }

    /// Bounding box currently stored for `id`.
    pub fn bbox(&self, id: usize) -> Option<&BoundingBox> {
        self.bbox_by_id.get(&id)
    }

    /// Ids of clusters that might overlap `bbox`: the union of R-tree
    /// envelope hits and interval-tree hits for all four edges of the box.
    /// Guaranteed to be a superset of the true overlaps.
    pub fn find_candidates(&self, bbox: &BoundingBox) -> FxHashSet<usize> {
        let aabb = AABB::from_corners([bbox.l, bbox.t], [bbox.r, bbox.b]);
        let mut candidates: FxHashSet<usize> = self
            .rtree
            .locate_in_envelope_intersecting(&aabb)
            .map(|envelope| envelope.id)
            .collect();

        candidates.extend(self.x_intervals.find_containing(bbox.l));
        candidates.extend(self.x_intervals.find_containing(bbox.r));
        candidates.extend(self.y_intervals.find_containing(bbox.t));
        candidates.extend(self.y_intervals.find_containing(bbox.b));

        // Mask entries that were removed after the interval trees were built.
        candidates.retain(|id| self.bbox_by_id.contains_key(id));
        candidates
    }

    /// Whether two boxes overlap enough to merge.
    ///
    /// True if IoU exceeds `overlap_threshold` OR either containment ratio
    /// exceeds `containment_threshold`. The OR is intentional: a small
    /// cluster fully inside a large one merges even though IoU is low.
    /// Degenerate or disjoint boxes never overlap.
    pub fn check_overlap(
        bbox1: &BoundingBox,
        bbox2: &BoundingBox,
        overlap_threshold: f32,
        containment_threshold: f32,
    ) -> bool {
        let area1 = bbox1.area();
        let area2 = bbox2.area();
        if area1 <= 0.0 || area2 <= 0.0 {
            return false;
        }

        let intersection = bbox1.intersection_area(bbox2);
        if intersection <= 0.0 {
            return false;
        }

        let iou = intersection / (area1 + area2 - intersection);
        let containment1 = intersection / area1;
        let containment2 = intersection / area2;

        iou > overlap_threshold
            || containment1 > containment_threshold
            || containment2 > containment_threshold
    }
}
