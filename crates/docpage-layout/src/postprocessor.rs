//! Layout postprocessing: turn noisy, overlapping detector output into a
//! clean, deterministically ordered set of layout clusters.
//!
//! Pipeline: label remapping, regular/special split, per-label confidence
//! filtering, best-overlap cell assignment, orphan synthesis, iterative
//! bbox refinement with union-find overlap resolution, wrapper child
//! attachment, and a final reading-order sort.

use log::{debug, trace};
use rustc_hash::{FxHashMap, FxHashSet};

use docpage_core::{Cluster, DocItemLabel, LayoutError, Result, TextCell};

use crate::config::{OverlapParams, PostprocessorConfig};
use crate::spatial_index::SpatialClusterIndex;
use crate::union_find::UnionFind;

/// Layout postprocessor for one page of detector output.
///
/// Holds only configuration; every `postprocess` call builds its own
/// indexes, so independent pages can be processed concurrently with one
/// shared instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutPostprocessor {
    config: PostprocessorConfig,
}

impl Default for LayoutPostprocessor {
    #[inline]
    fn default() -> Self {
        Self::new(PostprocessorConfig::default())
    }
}

impl LayoutPostprocessor {
    /// Create a postprocessor with the given configuration.
    #[must_use = "returns a new LayoutPostprocessor instance"]
    pub const fn new(config: PostprocessorConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    #[inline]
    pub const fn config(&self) -> &PostprocessorConfig {
        &self.config
    }

    /// Process raw clusters and text cells into final, reading-ordered
    /// clusters.
    ///
    /// Returns the surviving clusters (cells assigned, duplicates merged,
    /// wrappers populated with children) together with the input cells.
    ///
    /// # Errors
    ///
    /// Fails only on structurally invalid input: duplicate cluster ids or
    /// duplicate cell indexes. Noisy geometry degrades silently instead.
    pub fn postprocess(
        &self,
        clusters: Vec<Cluster>,
        cells: Vec<TextCell>,
    ) -> Result<(Vec<Cluster>, Vec<TextCell>)> {
        Self::validate_input(&clusters, &cells)?;

        // Orphan ids continue after the highest input id, including ids of
        // clusters that the confidence filter later drops.
        let max_input_id = clusters.iter().map(|c| c.id).max().unwrap_or(0);

        let (special, regular): (Vec<Cluster>, Vec<Cluster>) =
            clusters.into_iter().partition(|c| c.label.is_special());
        debug!(
            "split: {} regular, {} special clusters",
            regular.len(),
            special.len()
        );

        let mut regular = self.process_regular_clusters(regular, &cells, max_input_id);
        let special = self.process_special_clusters(special, &regular);

        // Regular clusters absorbed into a wrapper live on as its children,
        // not as top-level clusters.
        let contained: FxHashSet<usize> = special
            .iter()
            .flat_map(|s| s.children.iter().map(|c| c.id))
            .collect();
        regular.retain(|c| !contained.contains(&c.id));

        let mut final_clusters = regular;
        final_clusters.extend(special);
        Self::sort_reading_order(&mut final_clusters);

        Ok((final_clusters, cells))
    }

    /// Reject inputs whose identity keys collide; all downstream
    /// bookkeeping assumes unique cluster ids and cell indexes.
    fn validate_input(clusters: &[Cluster], cells: &[TextCell]) -> Result<()> {
        let mut cluster_ids = FxHashSet::default();
        for cluster in clusters {
            if !cluster_ids.insert(cluster.id) {
                return Err(LayoutError::DuplicateClusterId(cluster.id));
            }
        }
        let mut cell_indexes = FxHashSet::default();
        for cell in cells {
            if !cell_indexes.insert(cell.index) {
                return Err(LayoutError::DuplicateCellIndex(cell.index));
            }
        }
        Ok(())
    }

    /// Regular path: confidence filter, label remap, cell assignment,
    /// empty-cluster removal, orphan synthesis, iterative refinement.
    fn process_regular_clusters(
        &self,
        clusters: Vec<Cluster>,
        cells: &[TextCell],
        max_input_id: usize,
    ) -> Vec<Cluster> {
        let initial = clusters.len();
        let mut clusters: Vec<Cluster> = clusters
            .into_iter()
            .filter(|c| c.confidence >= self.config.thresholds.for_label(c.label))
            .map(|mut c| {
                c.label = Self::remap_label(c.label);
                c
            })
            .collect();
        debug!(
            "regular: {} of {} clusters past confidence filter",
            clusters.len(),
            initial
        );

        self.assign_cells(&mut clusters, cells);

        // Clusters that attracted no text carry no content; formulas are
        // exempt since the detector legitimately finds cell-free formulas.
        if !self.config.keep_empty_clusters {
            clusters.retain(|c| !c.cells.is_empty() || c.label == DocItemLabel::Formula);
        }

        let orphans = Self::create_orphan_clusters(&clusters, cells, max_input_id);
        debug!("regular: {} orphan clusters created", orphans.len());
        clusters.extend(orphans);

        // Refine until the cluster count stabilizes, capped.
        let mut prev_count = clusters.len() + 1;
        for iteration in 0..self.config.max_refinement_iterations {
            if clusters.len() == prev_count {
                debug!("regular: refinement converged after {iteration} iterations");
                break;
            }
            prev_count = clusters.len();
            Self::adjust_cluster_bboxes(&mut clusters);
            clusters = Self::remove_overlapping_clusters(clusters, OverlapParams::REGULAR);
        }

        clusters
    }

    /// Special path: pictures get their own overlap resolution; wrappers
    /// adopt the regular clusters they contain and are dropped when empty.
    fn process_special_clusters(
        &self,
        special: Vec<Cluster>,
        regular: &[Cluster],
    ) -> Vec<Cluster> {
        let (pictures, wrappers): (Vec<Cluster>, Vec<Cluster>) = special
            .into_iter()
            .partition(|c| c.label == DocItemLabel::Picture);

        let pictures: Vec<Cluster> = pictures
            .into_iter()
            .filter(|c| c.confidence >= self.config.thresholds.for_label(c.label))
            .collect();
        let mut pictures = Self::remove_overlapping_clusters(pictures, OverlapParams::PICTURE);

        let mut kept_wrappers = Vec::new();
        for mut wrapper in wrappers {
            if wrapper.confidence < self.config.thresholds.for_label(wrapper.label) {
                continue;
            }

            let mut children: Vec<Cluster> = regular
                .iter()
                .filter(|r| {
                    r.bbox.intersection_over_self(&wrapper.bbox)
                        >= self.config.child_containment_threshold
                })
                .cloned()
                .collect();

            if children.is_empty() {
                trace!("wrapper {} contains nothing, dropped", wrapper.id);
                continue;
            }

            children.sort_by(|a, b| {
                let ka = Self::reading_order_key(a);
                let kb = Self::reading_order_key(b);
                ka.0.total_cmp(&kb.0).then_with(|| ka.1.total_cmp(&kb.1))
            });

            // The wrapper's extent is defined by what it actually contains.
            wrapper.bbox = children
                .iter()
                .map(|c| c.bbox)
                .reduce(|a, b| a.union(&b))
                .unwrap_or(wrapper.bbox);
            let mut cells: Vec<TextCell> =
                children.iter().flat_map(|c| c.cells.clone()).collect();
            cells = Self::dedup_cells(cells);
            cells.sort_by_key(|c| c.index);
            wrapper.cells = cells;
            wrapper.children = children;
            kept_wrappers.push(wrapper);
        }

        let mut wrappers =
            Self::remove_overlapping_clusters(kept_wrappers, OverlapParams::WRAPPER);
        // Merging wrappers can pool children from several regions; re-anchor
        // each survivor's bbox so the child-containment invariant holds.
        for wrapper in &mut wrappers {
            if let Some(bbox) = wrapper
                .children
                .iter()
                .map(|c| c.bbox)
                .reduce(|a, b| a.union(&b))
            {
                wrapper.bbox = bbox;
            }
        }

        debug!(
            "special: {} pictures, {} wrappers survive",
            pictures.len(),
            wrappers.len()
        );
        pictures.extend(wrappers);
        pictures
    }

    /// DOCUMENT_INDEX regions behave as tables downstream; TITLE collapses
    /// into SECTION_HEADER (level 0 is recovered from reading order, not
    /// from the label).
    const fn remap_label(label: DocItemLabel) -> DocItemLabel {
        match label {
            DocItemLabel::DocumentIndex => DocItemLabel::Table,
            DocItemLabel::Title => DocItemLabel::SectionHeader,
            other => other,
        }
    }

    /// Assign every eligible cell to the cluster with the highest overlap
    /// ratio (intersection over the cell's own area), strict `>` against
    /// the configured minimum. Ties keep the first maximum under input
    /// iteration order. Existing assignments are cleared first.
    fn assign_cells(&self, clusters: &mut [Cluster], cells: &[TextCell]) {
        for cluster in clusters.iter_mut() {
            cluster.cells.clear();
        }

        let mut assigned = 0usize;
        for cell in cells {
            if !cell.has_text() || cell.bbox.area() <= 0.0 {
                continue;
            }

            let mut best_overlap = self.config.min_cell_overlap;
            let mut best_idx: Option<usize> = None;
            for (idx, cluster) in clusters.iter().enumerate() {
                let overlap = cell.bbox.intersection_over_self(&cluster.bbox);
                if overlap > best_overlap {
                    best_overlap = overlap;
                    best_idx = Some(idx);
                }
            }

            if let Some(idx) = best_idx {
                clusters[idx].cells.push(cell.clone());
                assigned += 1;
            }
        }
        debug!("assigned {assigned} of {} cells", cells.len());
    }

    /// Synthesize a TEXT cluster (confidence 0.0) for every meaningful cell
    /// that no cluster claimed. Ids continue after the highest input id.
    fn create_orphan_clusters(
        clusters: &[Cluster],
        cells: &[TextCell],
        max_input_id: usize,
    ) -> Vec<Cluster> {
        let assigned: FxHashSet<usize> = clusters
            .iter()
            .flat_map(|c| c.cells.iter().map(|cell| cell.index))
            .collect();

        let mut next_id = max_input_id + 1;
        let mut orphans = Vec::new();
        for cell in cells {
            if !cell.has_text() || assigned.contains(&cell.index) {
                continue;
            }
            trace!("orphan cell {} -> cluster {next_id}", cell.index);
            orphans.push(Cluster {
                id: next_id,
                label: DocItemLabel::Text,
                bbox: cell.bbox,
                confidence: 0.0,
                cells: vec![cell.clone()],
                children: vec![],
            });
            next_id += 1;
        }
        orphans
    }

    /// Tighten each cluster's bbox to its cells' envelope. Tables keep the
    /// detector bbox unioned in: padding and cell-free regions the detector
    /// captured are part of the table.
    fn adjust_cluster_bboxes(clusters: &mut [Cluster]) {
        for cluster in clusters.iter_mut() {
            let Some(envelope) = cluster.cell_envelope() else {
                continue;
            };
            cluster.bbox = if cluster.label == DocItemLabel::Table {
                cluster.bbox.union(&envelope)
            } else {
                envelope
            };
        }
    }

    /// One overlap-resolution pass: group transitively overlapping clusters
    /// via union-find over spatial-index candidates, then collapse each
    /// group to its best member, which absorbs the others' cells.
    fn remove_overlapping_clusters(
        clusters: Vec<Cluster>,
        params: OverlapParams,
    ) -> Vec<Cluster> {
        if clusters.len() < 2 {
            return clusters;
        }

        let index = SpatialClusterIndex::new(&clusters);
        let mut uf = UnionFind::new(clusters.iter().map(|c| c.id));

        for cluster in &clusters {
            for other_id in index.find_candidates(&cluster.bbox) {
                if other_id == cluster.id {
                    continue;
                }
                let Some(other_bbox) = index.bbox(other_id) else {
                    continue;
                };
                if SpatialClusterIndex::check_overlap(
                    &cluster.bbox,
                    other_bbox,
                    params.overlap_threshold,
                    params.containment_threshold,
                ) {
                    uf.union(cluster.id, other_id);
                }
            }
        }

        let mut by_id: FxHashMap<usize, Cluster> =
            clusters.into_iter().map(|c| (c.id, c)).collect();
        // Group member lists are id-sorted; ordering groups by their lowest
        // id makes the whole pass deterministic.
        let mut groups: Vec<Vec<usize>> = uf.groups().into_values().collect();
        groups.sort_by_key(|group| group[0]);

        let mut result = Vec::with_capacity(groups.len());
        for group in groups {
            let mut members: Vec<Cluster> =
                group.iter().filter_map(|id| by_id.remove(id)).collect();
            if members.len() < 2 {
                result.extend(members);
                continue;
            }

            trace!(
                "merging overlap group {:?}",
                members.iter().map(|c| c.id).collect::<Vec<_>>()
            );

            // Iterate candidates from most to least confident (id breaks
            // exact ties) so selection is order-independent.
            members.sort_by(|a, b| {
                b.confidence
                    .total_cmp(&a.confidence)
                    .then_with(|| a.id.cmp(&b.id))
            });
            let best_idx = Self::select_best_cluster(&members, params);
            let mut best = members.swap_remove(best_idx);

            for loser in members {
                best.cells.extend(loser.cells);
                // Wrapper merges pool children as well; duplicates by id
                // are dropped.
                for child in loser.children {
                    if !best.children.iter().any(|c| c.id == child.id) {
                        best.children.push(child);
                    }
                }
            }
            best.cells = Self::dedup_cells(std::mem::take(&mut best.cells));
            best.cells.sort_by_key(|c| c.index);
            result.push(best);
        }

        result
    }

    /// Pick the surviving member of an overlap group.
    ///
    /// A candidate is disqualified when some other member is both
    /// comparably sized or larger (area ratio at or below
    /// `area_threshold`) and meaningfully more confident (gap above
    /// `conf_threshold`). Among the qualifiers, a strictly larger candidate
    /// replaces the incumbent only when its confidence deficit stays within
    /// `conf_threshold`. Degenerate groups where nothing qualifies fall
    /// back to the first member in iteration order.
    fn select_best_cluster(members: &[Cluster], params: OverlapParams) -> usize {
        let mut best: Option<usize> = None;

        for (idx, candidate) in members.iter().enumerate() {
            let disqualified = members.iter().enumerate().any(|(other_idx, other)| {
                if other_idx == idx {
                    return false;
                }
                let area_ratio = candidate.bbox.area() / other.bbox.area();
                let conf_gap = other.confidence - candidate.confidence;
                area_ratio <= params.area_threshold && conf_gap > params.conf_threshold
            });
            if disqualified {
                continue;
            }

            match best {
                None => best = Some(idx),
                Some(best_idx) => {
                    let incumbent = &members[best_idx];
                    if candidate.bbox.area() > incumbent.bbox.area()
                        && incumbent.confidence - candidate.confidence <= params.conf_threshold
                    {
                        best = Some(idx);
                    }
                }
            }
        }

        best.unwrap_or(0)
    }

    /// Drop repeated cell indexes, keeping the first occurrence.
    fn dedup_cells(cells: Vec<TextCell>) -> Vec<TextCell> {
        let mut seen = FxHashSet::default();
        cells
            .into_iter()
            .filter(|cell| seen.insert(cell.index))
            .collect()
    }

    /// Reading-order sort key: the top-left of the cluster's first cell,
    /// falling back to the cluster bbox for cell-free clusters and for
    /// pictures (whose incidental cells say nothing about position).
    fn reading_order_key(cluster: &Cluster) -> (f32, f32) {
        if cluster.label != DocItemLabel::Picture && !cluster.cells.is_empty() {
            cluster
                .cells
                .iter()
                .map(|cell| (cell.bbox.t, cell.bbox.l))
                .min_by(|a, b| a.0.total_cmp(&b.0).then_with(|| a.1.total_cmp(&b.1)))
                .unwrap_or((cluster.bbox.t, cluster.bbox.l))
        } else {
            (cluster.bbox.t, cluster.bbox.l)
        }
    }

    /// Sort top-to-bottom, left-to-right. Stable, so equal keys keep their
    /// relative order.
    fn sort_reading_order(clusters: &mut [Cluster]) {
        clusters.sort_by(|a, b| {
            let ka = Self::reading_order_key(a);
            let kb = Self::reading_order_key(b);
            ka.0.total_cmp(&kb.0).then_with(|| ka.1.total_cmp(&kb.1))
        });
    }
}
