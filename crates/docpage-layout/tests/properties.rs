//! Randomized invariant checks over arbitrary detector output.

mod common;

use common::init_logging;
use docpage_core::{BoundingBox, Cluster, DocItemLabel, TextCell};
use docpage_layout::{LayoutPostprocessor, SpatialClusterIndex};
use proptest::prelude::*;

// Wrapper labels are excluded: a wrapper legitimately duplicates its
// children's cells, which would break the conservation check below.
fn regular_label() -> impl Strategy<Value = DocItemLabel> {
    prop::sample::select(vec![
        DocItemLabel::Text,
        DocItemLabel::SectionHeader,
        DocItemLabel::ListItem,
        DocItemLabel::Caption,
        DocItemLabel::Table,
        DocItemLabel::Picture,
        DocItemLabel::Formula,
    ])
}

fn arb_bbox() -> impl Strategy<Value = BoundingBox> {
    (0.0f32..500.0, 0.0f32..700.0, 1.0f32..200.0, 1.0f32..200.0)
        .prop_map(|(l, t, w, h)| BoundingBox::from_ltrb(l, t, l + w, t + h))
}

fn arb_clusters() -> impl Strategy<Value = Vec<Cluster>> {
    prop::collection::vec((regular_label(), arb_bbox(), 0.0f32..1.0), 0..8).prop_map(|raw| {
        raw.into_iter()
            .enumerate()
            .map(|(id, (label, bbox, confidence))| Cluster {
                id,
                label,
                bbox,
                confidence,
                cells: vec![],
                children: vec![],
            })
            .collect()
    })
}

fn arb_cells() -> impl Strategy<Value = Vec<TextCell>> {
    let text = prop::sample::select(vec!["lorem", "ipsum dolor", "x", "   "]);
    prop::collection::vec((text, arb_bbox()), 0..15).prop_map(|raw| {
        raw.into_iter()
            .enumerate()
            .map(|(index, (text, bbox))| TextCell {
                index,
                text: text.to_string(),
                bbox,
            })
            .collect()
    })
}

fn reading_order_key(cluster: &Cluster) -> (f32, f32) {
    if cluster.label != DocItemLabel::Picture && !cluster.cells.is_empty() {
        cluster
            .cells
            .iter()
            .map(|cell| (cell.bbox.t, cell.bbox.l))
            .min_by(|a, b| a.0.total_cmp(&b.0).then_with(|| a.1.total_cmp(&b.1)))
            .unwrap()
    } else {
        (cluster.bbox.t, cluster.bbox.l)
    }
}

proptest! {
    #[test]
    fn every_meaningful_cell_lands_in_exactly_one_cluster(
        clusters in arb_clusters(),
        cells in arb_cells(),
    ) {
        init_logging();
        let mut expected: Vec<usize> = cells
            .iter()
            .filter(|c| !c.text.trim().is_empty())
            .map(|c| c.index)
            .collect();
        expected.sort_unstable();

        let (final_clusters, _) = LayoutPostprocessor::default()
            .postprocess(clusters, cells)
            .unwrap();

        let mut found: Vec<usize> = final_clusters
            .iter()
            .flat_map(|c| c.cells.iter().map(|cell| cell.index))
            .collect();
        found.sort_unstable();
        prop_assert_eq!(found, expected);
    }

    #[test]
    fn output_is_sorted_in_reading_order(
        clusters in arb_clusters(),
        cells in arb_cells(),
    ) {
        init_logging();
        let (final_clusters, _) = LayoutPostprocessor::default()
            .postprocess(clusters, cells)
            .unwrap();

        for pair in final_clusters.windows(2) {
            let ka = reading_order_key(&pair[0]);
            let kb = reading_order_key(&pair[1]);
            prop_assert!(
                ka.0 < kb.0 || (ka.0 == kb.0 && ka.1 <= kb.1),
                "clusters {} and {} out of order: {:?} > {:?}",
                pair[0].id,
                pair[1].id,
                ka,
                kb
            );
        }
    }

    #[test]
    fn survivors_pass_their_confidence_threshold_or_are_orphans(
        clusters in arb_clusters(),
        cells in arb_cells(),
    ) {
        init_logging();
        let pp = LayoutPostprocessor::default();
        let thresholds = pp.config().thresholds;
        let (final_clusters, _) = pp.postprocess(clusters, cells).unwrap();

        for cluster in &final_clusters {
            let is_orphan = cluster.label == DocItemLabel::Text && cluster.confidence == 0.0;
            prop_assert!(
                is_orphan || cluster.confidence >= thresholds.for_label(cluster.label),
                "cluster {} ({:?}, conf {}) should not have survived",
                cluster.id,
                cluster.label,
                cluster.confidence
            );
        }
    }

    #[test]
    fn pictures_never_hold_cells(
        clusters in arb_clusters(),
        cells in arb_cells(),
    ) {
        init_logging();
        let (final_clusters, _) = LayoutPostprocessor::default()
            .postprocess(clusters, cells)
            .unwrap();
        for cluster in &final_clusters {
            if cluster.label == DocItemLabel::Picture {
                prop_assert!(cluster.cells.is_empty());
            }
        }
    }

    #[test]
    fn no_surviving_regular_pair_still_overlaps(
        clusters in arb_clusters(),
        cells in arb_cells(),
    ) {
        init_logging();
        let (final_clusters, _) = LayoutPostprocessor::default()
            .postprocess(clusters, cells)
            .unwrap();

        let regular: Vec<&Cluster> = final_clusters
            .iter()
            .filter(|c| !c.label.is_special())
            .collect();
        for (i, a) in regular.iter().enumerate() {
            for b in regular.iter().skip(i + 1) {
                prop_assert!(
                    !SpatialClusterIndex::check_overlap(&a.bbox, &b.bbox, 0.8, 0.8),
                    "clusters {} and {} still overlap",
                    a.id,
                    b.id
                );
            }
        }
    }

    #[test]
    fn postprocessing_is_deterministic(
        clusters in arb_clusters(),
        cells in arb_cells(),
    ) {
        init_logging();
        let pp = LayoutPostprocessor::default();
        let first = pp.postprocess(clusters.clone(), cells.clone()).unwrap();
        let second = pp.postprocess(clusters, cells).unwrap();
        prop_assert_eq!(first, second);
    }
}
