//! Shared builders for postprocessor integration tests.
#![allow(dead_code)] // not every test binary uses every helper

use docpage_core::{BoundingBox, Cluster, DocItemLabel, TextCell};

/// Opt into log output with `RUST_LOG=debug cargo test -- --nocapture`.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn bbox(l: f32, t: f32, r: f32, b: f32) -> BoundingBox {
    BoundingBox::from_ltrb(l, t, r, b)
}

pub fn cluster(id: usize, label: DocItemLabel, bbox: BoundingBox, confidence: f32) -> Cluster {
    Cluster {
        id,
        label,
        bbox,
        confidence,
        cells: vec![],
        children: vec![],
    }
}

pub fn cell(index: usize, text: &str, bbox: BoundingBox) -> TextCell {
    TextCell {
        index,
        text: text.to_string(),
        bbox,
    }
}

/// Sorted cell indexes across one cluster.
pub fn cell_indexes(cluster: &Cluster) -> Vec<usize> {
    let mut indexes: Vec<usize> = cluster.cells.iter().map(|c| c.index).collect();
    indexes.sort_unstable();
    indexes
}
