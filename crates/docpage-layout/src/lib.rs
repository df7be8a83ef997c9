//! Layout postprocessing engine for noisy detector output.
//!
//! Given raw clusters from a layout-detection model and raw text cells from
//! OCR or a text backend, this crate deduplicates and merges overlapping
//! detections, assigns cells to the surviving regions, reconciles picture
//! and wrapper regions with regular ones, and emits a deterministic
//! reading-order sequence.
//!
//! # Example
//!
//! ```
//! use docpage_core::{BoundingBox, Cluster, DocItemLabel, TextCell};
//! use docpage_layout::LayoutPostprocessor;
//!
//! let clusters = vec![Cluster {
//!     id: 0,
//!     label: DocItemLabel::Text,
//!     bbox: BoundingBox::from_ltrb(0.0, 0.0, 200.0, 50.0),
//!     confidence: 0.9,
//!     cells: vec![],
//!     children: vec![],
//! }];
//! let cells = vec![TextCell {
//!     index: 0,
//!     text: "Hello".to_string(),
//!     bbox: BoundingBox::from_ltrb(10.0, 10.0, 60.0, 20.0),
//! }];
//!
//! let (final_clusters, _cells) = LayoutPostprocessor::default()
//!     .postprocess(clusters, cells)
//!     .unwrap();
//! assert_eq!(final_clusters.len(), 1);
//! assert_eq!(final_clusters[0].cells.len(), 1);
//! ```

pub mod config;
pub mod interval_tree;
pub mod postprocessor;
pub mod spatial_index;
pub mod union_find;

pub use config::{ConfidenceThresholds, OverlapParams, PostprocessorConfig};
pub use interval_tree::IntervalTree;
pub use postprocessor::LayoutPostprocessor;
pub use spatial_index::SpatialClusterIndex;
pub use union_find::UnionFind;
