//! Page-level layout types: text cells and layout clusters.

use serde::{Deserialize, Serialize};

use crate::geometry::BoundingBox;
use crate::label::DocItemLabel;

/// A single text span extracted by OCR or a native text backend.
///
/// `index` is process-local and unique within a page; cluster bookkeeping
/// (assignment, deduplication) keys on it. Cells with whitespace-only text
/// are carried through but never assigned to any cluster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextCell {
    /// Cell index for ordering and tracking, unique per page
    #[serde(default)]
    pub index: usize,
    /// Text content of the cell
    pub text: String,
    /// Bounding box in page coordinates
    pub bbox: BoundingBox,
}

impl TextCell {
    /// Whether the cell carries meaningful (non-whitespace) text.
    #[inline]
    #[must_use = "returns whether the cell has non-whitespace text"]
    pub fn has_text(&self) -> bool {
        !self.text.trim().is_empty()
    }
}

/// A candidate layout region produced by the layout detector.
///
/// Clusters are constructed once per page and mutated in place through
/// postprocessing: cells are (re)assigned, bounding boxes refined, and
/// duplicates discarded with their cells moved into the survivor.
///
/// `children` is the single legitimate nesting relation: a wrapper cluster
/// (`Form` / `KeyValueRegion`) holding the regular clusters it contains.
/// The relation is one level deep; wrappers never appear as children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    /// Unique cluster identifier within the page
    #[serde(default)]
    pub id: usize,
    /// Classification label
    pub label: DocItemLabel,
    /// Bounding box on the page
    pub bbox: BoundingBox,
    /// Detector confidence in [0, 1]; synthesized orphan clusters use 0.0
    pub confidence: f32,
    /// Text cells currently assigned to this cluster
    #[serde(default)]
    pub cells: Vec<TextCell>,
    /// Contained regular clusters, populated only for wrapper clusters
    #[serde(default)]
    pub children: Vec<Cluster>,
}

impl Cluster {
    /// Smallest box covering all assigned cells, or `None` when the cluster
    /// has no cells.
    #[must_use = "returns the envelope of the assigned cells"]
    pub fn cell_envelope(&self) -> Option<BoundingBox> {
        let mut cells = self.cells.iter();
        let first = cells.next()?.bbox;
        Some(cells.fold(first, |acc, cell| acc.union(&cell.bbox)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::BoundingBox;

    #[test]
    fn has_text_trims_whitespace() {
        let cell = TextCell {
            index: 0,
            text: "  \t\n".to_string(),
            bbox: BoundingBox::from_ltrb(0.0, 0.0, 1.0, 1.0),
        };
        assert!(!cell.has_text());
    }

    #[test]
    fn cell_envelope_covers_all_cells() {
        let cluster = Cluster {
            id: 0,
            label: DocItemLabel::Text,
            bbox: BoundingBox::from_ltrb(0.0, 0.0, 1.0, 1.0),
            confidence: 1.0,
            cells: vec![
                TextCell {
                    index: 0,
                    text: "a".into(),
                    bbox: BoundingBox::from_ltrb(10.0, 10.0, 20.0, 15.0),
                },
                TextCell {
                    index: 1,
                    text: "b".into(),
                    bbox: BoundingBox::from_ltrb(5.0, 12.0, 30.0, 22.0),
                },
            ],
            children: vec![],
        };
        let envelope = cluster.cell_envelope().unwrap();
        assert_eq!(envelope.as_tuple(), (5.0, 10.0, 30.0, 22.0));
    }

    #[test]
    fn cell_envelope_empty_cluster_is_none() {
        let cluster = Cluster {
            id: 0,
            label: DocItemLabel::Text,
            bbox: BoundingBox::from_ltrb(0.0, 0.0, 1.0, 1.0),
            confidence: 1.0,
            cells: vec![],
            children: vec![],
        };
        assert!(cluster.cell_envelope().is_none());
    }

    #[test]
    fn cluster_deserializes_from_detector_json() {
        let json = r#"{
            "id": 3,
            "label": "section_header",
            "bbox": { "l": 10.0, "t": 20.0, "r": 200.0, "b": 40.0 },
            "confidence": 0.87
        }"#;
        let cluster: Cluster = serde_json::from_str(json).unwrap();
        assert_eq!(cluster.label, DocItemLabel::SectionHeader);
        assert!(cluster.cells.is_empty());
        assert!(cluster.children.is_empty());
        assert_eq!(cluster.bbox.as_tuple(), (10.0, 20.0, 200.0, 40.0));
    }
}
