//! Postprocessor configuration.
//!
//! All thresholds live in explicit immutable structs owned by the
//! postprocessor, not module-level tables, so per-page invocations can run
//! in parallel and tests can override individual knobs.

use docpage_core::DocItemLabel;

/// Per-label confidence thresholds applied before any other processing.
///
/// Labels are grouped into three tiers. Synthesized orphan clusters bypass
/// the table entirely (they carry confidence 0.0 by construction).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceThresholds {
    /// High-precision labels: headings, text, code, checkboxes, wrappers (default: 0.45)
    pub high: f32,
    /// Standard labels: tables, captions, footnotes, formulas, list items,
    /// page furniture (default: 0.35)
    pub standard: f32,
    /// Pictures (default: 0.1)
    pub picture: f32,
}

impl Default for ConfidenceThresholds {
    #[inline]
    fn default() -> Self {
        Self {
            high: 0.45,
            standard: 0.35,
            picture: 0.1,
        }
    }
}

impl ConfidenceThresholds {
    /// Threshold for a label. Exhaustive so a new label cannot silently
    /// fall through without a tier.
    #[must_use = "returns the confidence threshold for the label"]
    pub const fn for_label(&self, label: DocItemLabel) -> f32 {
        match label {
            DocItemLabel::Text
            | DocItemLabel::Title
            | DocItemLabel::SectionHeader
            | DocItemLabel::Code
            | DocItemLabel::CheckboxSelected
            | DocItemLabel::CheckboxUnselected
            | DocItemLabel::Form
            | DocItemLabel::KeyValueRegion => self.high,
            DocItemLabel::Table
            | DocItemLabel::DocumentIndex
            | DocItemLabel::Caption
            | DocItemLabel::Footnote
            | DocItemLabel::Formula
            | DocItemLabel::ListItem
            | DocItemLabel::PageHeader
            | DocItemLabel::PageFooter => self.standard,
            DocItemLabel::Picture => self.picture,
        }
    }
}

/// Parameters for one overlap-resolution pass.
///
/// `overlap_threshold`/`containment_threshold` gate which pairs merge;
/// `area_threshold`/`conf_threshold` steer which member of a merged group
/// survives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlapParams {
    /// Area ratio at or below which a more confident competitor disqualifies
    /// a candidate
    pub area_threshold: f32,
    /// Confidence gap above which a competitor counts as meaningfully more
    /// confident
    pub conf_threshold: f32,
    /// IoU above which two clusters merge
    pub overlap_threshold: f32,
    /// Containment ratio above which two clusters merge
    pub containment_threshold: f32,
}

impl OverlapParams {
    /// Parameters for regular clusters.
    pub const REGULAR: Self = Self {
        area_threshold: 1.3,
        conf_threshold: 0.15,
        overlap_threshold: 0.8,
        containment_threshold: 0.8,
    };

    /// Parameters for picture clusters.
    pub const PICTURE: Self = Self {
        area_threshold: 2.0,
        conf_threshold: 0.3,
        overlap_threshold: 0.8,
        containment_threshold: 0.8,
    };

    /// Parameters for wrapper (form / key-value region) clusters.
    pub const WRAPPER: Self = Self {
        area_threshold: 2.0,
        conf_threshold: 0.2,
        overlap_threshold: 0.8,
        containment_threshold: 0.8,
    };
}

/// Top-level postprocessor configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PostprocessorConfig {
    /// Minimum fraction of a cell's own area that must overlap a cluster
    /// for assignment (default: 0.2, strict greater-than)
    pub min_cell_overlap: f32,
    /// Containment ratio at or above which a regular cluster becomes a
    /// wrapper's child (default: 0.8)
    pub child_containment_threshold: f32,
    /// Cap on bbox-adjust / overlap-resolve refinement iterations (default: 3)
    pub max_refinement_iterations: usize,
    /// Keep regular clusters that ended up with no cells (default: false;
    /// formula clusters are always kept)
    pub keep_empty_clusters: bool,
    /// Per-label confidence thresholds
    pub thresholds: ConfidenceThresholds,
}

impl Default for PostprocessorConfig {
    #[inline]
    fn default() -> Self {
        Self {
            min_cell_overlap: 0.2,
            child_containment_threshold: 0.8,
            max_refinement_iterations: 3,
            keep_empty_clusters: false,
            thresholds: ConfidenceThresholds::default(),
        }
    }
}
