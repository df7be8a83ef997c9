//! Error types for layout postprocessing.
//!
//! The postprocessor favors silent degradation: degenerate geometry and
//! unassignable cells are handled in-band and never raise. The only fatal
//! conditions are structural input violations that would corrupt the
//! identity-based bookkeeping downstream.

use thiserror::Error;

/// Errors raised by layout postprocessing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// Two input clusters share an id. The id→cluster maps used by overlap
    /// resolution assume uniqueness; violating it would produce wrong output
    /// rather than degraded output, so it is rejected up front.
    #[error("duplicate cluster id {0} in input")]
    DuplicateClusterId(usize),

    /// Two input cells share an index. Cell assignment and deduplication
    /// key on the index.
    #[error("duplicate cell index {0} in input")]
    DuplicateCellIndex(usize),
}

/// Result alias used across the layout crates.
pub type Result<T> = std::result::Result<T, LayoutError>;
