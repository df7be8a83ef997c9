//! Core data model for the docpage layout pipeline.
//!
//! This crate holds the value types shared by every pipeline stage: geometry
//! primitives, the closed label vocabulary, text cells, and layout clusters.
//! It carries no processing logic; the postprocessing engine lives in
//! `docpage-layout`.

pub mod error;
pub mod geometry;
pub mod label;
pub mod page;

pub use error::{LayoutError, Result};
pub use geometry::{BoundingBox, CoordOrigin};
pub use label::DocItemLabel;
pub use page::{Cluster, TextCell};
