//! Geometry primitives shared by the layout pipeline.
//!
//! Everything here is a pure value type. Detector output is noisy, so all
//! operations tolerate degenerate (zero-area or inverted) boxes: they yield
//! zero areas and "no overlap" instead of panicking.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coordinate origin for bounding boxes.
///
/// Page coordinates can be expressed with the origin at the top-left corner
/// (y grows downward, the screen convention) or at the bottom-left corner
/// (y grows upward, the PDF convention). Defaults to `TopLeft`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CoordOrigin {
    /// Top-left origin (y increases downward)
    #[default]
    #[serde(rename = "TOPLEFT")]
    TopLeft,
    /// Bottom-left origin (y increases upward)
    #[serde(rename = "BOTTOMLEFT")]
    BottomLeft,
}

impl fmt::Display for CoordOrigin {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TopLeft => write!(f, "top-left"),
            Self::BottomLeft => write!(f, "bottom-left"),
        }
    }
}

/// Axis-aligned bounding box.
///
/// `t` and `b` always name the TOP and BOTTOM edges of the region regardless
/// of the coordinate origin; only the numeric ordering of the two values
/// flips when the origin does (top-left origin: `t <= b`).
///
/// # Examples
///
/// ```
/// use docpage_core::{BoundingBox, CoordOrigin};
///
/// let bbox = BoundingBox {
///     l: 100.0,
///     t: 200.0,
///     r: 300.0,
///     b: 400.0,
///     coord_origin: CoordOrigin::TopLeft,
/// };
/// assert_eq!(bbox.area(), 200.0 * 200.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Left x-coordinate
    pub l: f32,
    /// Top y-coordinate
    pub t: f32,
    /// Right x-coordinate
    pub r: f32,
    /// Bottom y-coordinate
    pub b: f32,
    /// Coordinate origin (default: `TopLeft`)
    #[serde(default)]
    pub coord_origin: CoordOrigin,
}

impl BoundingBox {
    /// Construct a top-left-origin box from left/top/right/bottom coordinates.
    #[inline]
    #[must_use = "returns a new bounding box"]
    pub const fn from_ltrb(l: f32, t: f32, r: f32, b: f32) -> Self {
        Self {
            l,
            t,
            r,
            b,
            coord_origin: CoordOrigin::TopLeft,
        }
    }

    /// Coordinates as an `(l, t, r, b)` tuple.
    #[inline]
    #[must_use = "returns the coordinates as a tuple"]
    pub const fn as_tuple(&self) -> (f32, f32, f32, f32) {
        (self.l, self.t, self.r, self.b)
    }

    /// Area of the box. Degenerate and inverted boxes yield their absolute
    /// extent, so the result is never negative.
    #[inline]
    #[must_use = "returns the area of the bounding box"]
    pub fn area(&self) -> f32 {
        (self.r - self.l).abs() * (self.b - self.t).abs()
    }

    /// Width of the box (absolute, tolerates inverted coordinates).
    #[inline]
    #[must_use = "returns the width of the bounding box"]
    pub fn width(&self) -> f32 {
        (self.r - self.l).abs()
    }

    /// Height of the box (absolute, tolerates inverted coordinates).
    #[inline]
    #[must_use = "returns the height of the bounding box"]
    pub fn height(&self) -> f32 {
        (self.b - self.t).abs()
    }

    /// Intersection area with another box. Returns 0 for disjoint or
    /// degenerate inputs; coordinates are normalized first so inverted
    /// boxes do not produce negative overlap.
    #[inline]
    #[must_use = "returns the intersection area with another bounding box"]
    pub fn intersection_area(&self, other: &Self) -> f32 {
        let self_l = self.l.min(self.r);
        let self_r = self.l.max(self.r);
        let self_t = self.t.min(self.b);
        let self_b = self.t.max(self.b);

        let other_l = other.l.min(other.r);
        let other_r = other.l.max(other.r);
        let other_t = other.t.min(other.b);
        let other_b = other.t.max(other.b);

        let x_overlap = (self_r.min(other_r) - self_l.max(other_l)).max(0.0);
        let y_overlap = (self_b.min(other_b) - self_t.max(other_t)).max(0.0);
        x_overlap * y_overlap
    }

    /// Containment ratio: how much of this box is covered by `other`.
    /// Zero when this box is degenerate.
    #[inline]
    #[must_use = "returns the overlap fraction relative to this box's area"]
    pub fn intersection_over_self(&self, other: &Self) -> f32 {
        let self_area = self.area();
        if self_area <= 0.0 {
            return 0.0;
        }
        self.intersection_area(other) / self_area
    }

    /// Intersection-over-union ratio. Zero when the union is degenerate.
    #[inline]
    #[must_use = "returns the IoU ratio with another bounding box"]
    pub fn intersection_over_union(&self, other: &Self) -> f32 {
        let intersection = self.intersection_area(other);
        let union = self.area() + other.area() - intersection;
        if union <= 0.0 {
            return 0.0;
        }
        intersection / union
    }

    /// Whether this box overlaps `other` by at least `min_overlap` of its
    /// own area.
    #[inline]
    #[must_use = "returns whether boxes overlap by at least the minimum ratio"]
    pub fn overlaps(&self, other: &Self, min_overlap: f32) -> bool {
        self.intersection_over_self(other) >= min_overlap
    }

    /// Smallest box covering both `self` and `other`.
    ///
    /// Both boxes must share a coordinate origin; the edge comparison
    /// direction depends on it.
    #[inline]
    #[must_use = "returns the union of both bounding boxes"]
    pub fn union(&self, other: &Self) -> Self {
        let (t, b) = match self.coord_origin {
            CoordOrigin::TopLeft => (self.t.min(other.t), self.b.max(other.b)),
            CoordOrigin::BottomLeft => (self.t.max(other.t), self.b.min(other.b)),
        };
        Self {
            l: self.l.min(other.l),
            t,
            r: self.r.max(other.r),
            b,
            coord_origin: self.coord_origin,
        }
    }

    /// Box with all coordinates multiplied by `factor`.
    #[inline]
    #[must_use = "returns the scaled bounding box"]
    pub fn scaled(&self, factor: f32) -> Self {
        Self {
            l: self.l * factor,
            t: self.t * factor,
            r: self.r * factor,
            b: self.b * factor,
            coord_origin: self.coord_origin,
        }
    }

    /// Convert to top-left origin. A no-op when already top-left.
    #[inline]
    #[must_use = "returns the bounding box converted to top-left origin"]
    pub fn to_top_left_origin(&self, page_height: f32) -> Self {
        match self.coord_origin {
            CoordOrigin::TopLeft => *self,
            CoordOrigin::BottomLeft => Self {
                l: self.l,
                t: page_height - self.t,
                r: self.r,
                b: page_height - self.b,
                coord_origin: CoordOrigin::TopLeft,
            },
        }
    }

    /// Convert to bottom-left origin. A no-op when already bottom-left.
    ///
    /// The TOP edge keeps naming the top of the region: a small `t` in
    /// top-left origin becomes a large `t` in bottom-left origin.
    #[inline]
    #[must_use = "returns the bounding box converted to bottom-left origin"]
    pub fn to_bottom_left_origin(&self, page_height: f32) -> Self {
        match self.coord_origin {
            CoordOrigin::BottomLeft => *self,
            CoordOrigin::TopLeft => Self {
                l: self.l,
                t: page_height - self.t,
                r: self.r,
                b: page_height - self.b,
                coord_origin: CoordOrigin::BottomLeft,
            },
        }
    }
}
