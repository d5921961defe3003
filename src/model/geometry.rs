//! Bounding boxes in page coordinates.

use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle `(x0, y0, x1, y1)` in page space.
///
/// The origin is the top-left corner of the page and `y` grows downwards,
/// so `y0` is the top edge and `y1` the bottom edge.
///
/// Serialized as a four-element array: `[x0, y0, x1, y1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 4]", into = "[f32; 4]")]
pub struct BoundingBox {
    /// Left edge
    pub x0: f32,
    /// Top edge
    pub y0: f32,
    /// Right edge
    pub x1: f32,
    /// Bottom edge
    pub y1: f32,
}

impl BoundingBox {
    /// Create a new bounding box from its corners.
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Width of the box (may be negative for malformed input).
    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    /// Height of the box (may be negative for malformed input).
    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    /// Center point as `(x, y)`.
    pub fn center(&self) -> (f32, f32) {
        ((self.x0 + self.x1) / 2.0, (self.y0 + self.y1) / 2.0)
    }

    /// Check that every coordinate is finite and the box has positive area.
    pub fn is_valid(&self) -> bool {
        [self.x0, self.y0, self.x1, self.y1]
            .iter()
            .all(|v| v.is_finite())
            && self.width() > 0.0
            && self.height() > 0.0
    }

    /// Describe why the box is invalid, if it is.
    pub fn validate(&self) -> Result<(), String> {
        if ![self.x0, self.y0, self.x1, self.y1]
            .iter()
            .all(|v| v.is_finite())
        {
            return Err(format!("non-finite bounding box {}", self));
        }
        if self.width() <= 0.0 {
            return Err(format!("bounding box {} has non-positive width", self));
        }
        if self.height() <= 0.0 {
            return Err(format!("bounding box {} has non-positive height", self));
        }
        Ok(())
    }

    /// Check whether a point lies inside the box (edges included).
    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        x >= self.x0 && x <= self.x1 && y >= self.y0 && y <= self.y1
    }

    /// Length of the vertical span shared with `other` (0 when disjoint).
    pub fn vertical_overlap(&self, other: &BoundingBox) -> f32 {
        (self.y1.min(other.y1) - self.y0.max(other.y0)).max(0.0)
    }

    /// Smallest box enclosing both boxes.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }

    /// Coordinates as an array.
    pub fn to_array(&self) -> [f32; 4] {
        [self.x0, self.y0, self.x1, self.y1]
    }
}

impl From<[f32; 4]> for BoundingBox {
    fn from(a: [f32; 4]) -> Self {
        Self::new(a[0], a[1], a[2], a[3])
    }
}

impl From<BoundingBox> for [f32; 4] {
    fn from(b: BoundingBox) -> Self {
        b.to_array()
    }
}

impl std::fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}, {}, {}, {}]",
            self.x0, self.y0, self.x1, self.y1
        )
    }
}
