//! Screen-space types.

use serde::{Deserialize, Serialize};

/// A point in container pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScreenPoint {
    /// Horizontal pixel offset.
    pub x: f64,
    /// Vertical pixel offset (grows downward).
    pub y: f64,
}

impl ScreenPoint {
    /// Create a point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance(&self, other: ScreenPoint) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Midpoint between two points.
    pub fn midpoint(&self, other: ScreenPoint) -> ScreenPoint {
        ScreenPoint::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

/// Size of the drawing surface in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportSize {
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl ViewportSize {
    /// Create a size.
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Whether the surface has positive, finite area.
    pub fn is_drawable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

impl Default for ViewportSize {
    fn default() -> Self {
        Self::new(960.0, 540.0)
    }
}
