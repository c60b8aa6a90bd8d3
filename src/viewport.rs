//! Viewport controller: pointer-driven pan and zoom.
//!
//! Every gesture composes into one affine transform (translate + uniform
//! scale) applied to the whole feature group, so features never drift
//! relative to each other. Scale is clamped to the scene's [`ScaleExtent`];
//! translation is unclamped. Gestures take effect immediately.

use std::fmt;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::ScreenPoint;

/// Rejected scale bounds.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("Scale bounds must be finite and positive, got [{min}, {max}]")]
pub struct InvalidScaleExtent {
    /// Requested lower bound.
    pub min: f64,
    /// Requested upper bound.
    pub max: f64,
}

#[derive(Deserialize)]
struct RawScaleExtent {
    min: f64,
    max: f64,
}

impl TryFrom<RawScaleExtent> for ScaleExtent {
    type Error = InvalidScaleExtent;

    fn try_from(raw: RawScaleExtent) -> Result<Self, Self::Error> {
        ScaleExtent::new(raw.min, raw.max)
    }
}

/// Allowed scale range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawScaleExtent")]
pub struct ScaleExtent {
    /// Smallest allowed scale.
    pub min: f64,
    /// Largest allowed scale.
    pub max: f64,
}

impl ScaleExtent {
    /// Scale range of the world map.
    pub const WORLD: ScaleExtent = ScaleExtent { min: 1.0, max: 8.0 };

    /// Scale range of the region map.
    pub const REGION: ScaleExtent = ScaleExtent { min: 1.0, max: 6.0 };

    /// Create an extent, swapping the bounds if given in reverse.
    ///
    /// Both bounds must be finite and strictly positive.
    pub fn new(min: f64, max: f64) -> Result<Self, InvalidScaleExtent> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !valid(min) || !valid(max) {
            return Err(InvalidScaleExtent { min, max });
        }
        Ok(if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        })
    }

    /// Clamp a scale into the range. NaN maps to `min`.
    ///
    /// Never panics, even on an extent assembled by hand with crossed bounds.
    pub fn clamp(&self, k: f64) -> f64 {
        if k.is_nan() {
            return self.min;
        }
        k.min(self.max).max(self.min)
    }

    /// Whether `k` lies in the range.
    pub fn contains(&self, k: f64) -> bool {
        (self.min..=self.max).contains(&k)
    }
}

/// Translate + uniform scale: `p' = p * k + (x, y)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewTransform {
    /// Horizontal translation.
    pub x: f64,
    /// Vertical translation.
    pub y: f64,
    /// Scale factor.
    pub k: f64,
}

impl ViewTransform {
    /// The identity transform.
    pub const IDENTITY: ViewTransform = ViewTransform { x: 0.0, y: 0.0, k: 1.0 };

    /// Map a scene point to container space.
    pub fn apply(&self, p: ScreenPoint) -> ScreenPoint {
        ScreenPoint::new(p.x * self.k + self.x, p.y * self.k + self.y)
    }

    /// Map a container point back to scene space.
    pub fn invert(&self, p: ScreenPoint) -> ScreenPoint {
        ScreenPoint::new((p.x - self.x) / self.k, (p.y - self.y) / self.k)
    }
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl fmt::Display for ViewTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "translate({},{}) scale({})", self.x, self.y, self.k)
    }
}

/// How a wheel delta is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WheelMode {
    /// Pixels.
    #[default]
    Pixel,
    /// Lines.
    Line,
    /// Pages.
    Page,
}

impl WheelMode {
    fn factor(&self) -> f64 {
        match self {
            Self::Pixel => 0.002,
            Self::Line => 0.05,
            Self::Page => 1.0,
        }
    }
}

/// Pointer gestures understood by the controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    /// Scroll wheel; positive `delta_y` zooms out, about `at`.
    Wheel {
        /// Pointer position.
        at: ScreenPoint,
        /// Vertical wheel delta.
        delta_y: f64,
        /// Unit of `delta_y`.
        mode: WheelMode,
    },
    /// Primary button pressed: a pan starts.
    PointerDown {
        /// Pointer position.
        at: ScreenPoint,
    },
    /// Pointer moved; pans if a pan is active.
    PointerMove {
        /// Pointer position.
        at: ScreenPoint,
    },
    /// Primary button released: the pan ends.
    PointerUp,
    /// Two-finger pinch; `ratio` is new finger distance / previous distance.
    Pinch {
        /// Midpoint between the fingers.
        center: ScreenPoint,
        /// Distance ratio.
        ratio: f64,
    },
}

/// Owns the view transform of one scene.
#[derive(Debug, Clone)]
pub struct ViewportController {
    extent: ScaleExtent,
    transform: ViewTransform,
    pan_anchor: Option<ScreenPoint>,
}

impl ViewportController {
    /// Create a controller at the identity transform.
    pub fn new(extent: ScaleExtent) -> Self {
        Self {
            extent,
            transform: ViewTransform {
                k: extent.clamp(1.0),
                ..ViewTransform::IDENTITY
            },
            pan_anchor: None,
        }
    }

    /// Current transform.
    pub fn transform(&self) -> ViewTransform {
        self.transform
    }

    /// Scale range.
    pub fn extent(&self) -> ScaleExtent {
        self.extent
    }

    /// Whether a pan is in progress.
    pub fn is_panning(&self) -> bool {
        self.pan_anchor.is_some()
    }

    /// Apply a gesture. Returns `true` if the transform changed.
    pub fn handle(&mut self, gesture: Gesture) -> bool {
        let before = self.transform;
        match gesture {
            Gesture::Wheel { at, delta_y, mode } => {
                if delta_y.is_finite() {
                    let k = self.transform.k * 2f64.powf(-delta_y * mode.factor());
                    self.scale_about(at, k);
                }
            }
            Gesture::PointerDown { at } => self.pan_anchor = Some(at),
            Gesture::PointerMove { at } => {
                if let Some(anchor) = self.pan_anchor {
                    let (dx, dy) = (at.x - anchor.x, at.y - anchor.y);
                    if dx.is_finite() && dy.is_finite() {
                        self.transform.x += dx;
                        self.transform.y += dy;
                        self.pan_anchor = Some(at);
                    }
                }
            }
            Gesture::PointerUp => self.pan_anchor = None,
            Gesture::Pinch { center, ratio } => {
                if ratio.is_finite() && ratio > 0.0 {
                    self.scale_about(center, self.transform.k * ratio);
                }
            }
        }
        self.transform != before
    }

    /// Scale to `k` (clamped) keeping the scene point under `at` fixed.
    fn scale_about(&mut self, at: ScreenPoint, k: f64) {
        if !at.x.is_finite() || !at.y.is_finite() || !k.is_finite() {
            return;
        }
        let k = self.extent.clamp(k);
        let anchor = self.transform.invert(at);
        self.transform = ViewTransform {
            x: at.x - anchor.x * k,
            y: at.y - anchor.y * k,
            k,
        };
    }
}
