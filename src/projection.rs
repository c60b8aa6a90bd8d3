//! Cartographic projections fitted to a viewport.
//!
//! A raw projection maps `(lon, lat)` in degrees to unit-plane coordinates
//! with y pointing north. [`FittedProjection`] then applies a uniform scale
//! and a translation (flipping y to screen orientation) chosen so that a
//! reference geometry exactly fills the viewport, centered on the slack
//! axis:
//!
//! ```text
//! screen.x = tx + k * (x - cx)
//! screen.y = ty - k * (y - cy)
//! ```
//!
//! where `(cx, cy)` is the raw position of the projection center.

use geo::Coord;
use serde::{Deserialize, Serialize};

use crate::types::ViewportSize;

/// Latitude limit of the Mercator projection.
pub const MERCATOR_MAX_LAT: f64 = 85.051_128_779_806_59;

/// Supported raw projections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectionKind {
    /// Natural Earth I, a compromise pseudocylindrical world projection.
    NaturalEarth1,
    /// Spherical Mercator, used for regional close-ups.
    Mercator,
}

impl ProjectionKind {
    /// Project `(lon, lat)` degrees to the unit plane (y north).
    pub fn raw(&self, lon: f64, lat: f64) -> (f64, f64) {
        let lambda = lon.to_radians();
        match self {
            Self::NaturalEarth1 => {
                let phi = lat.clamp(-90.0, 90.0).to_radians();
                let phi2 = phi * phi;
                let phi4 = phi2 * phi2;
                let x = lambda
                    * (0.8707 - 0.131979 * phi2
                        + phi4 * (-0.013791 + phi4 * (0.003971 * phi2 - 0.001529 * phi4)));
                let y = phi
                    * (1.007226
                        + phi2 * (0.015085 + phi4 * (-0.044475 + 0.028874 * phi2 - 0.005916 * phi4)));
                (x, y)
            }
            Self::Mercator => {
                let phi = lat.clamp(-MERCATOR_MAX_LAT, MERCATOR_MAX_LAT).to_radians();
                (lambda, (std::f64::consts::FRAC_PI_4 + phi / 2.0).tan().ln())
            }
        }
    }
}

/// A projection with scale and translation fitted to a viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FittedProjection {
    kind: ProjectionKind,
    center: (f64, f64),
    scale: f64,
    translate: (f64, f64),
}

impl FittedProjection {
    /// Fit `kind` so that every coordinate in `reference` fits `size`.
    ///
    /// `center` is the `(lon, lat)` placed at the projection origin before
    /// fitting. With no usable reference coordinates the origin is placed at
    /// the middle of the viewport at unit scale.
    pub fn fit<I>(kind: ProjectionKind, center: Option<(f64, f64)>, size: ViewportSize, reference: I) -> Self
    where
        I: IntoIterator<Item = Coord<f64>>,
    {
        let center = center.map(|(lon, lat)| kind.raw(lon, lat)).unwrap_or((0.0, 0.0));

        let mut bounds = RawBounds::empty();
        for coord in reference {
            let (x, y) = kind.raw(coord.x, coord.y);
            bounds.extend(x - center.0, -(y - center.1));
        }

        let Some([x0, y0, x1, y1]) = bounds.finish() else {
            return Self {
                kind,
                center,
                scale: 1.0,
                translate: (size.width / 2.0, size.height / 2.0),
            };
        };

        let dx = x1 - x0;
        let dy = y1 - y0;
        let scale = match (dx > 0.0, dy > 0.0) {
            (true, true) => (size.width / dx).min(size.height / dy),
            (true, false) => size.width / dx,
            (false, true) => size.height / dy,
            (false, false) => 1.0,
        };
        let translate = (
            (size.width - scale * (x0 + x1)) / 2.0,
            (size.height - scale * (y0 + y1)) / 2.0,
        );

        Self {
            kind,
            center,
            scale,
            translate,
        }
    }

    /// The raw projection.
    pub fn kind(&self) -> ProjectionKind {
        self.kind
    }

    /// Fitted scale factor.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Fitted translation.
    pub fn translate(&self) -> (f64, f64) {
        self.translate
    }

    /// Project `(lon, lat)` degrees to screen pixels.
    pub fn project(&self, lon: f64, lat: f64) -> Coord<f64> {
        let (x, y) = self.kind.raw(lon, lat);
        Coord {
            x: self.translate.0 + self.scale * (x - self.center.0),
            y: self.translate.1 - self.scale * (y - self.center.1),
        }
    }
}

struct RawBounds {
    min: (f64, f64),
    max: (f64, f64),
}

impl RawBounds {
    fn empty() -> Self {
        Self {
            min: (f64::INFINITY, f64::INFINITY),
            max: (f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    fn extend(&mut self, x: f64, y: f64) {
        if !x.is_finite() || !y.is_finite() {
            return;
        }
        self.min = (self.min.0.min(x), self.min.1.min(y));
        self.max = (self.max.0.max(x), self.max.1.max(y));
    }

    fn finish(&self) -> Option<[f64; 4]> {
        (self.min.0 <= self.max.0).then_some([self.min.0, self.min.1, self.max.0, self.max.1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coords(points: &[(f64, f64)]) -> Vec<Coord<f64>> {
        points.iter().map(|&(x, y)| Coord { x, y }).collect()
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_natural_earth_origin() {
        assert_eq!(ProjectionKind::NaturalEarth1.raw(0.0, 0.0), (0.0, 0.0));
        let (x, _) = ProjectionKind::NaturalEarth1.raw(180.0, 0.0);
        assert!(close(x, std::f64::consts::PI * 0.8707));
    }

    #[test]
    fn test_mercator_clamps_poles() {
        let (_, y) = ProjectionKind::Mercator.raw(0.0, 90.0);
        assert!(y.is_finite());
        assert!(close(y, std::f64::consts::PI));
    }

    #[test]
    fn test_fit_fills_limiting_axis() {
        let size = ViewportSize::new(800.0, 400.0);
        let reference = coords(&[(-180.0, -60.0), (180.0, 80.0)]);
        let projection = FittedProjection::fit(ProjectionKind::NaturalEarth1, None, size, reference.clone());

        let a = projection.project(reference[0].x, reference[0].y);
        let b = projection.project(reference[1].x, reference[1].y);
        let width = (b.x - a.x).abs();
        let height = (b.y - a.y).abs();

        // One axis is filled exactly, the other fits inside.
        assert!(close(width, 800.0) || close(height, 400.0));
        assert!(width <= 800.0 + 1e-9 && height <= 400.0 + 1e-9);
        // North is up.
        assert!(b.y < a.y);
    }

    #[test]
    fn test_fit_centers_content() {
        let size = ViewportSize::new(500.0, 500.0);
        let reference = coords(&[(10.0, 10.0), (20.0, 12.0)]);
        let projection = FittedProjection::fit(ProjectionKind::Mercator, Some((15.0, 11.0)), size, reference.clone());

        let a = projection.project(10.0, 10.0);
        let b = projection.project(20.0, 12.0);
        assert!(close((a.x + b.x) / 2.0, 250.0));
        assert!(close((a.y + b.y) / 2.0, 250.0));
    }

    #[test]
    fn test_center_does_not_change_fitted_output() {
        let size = ViewportSize::new(640.0, 480.0);
        let reference = coords(&[(30.0, 10.0), (45.0, 30.0)]);
        let plain = FittedProjection::fit(ProjectionKind::Mercator, None, size, reference.clone());
        let centered = FittedProjection::fit(ProjectionKind::Mercator, Some((38.0, 20.0)), size, reference);

        let p = plain.project(40.0, 15.0);
        let q = centered.project(40.0, 15.0);
        assert!(close(p.x, q.x) && close(p.y, q.y));
    }

    #[test]
    fn test_empty_reference_centers_origin() {
        let size = ViewportSize::new(100.0, 50.0);
        let projection = FittedProjection::fit(ProjectionKind::Mercator, None, size, Vec::<Coord<f64>>::new());
        assert_eq!(projection.project(0.0, 0.0), Coord { x: 50.0, y: 25.0 });
    }
}
