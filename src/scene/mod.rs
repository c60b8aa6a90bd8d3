//! Scene renderer: projected features, fills and SVG output.
//!
//! A [`Scene`] is built once per geometry load or viewport resize by
//! projecting every feature to screen space. Recoloring only touches the
//! fill vector; paths are never recomputed for a layer switch.
//!
//! ## Fit modes
//!
//! - [`SceneFit::World`]: Natural Earth I fitted to the whole collection.
//! - [`SceneFit::Region`]: Mercator centered on the bounding window midpoint
//!   and fitted to the highlighted features only. With no highlighted
//!   geometry the window corners are fitted instead.

pub mod path;

use std::collections::BTreeSet;
use std::fmt::Write;
use std::time::Duration;

use geo::{Contains, Coord, CoordsIter, MapCoords, MultiPolygon, Point};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::color::FillTransition;
use crate::encoder::{FillEncoder, NEUTRAL_FILL};
use crate::projection::{FittedProjection, ProjectionKind};
use crate::types::{FeatureCollection, GeoBounds, ScreenPoint, ViewportSize};
use crate::viewport::ViewTransform;

pub use path::path_data;

/// Stroke and opacity settings of a scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SceneStyle {
    /// Outline color of every feature.
    pub stroke: String,
    /// Outline width in pixels.
    pub stroke_width: f64,
    /// Opacity of non-highlighted features in the region view.
    pub context_opacity: f64,
}

impl SceneStyle {
    /// Style of the world map.
    pub fn world() -> Self {
        Self {
            stroke: "#0a0e1a".to_string(),
            stroke_width: 0.5,
            context_opacity: 1.0,
        }
    }

    /// Style of the region map.
    pub fn region() -> Self {
        Self {
            stroke: "#1e293b".to_string(),
            stroke_width: 0.5,
            context_opacity: crate::encoder::membership::CONTEXT_OPACITY,
        }
    }
}

impl Default for SceneStyle {
    fn default() -> Self {
        Self::world()
    }
}

/// How the projection is fitted to the viewport.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneFit {
    /// Whole collection, Natural Earth I.
    World,
    /// Bounded window, Mercator.
    Region {
        /// Window whose midpoint is the projection center.
        bounds: GeoBounds,
        /// Numeric ids of the features to fit.
        highlighted: BTreeSet<String>,
    },
}

impl SceneFit {
    /// Fit a projection for `collection` at `size`.
    pub fn projection(&self, collection: &FeatureCollection, size: ViewportSize) -> FittedProjection {
        match self {
            Self::World => FittedProjection::fit(
                ProjectionKind::NaturalEarth1,
                None,
                size,
                collection.iter().flat_map(|f| f.geometry.coords_iter()),
            ),
            Self::Region { bounds, highlighted } => {
                let mut reference: Vec<Coord<f64>> = collection
                    .subset(highlighted)
                    .flat_map(|f| f.geometry.coords_iter())
                    .collect();
                if reference.is_empty() {
                    reference = bounds.corners().iter().map(|&(x, y)| Coord { x, y }).collect();
                }
                FittedProjection::fit(ProjectionKind::Mercator, Some(bounds.center()), size, reference)
            }
        }
    }
}

/// One projected feature.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneFeature {
    /// Numeric topology id.
    pub id: String,
    /// SVG path data in scene pixels.
    pub path: String,
    /// Projected polygons, used for hit testing.
    pub shape: MultiPolygon<f64>,
}

/// A projected, colored set of features.
#[derive(Debug, Clone)]
pub struct Scene {
    size: ViewportSize,
    projection: FittedProjection,
    style: SceneStyle,
    features: Vec<SceneFeature>,
    fills: Vec<String>,
    opacities: Vec<f64>,
    transition: Option<FillTransition>,
}

impl Scene {
    /// Project every feature of `collection`. Fills start neutral.
    pub fn project(collection: &FeatureCollection, size: ViewportSize, fit: &SceneFit, style: SceneStyle) -> Self {
        let projection = fit.projection(collection, size);
        let features: Vec<SceneFeature> = collection
            .iter()
            .map(|feature| {
                let shape = feature.geometry.map_coords(|c| projection.project(c.x, c.y));
                SceneFeature {
                    id: feature.id.clone(),
                    path: path_data(&shape),
                    shape,
                }
            })
            .collect();

        debug!(
            features = features.len(),
            scale = projection.scale(),
            width = size.width,
            height = size.height,
            "Projected scene"
        );

        let count = features.len();
        Self {
            size,
            projection,
            style,
            features,
            fills: vec![NEUTRAL_FILL.to_string(); count],
            opacities: vec![1.0; count],
            transition: None,
        }
    }

    /// Viewport size the scene was projected for.
    pub fn size(&self) -> ViewportSize {
        self.size
    }

    /// The fitted projection.
    pub fn projection(&self) -> &FittedProjection {
        &self.projection
    }

    /// Stroke settings.
    pub fn style(&self) -> &SceneStyle {
        &self.style
    }

    /// Projected features in draw order.
    pub fn features(&self) -> &[SceneFeature] {
        &self.features
    }

    /// Number of features.
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Whether the scene has no features.
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Color every feature immediately, cancelling any running transition.
    pub fn apply<E: FillEncoder + ?Sized>(&mut self, encoder: &E) {
        self.fills = self.encode(encoder);
        self.opacities = self.features.iter().map(|f| encoder.opacity(&f.id)).collect();
        self.transition = None;
    }

    /// Recolor with a timed transition starting from the displayed fills.
    pub fn recolor<E: FillEncoder + ?Sized>(&mut self, encoder: &E, duration: Duration) {
        let from = self.displayed_fills();
        let to = self.encode(encoder);
        self.opacities = self.features.iter().map(|f| encoder.opacity(&f.id)).collect();

        if duration.is_zero() || from == to {
            self.fills = to;
            self.transition = None;
            return;
        }
        self.fills = to.clone();
        self.transition = Some(FillTransition::new(from, to, duration));
    }

    /// Advance the running transition, if any.
    pub fn advance(&mut self, dt: Duration) {
        if let Some(transition) = self.transition.as_mut() {
            transition.advance(dt);
            if transition.is_finished() {
                self.transition = None;
            }
        }
    }

    /// Whether a recolor transition is running.
    pub fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }

    /// Fills as currently displayed.
    pub fn displayed_fills(&self) -> Vec<String> {
        match &self.transition {
            Some(transition) => transition.sample_all(),
            None => self.fills.clone(),
        }
    }

    /// Fills every feature is heading to.
    pub fn target_fills(&self) -> &[String] {
        &self.fills
    }

    /// Per-feature fill opacity.
    pub fn opacities(&self) -> &[f64] {
        &self.opacities
    }

    /// Target fill of a feature by id.
    pub fn fill_of(&self, feature_id: &str) -> Option<&str> {
        let index = self.features.iter().position(|f| f.id == feature_id)?;
        self.fills.get(index).map(String::as_str)
    }

    /// Fill opacity of a feature by id.
    pub fn opacity_of(&self, feature_id: &str) -> Option<f64> {
        let index = self.features.iter().position(|f| f.id == feature_id)?;
        self.opacities.get(index).copied()
    }

    /// Topmost feature containing a point in scene pixels.
    pub fn feature_at(&self, point: ScreenPoint) -> Option<&SceneFeature> {
        let point = Point::new(point.x, point.y);
        self.features.iter().rev().find(|f| f.shape.contains(&point))
    }

    /// Standalone SVG document with `transform` applied to the feature group.
    pub fn to_svg(&self, transform: &ViewTransform) -> String {
        let fills = self.displayed_fills();
        let mut out = String::new();
        let _ = writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = self.size.width,
            h = self.size.height,
        );
        let _ = writeln!(out, r#"<g class="map-layer" transform="{transform}">"#);
        for (i, feature) in self.features.iter().enumerate() {
            if feature.path.is_empty() {
                continue;
            }
            let fill = fills.get(i).map(String::as_str).unwrap_or(NEUTRAL_FILL);
            let _ = write!(
                out,
                r#"<path class="country-path" data-id="{}" d="{}" fill="{}" stroke="{}" stroke-width="{}""#,
                escape_attr(&feature.id),
                feature.path,
                escape_attr(fill),
                escape_attr(&self.style.stroke),
                self.style.stroke_width,
            );
            let opacity = self.opacities.get(i).copied().unwrap_or(1.0);
            if opacity < 1.0 {
                let _ = write!(out, r#" fill-opacity="{opacity}""#);
            }
            out.push_str("/>\n");
        }
        out.push_str("</g>\n</svg>\n");
        out
    }

    fn encode<E: FillEncoder + ?Sized>(&self, encoder: &E) -> Vec<String> {
        self.features.iter().map(|f| encoder.fill(&f.id).to_string()).collect()
    }
}

fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
