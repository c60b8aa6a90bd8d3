//! Map components: the world map and the region close-up.
//!
//! Each component owns three separate state cells, mutated only by their
//! own handlers:
//!
//! | Cell | Mutated by |
//! |------|------------|
//! | active layer ([`LayerState`]) | layer toggle |
//! | view transform | pointer gestures |
//! | tooltip | hover events |
//!
//! Projection runs only when geometry arrives or the viewport is resized.
//! Layer switches recolor the existing scene.

pub mod region;
pub mod world;

use std::sync::Arc;

use tracing::{debug, Instrument, Span};
use uuid::Uuid;

use crate::encoder::FillEncoder;
use crate::scene::{Scene, SceneFit, SceneStyle};
use crate::topology::{LoadState, TopologyError, TopologyLoader, TopologySource};
use crate::types::{FeatureCollection, LayerKind, ViewportSize};
use crate::viewport::{Gesture, ScaleExtent, ViewTransform, ViewportController};

pub use region::RegionMap;
pub use world::{WorldLayers, WorldMap};

/// The active thematic layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayerState {
    active: LayerKind,
}

impl LayerState {
    /// Start on `layer`.
    pub fn new(layer: LayerKind) -> Self {
        Self { active: layer }
    }

    /// The active layer.
    pub fn active(&self) -> LayerKind {
        self.active
    }

    /// Switch layers. Returns `true` if the layer changed.
    pub fn set(&mut self, layer: LayerKind) -> bool {
        let changed = self.active != layer;
        self.active = layer;
        changed
    }
}

/// Geometry, scene and viewport shared by both map components.
#[derive(Debug)]
struct MapCore {
    mount_id: Uuid,
    span: Span,
    loader: TopologyLoader,
    collection: Option<Arc<FeatureCollection>>,
    size: ViewportSize,
    fit: SceneFit,
    style: SceneStyle,
    scene: Option<Scene>,
    viewport: ViewportController,
    projection_passes: u64,
}

impl MapCore {
    fn new(
        mount_id: Uuid,
        span: Span,
        loader: TopologyLoader,
        size: ViewportSize,
        fit: SceneFit,
        style: SceneStyle,
        extent: ScaleExtent,
    ) -> Self {
        Self {
            mount_id,
            span,
            loader,
            collection: None,
            size,
            fit,
            style,
            scene: None,
            viewport: ViewportController::new(extent),
            projection_passes: 0,
        }
    }

    /// Load geometry. Returns `true` if a new collection arrived.
    async fn load<S: TopologySource>(&mut self, source: &S) -> Result<bool, Arc<TopologyError>> {
        let span = self.span.clone();
        let collection = self.loader.load(source).instrument(span).await?;
        let fresh = !self
            .collection
            .as_ref()
            .is_some_and(|current| Arc::ptr_eq(current, &collection));
        self.collection = Some(collection);
        Ok(fresh)
    }

    /// Project the loaded collection and color it immediately.
    fn reproject<E: FillEncoder + ?Sized>(&mut self, encoder: &E) {
        let _entered = self.span.enter();
        self.scene = match &self.collection {
            Some(collection) if self.size.is_drawable() => {
                let mut scene = Scene::project(collection, self.size, &self.fit, self.style.clone());
                scene.apply(encoder);
                self.projection_passes += 1;
                debug!(pass = self.projection_passes, features = scene.len(), "Scene projected");
                Some(scene)
            }
            _ => None,
        };
    }

    /// Re-project at a new size. The new scene starts at the target fills,
    /// so a recolor transition in flight ends immediately.
    fn resize<E: FillEncoder + ?Sized>(&mut self, size: ViewportSize, encoder: &E) -> bool {
        if size == self.size {
            return false;
        }
        self.size = size;
        self.reproject(encoder);
        true
    }

    fn gesture(&mut self, gesture: Gesture) -> bool {
        self.viewport.handle(gesture)
    }

    fn transform(&self) -> ViewTransform {
        self.viewport.transform()
    }

    fn render_svg(&self) -> Option<String> {
        self.scene.as_ref().map(|scene| scene.to_svg(&self.viewport.transform()))
    }

    fn retry(&mut self) -> bool {
        let rearmed = self.loader.retry();
        if rearmed {
            debug!(mount_id = %self.mount_id, "Topology loader re-armed");
        }
        rearmed
    }

    fn load_state(&self) -> &LoadState {
        self.loader.state()
    }
}
