//! The world map component.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info_span};
use uuid::Uuid;

use super::{LayerState, MapCore};
use crate::config::MapConfig;
use crate::encoder::{legend_for, LayerEncoder, Legend};
use crate::interaction::{HoverEvent, InteractionLayer, TooltipContent, TooltipState};
use crate::scene::{Scene, SceneFit};
use crate::topology::{LoadState, TopologyError, TopologySource};
use crate::types::{Alliance, Conflict, LayerKind, ScreenPoint, ViewportSize};
use crate::viewport::{Gesture, ViewTransform};

/// Domain data the world map colors and describes features with.
#[derive(Debug, Clone)]
pub struct WorldLayers {
    /// Thematic encoder built from countries, alliances, conflicts and the
    /// power-tier config.
    pub encoder: LayerEncoder,
    /// Alliances in input order, for legends and tooltips.
    pub alliances: Arc<Vec<Alliance>>,
    /// Conflicts in input order, for legends.
    pub conflicts: Arc<Vec<Conflict>>,
}

/// Interactive world map with three exclusive thematic layers.
#[derive(Debug)]
pub struct WorldMap {
    core: MapCore,
    layers: WorldLayers,
    layer: LayerState,
    interaction: InteractionLayer,
    transition: Duration,
}

impl WorldMap {
    /// Create an unmounted map. Nothing is drawn until [`WorldMap::mount`].
    pub fn new(config: &MapConfig, layers: WorldLayers, size: ViewportSize) -> Self {
        let mount_id = Uuid::new_v4();
        let span = info_span!("world_map", mount_id = %mount_id);
        Self {
            core: MapCore::new(
                mount_id,
                span,
                config.loader(),
                size,
                SceneFit::World,
                config.world_style.clone(),
                config.world_extent,
            ),
            layers,
            layer: LayerState::default(),
            interaction: InteractionLayer::new(),
            transition: config.transition(),
        }
    }

    /// Mount identifier recorded in this map's spans.
    pub fn mount_id(&self) -> Uuid {
        self.core.mount_id
    }

    /// Load the topology and draw the scene.
    ///
    /// The topology is fetched once; later calls reuse the cached outcome.
    /// On failure no scene is drawn.
    pub async fn mount<S: TopologySource>(&mut self, source: &S) -> Result<(), Arc<TopologyError>> {
        if self.core.load(source).await? || self.core.scene.is_none() {
            let fill = self.layers.encoder.for_layer(self.layer.active());
            self.core.reproject(&fill);
        }
        Ok(())
    }

    /// Re-arm a failed topology load.
    pub fn retry(&mut self) -> bool {
        self.core.retry()
    }

    /// Current topology load state.
    pub fn load_state(&self) -> &LoadState {
        self.core.load_state()
    }

    /// Resize the viewport, re-projecting if the size changed.
    ///
    /// A running layer transition snaps to its final colors.
    pub fn resize(&mut self, size: ViewportSize) -> bool {
        let fill = self.layers.encoder.for_layer(self.layer.active());
        self.core.resize(size, &fill)
    }

    /// The active layer.
    pub fn layer(&self) -> LayerKind {
        self.layer.active()
    }

    /// Switch layers, recoloring the existing scene with a transition.
    pub fn set_layer(&mut self, layer: LayerKind) -> bool {
        if !self.layer.set(layer) {
            return false;
        }
        let _entered = self.core.span.enter();
        debug!(layer = %layer, "Layer switched");
        if let Some(scene) = self.core.scene.as_mut() {
            scene.recolor(&self.layers.encoder.for_layer(layer), self.transition);
        }
        true
    }

    /// Advance the recolor transition.
    pub fn advance(&mut self, dt: Duration) {
        if let Some(scene) = self.core.scene.as_mut() {
            scene.advance(dt);
        }
    }

    /// Apply a pan or zoom gesture.
    pub fn gesture(&mut self, gesture: Gesture) -> bool {
        self.core.gesture(gesture)
    }

    /// Current view transform.
    pub fn transform(&self) -> ViewTransform {
        self.core.transform()
    }

    /// Pointer moved to `at` in container coordinates.
    ///
    /// Hit-tests through the view transform and applies the resulting
    /// enter/move/leave events to the tooltip.
    pub fn pointer_moved(&mut self, at: ScreenPoint) -> Vec<HoverEvent> {
        let Some(scene) = self.core.scene.as_ref() else {
            return Vec::new();
        };
        let local = self.core.viewport.transform().invert(at);
        let hit = scene.feature_at(local).map(|f| f.id.as_str());
        self.interaction.track(hit, at, self.layers.encoder.lookup())
    }

    /// Pointer left the map.
    pub fn pointer_left(&mut self) -> Option<HoverEvent> {
        self.interaction.pointer_left(self.layers.encoder.lookup())
    }

    /// Apply a hover event directly.
    pub fn hover(&mut self, event: HoverEvent) {
        self.interaction.handle(event, self.layers.encoder.lookup());
    }

    /// Current tooltip state.
    pub fn tooltip(&self) -> &TooltipState {
        self.interaction.tooltip()
    }

    /// Tooltip content for the hovered country under the active layer.
    pub fn tooltip_content(&self) -> Option<TooltipContent> {
        let tooltip = self.interaction.tooltip();
        if !tooltip.is_shown() {
            return None;
        }
        let country = tooltip.country.as_ref()?;
        Some(TooltipContent::for_layer(
            country,
            self.layer.active(),
            &self.layers.alliances,
            self.layers.encoder.power_tiers(),
        ))
    }

    /// Legend of the active layer.
    pub fn legend(&self) -> Legend {
        legend_for(
            self.layer.active(),
            self.layers.encoder.power_tiers(),
            &self.layers.alliances,
            &self.layers.conflicts,
        )
    }

    /// Target fill of a feature, once the scene exists.
    pub fn fill_of(&self, feature_id: &str) -> Option<&str> {
        self.core.scene.as_ref()?.fill_of(feature_id)
    }

    /// The projected scene, once geometry has loaded.
    pub fn scene(&self) -> Option<&Scene> {
        self.core.scene.as_ref()
    }

    /// Number of projection passes so far.
    pub fn projection_passes(&self) -> u64 {
        self.core.projection_passes
    }

    /// SVG of the current scene and transform.
    pub fn render_svg(&self) -> Option<String> {
        self.core.render_svg()
    }
}
