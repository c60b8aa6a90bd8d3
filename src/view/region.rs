//! The region close-up component.
//!
//! Member countries are drawn in the highlight color at full opacity,
//! everything else neutral and faded. The projection is fitted to the
//! members only. There is no hover feedback.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::info_span;
use uuid::Uuid;

use super::MapCore;
use crate::bridge::IdentifierBridge;
use crate::config::MapConfig;
use crate::encoder::MembershipEncoder;
use crate::scene::{Scene, SceneFit};
use crate::topology::{LoadState, TopologyError, TopologySource};
use crate::types::{Region, ViewportSize};
use crate::viewport::{Gesture, ViewTransform};

/// Region close-up with a fixed highlighted subset.
#[derive(Debug)]
pub struct RegionMap {
    core: MapCore,
    encoder: MembershipEncoder,
}

impl RegionMap {
    /// Create an unmounted close-up of `region`.
    ///
    /// Member ISO codes missing from the identifier table are dropped.
    pub fn new(config: &MapConfig, bridge: &IdentifierBridge, region: &Region, size: ViewportSize) -> Self {
        let encoder = MembershipEncoder::from_iso_codes(bridge, region.countries.iter().map(String::as_str))
            .with_context_opacity(config.region_style.context_opacity);
        let fit = SceneFit::Region {
            bounds: region.bounds,
            highlighted: encoder.highlighted().clone(),
        };
        let mount_id = Uuid::new_v4();
        let span = info_span!("region_map", mount_id = %mount_id, region = %region.id);
        Self {
            core: MapCore::new(
                mount_id,
                span,
                config.loader(),
                size,
                fit,
                config.region_style.clone(),
                config.region_extent,
            ),
            encoder,
        }
    }

    /// Mount identifier recorded in this map's spans.
    pub fn mount_id(&self) -> Uuid {
        self.core.mount_id
    }

    /// Load the topology and draw the scene.
    pub async fn mount<S: TopologySource>(&mut self, source: &S) -> Result<(), Arc<TopologyError>> {
        if self.core.load(source).await? || self.core.scene.is_none() {
            self.core.reproject(&self.encoder);
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
    pub fn resize(&mut self, size: ViewportSize) -> bool {
        self.core.resize(size, &self.encoder)
    }

    /// Numeric ids of the highlighted members.
    pub fn highlighted(&self) -> &BTreeSet<String> {
        self.encoder.highlighted()
    }

    /// Apply a pan or zoom gesture.
    pub fn gesture(&mut self, gesture: Gesture) -> bool {
        self.core.gesture(gesture)
    }

    /// Current view transform.
    pub fn transform(&self) -> ViewTransform {
        self.core.transform()
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
