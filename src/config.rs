//! Map configuration.
//!
//! Defaults match the production world map:
//! - Topology at `/geo/countries-110m.json`, object `countries`
//! - World zoom range `[1, 8]`, region zoom range `[1, 6]`
//! - 400ms recolor transition
//! - Up to 16 memoized layer indices

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::encoder::{IndexCache, IndexCacheConfig};
use crate::scene::SceneStyle;
use crate::topology::TopologyLoader;
use crate::viewport::ScaleExtent;

/// Default topology document.
pub const DEFAULT_TOPOLOGY_URI: &str = "/geo/countries-110m.json";

/// Default topology object holding the country geometries.
pub const DEFAULT_TOPOLOGY_OBJECT: &str = "countries";

/// Configuration shared by the world and region maps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MapConfig {
    /// Relative URI of the topology document.
    pub topology_uri: String,
    /// Name of the topology object to decode.
    pub topology_object: String,
    /// Zoom range of the world map.
    pub world_extent: ScaleExtent,
    /// Zoom range of the region map.
    pub region_extent: ScaleExtent,
    /// Recolor transition length in milliseconds (default: 400).
    pub transition_ms: u64,
    /// Memoized layer index capacity (default: 16).
    pub index_cache_entries: usize,
    /// World map strokes.
    pub world_style: SceneStyle,
    /// Region map strokes and context opacity.
    pub region_style: SceneStyle,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            topology_uri: DEFAULT_TOPOLOGY_URI.to_string(),
            topology_object: DEFAULT_TOPOLOGY_OBJECT.to_string(),
            world_extent: ScaleExtent::WORLD,
            region_extent: ScaleExtent::REGION,
            transition_ms: 400,
            index_cache_entries: IndexCacheConfig::default().max_entries,
            world_style: SceneStyle::world(),
            region_style: SceneStyle::region(),
        }
    }
}

impl MapConfig {
    /// Defaults overlaid with `MAP_*` environment variables.
    ///
    /// - `MAP_TOPOLOGY_URI`, `MAP_TOPOLOGY_OBJECT`
    /// - `MAP_WORLD_MAX_SCALE`, `MAP_REGION_MAX_SCALE`
    /// - `MAP_TRANSITION_MS`, `MAP_INDEX_CACHE_ENTRIES`
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            topology_uri: std::env::var("MAP_TOPOLOGY_URI").unwrap_or(defaults.topology_uri),
            topology_object: std::env::var("MAP_TOPOLOGY_OBJECT").unwrap_or(defaults.topology_object),
            world_extent: extent_with_max(
                defaults.world_extent,
                std::env::var("MAP_WORLD_MAX_SCALE").ok().as_deref(),
            ),
            region_extent: extent_with_max(
                defaults.region_extent,
                std::env::var("MAP_REGION_MAX_SCALE").ok().as_deref(),
            ),
            transition_ms: std::env::var("MAP_TRANSITION_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.transition_ms),
            index_cache_entries: std::env::var("MAP_INDEX_CACHE_ENTRIES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.index_cache_entries),
            ..defaults
        }
    }

    /// Recolor transition length.
    pub fn transition(&self) -> Duration {
        Duration::from_millis(self.transition_ms)
    }

    /// A fresh loader for the configured topology.
    pub fn loader(&self) -> TopologyLoader {
        TopologyLoader::new(self.topology_uri.clone(), self.topology_object.clone())
    }

    /// An index cache sized per the configuration.
    pub fn index_cache(&self) -> IndexCache {
        IndexCache::new(IndexCacheConfig {
            max_entries: self.index_cache_entries,
        })
    }
}

/// Replace the upper bound of `default`, keeping it when `raw` is absent or unusable.
fn extent_with_max(default: ScaleExtent, raw: Option<&str>) -> ScaleExtent {
    raw.and_then(|s| s.trim().parse::<f64>().ok())
        .and_then(|max| ScaleExtent::new(default.min, max).ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MapConfig::default();
        assert_eq!(config.topology_uri, "/geo/countries-110m.json");
        assert_eq!(config.world_extent, ScaleExtent::WORLD);
        assert_eq!(config.region_extent, ScaleExtent::REGION);
        assert_eq!(config.transition(), Duration::from_millis(400));
        assert_eq!(config.region_style.stroke, "#1e293b");
        assert_eq!(config.region_style.context_opacity, 0.3);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: MapConfig = serde_json::from_str(r#"{"transitionMs": 0, "worldStyle": {"strokeWidth": 1.0}}"#).unwrap();
        assert_eq!(config.transition_ms, 0);
        assert_eq!(config.world_style.stroke_width, 1.0);
        assert_eq!(config.world_style.stroke, "#0a0e1a");
        assert_eq!(config.topology_object, "countries");
    }

    #[test]
    fn test_max_scale_override() {
        let extent = extent_with_max(ScaleExtent::WORLD, Some("12"));
        assert_eq!((extent.min, extent.max), (1.0, 12.0));
    }

    #[test]
    fn test_unusable_max_scale_falls_back() {
        for raw in ["NaN", "inf", "-3", "0", "wide"] {
            let extent = extent_with_max(ScaleExtent::WORLD, Some(raw));
            assert_eq!(extent, ScaleExtent::WORLD, "raw = {raw}");
            let controller = crate::viewport::ViewportController::new(extent);
            assert_eq!(controller.transform().k, 1.0);
        }
        assert_eq!(extent_with_max(ScaleExtent::REGION, None), ScaleExtent::REGION);
    }

    #[test]
    fn test_crossed_json_extent_is_normalized() {
        let config: MapConfig = serde_json::from_str(r#"{"worldExtent": {"min": 8, "max": 1}}"#).unwrap();
        assert_eq!(config.world_extent, ScaleExtent::WORLD);
        let controller = crate::viewport::ViewportController::new(config.world_extent);
        assert_eq!(controller.transform().k, 1.0);

        assert!(serde_json::from_str::<MapConfig>(r#"{"regionExtent": {"min": 0, "max": 6}}"#).is_err());
    }
}
