//! Page boundary: assembles map components from a domain dataset.
//!
//! Lookup misses never reach this layer. What does propagate here is a
//! missing required layer config, an unknown region, unreadable data, or a
//! topology that failed to load.

use std::path::Path;
use std::sync::Arc;

use crate::bridge::IdentifierBridge;
use crate::config::MapConfig;
use crate::dataset::{analysis_text, DatasetError, DomainDataset};
use crate::encoder::{IndexCache, LayerEncoder};
use crate::topology::TopologyError;
use crate::types::{Alliance, Conflict, Country, LayerConfig, LayerKind, Region, ViewportSize};
use crate::view::{RegionMap, WorldLayers, WorldMap};

/// Errors surfaced at the page boundary.
#[derive(Debug, thiserror::Error)]
pub enum PageError {
    /// A layer config the page cannot render without is absent.
    #[error("Missing layer config: {0}")]
    MissingLayerConfig(String),
    /// No region with the requested id.
    #[error("Region not found: {0}")]
    RegionNotFound(String),
    /// Domain data could not be read.
    #[error(transparent)]
    Dataset(#[from] DatasetError),
    /// The topology failed to load.
    #[error("Topology unavailable: {0}")]
    Topology(#[from] Arc<TopologyError>),
}

/// Inputs of the world map page.
#[derive(Debug, Clone)]
pub struct WorldPage {
    countries: Vec<Country>,
    alliances: Arc<Vec<Alliance>>,
    conflicts: Arc<Vec<Conflict>>,
    power_tiers: LayerConfig,
}

impl WorldPage {
    /// Assemble the page. The power-tier layer config is required.
    pub fn assemble(data: &DomainDataset) -> Result<Self, PageError> {
        let id = LayerKind::PowerTiers.as_str();
        let power_tiers = data
            .layer_config(id)
            .cloned()
            .ok_or_else(|| PageError::MissingLayerConfig(id.to_string()))?;
        Ok(Self {
            countries: data.countries.clone(),
            alliances: Arc::new(data.alliances.clone()),
            conflicts: Arc::new(data.conflicts.clone()),
            power_tiers,
        })
    }

    /// The power-tier layer config.
    pub fn power_tiers(&self) -> &LayerConfig {
        &self.power_tiers
    }

    /// Build an unmounted world map for this page.
    pub fn world_map(
        &self,
        config: &MapConfig,
        bridge: &IdentifierBridge,
        cache: &IndexCache,
        size: ViewportSize,
    ) -> WorldMap {
        let encoder = LayerEncoder::build(
            bridge,
            cache,
            &self.countries,
            &self.alliances,
            &self.conflicts,
            self.power_tiers.clone(),
        );
        let layers = WorldLayers {
            encoder,
            alliances: Arc::clone(&self.alliances),
            conflicts: Arc::clone(&self.conflicts),
        };
        WorldMap::new(config, layers, size)
    }
}

/// Inputs of a region page.
#[derive(Debug, Clone)]
pub struct RegionPage {
    region: Region,
    members: Vec<Country>,
}

impl RegionPage {
    /// Assemble the page for region `id`.
    pub fn assemble(data: &DomainDataset, id: &str) -> Result<Self, PageError> {
        let region = data
            .region(id)
            .cloned()
            .ok_or_else(|| PageError::RegionNotFound(id.to_string()))?;
        let members = data
            .countries
            .iter()
            .filter(|c| region.includes(&c.iso_code))
            .cloned()
            .collect();
        Ok(Self { region, members })
    }

    /// The region.
    pub fn region(&self) -> &Region {
        &self.region
    }

    /// Countries whose ISO code is listed by the region, in dataset order.
    pub fn members(&self) -> &[Country] {
        &self.members
    }

    /// Raw analysis document, resolved against `content_root`.
    pub fn analysis(&self, content_root: &Path) -> Result<String, PageError> {
        Ok(analysis_text(content_root, &self.region)?)
    }

    /// Build an unmounted close-up for this region.
    pub fn region_map(&self, config: &MapConfig, bridge: &IdentifierBridge, size: ViewportSize) -> RegionMap {
        RegionMap::new(config, bridge, &self.region, size)
    }
}
