//! Layer encoders: feature id -> fill color.
//!
//! ## Core Contract
//!
//! `color_for(feature_id, layer)` is a pure function of the feature id, the
//! active layer and the loaded datasets. It always returns a color from a
//! bounded palette and never fails:
//!
//! | Layer | Resolved country | Fill |
//! |-------|------------------|------|
//! | any | none | [`NEUTRAL_FILL`] |
//! | power tiers | tier in `colorScale` | `colorScale[tier]` |
//! | power tiers | tier not in scale | [`NEUTRAL_FILL`] |
//! | alliances | listed by an alliance | first alliance's color |
//! | alliances | no alliance | [`NEUTRAL_FILL`] |
//! | conflicts | party or supporter | [`ALERT_FILL`] |
//! | conflicts | uninvolved | [`NEUTRAL_FILL`] |
//!
//! The region view swaps in [`MembershipEncoder`], a binary highlight.

pub mod index;
pub mod membership;
pub mod legend;

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::bridge::{CountryLookup, IdentifierBridge};
use crate::types::{Alliance, Conflict, LayerConfig, LayerKind};

pub use index::{IndexCache, IndexCacheConfig, LayerIndex};
pub use membership::MembershipEncoder;
pub use legend::{legend_for, Legend, LegendEntry};

/// Background fill for unresolved or unclassified features.
pub const NEUTRAL_FILL: &str = "#1a2035";

/// Fill for countries involved in any conflict.
pub const ALERT_FILL: &str = "#DC2626";

/// Fill for highlighted members in the region view.
pub const HIGHLIGHT_FILL: &str = "#3B82F6";

/// Pluggable per-feature fill function used by the scene.
pub trait FillEncoder {
    /// Fill color of a feature.
    fn fill(&self, feature_id: &str) -> &str;

    /// Fill opacity of a feature.
    fn opacity(&self, _feature_id: &str) -> f64 {
        1.0
    }
}

/// Thematic encoder for the world view.
///
/// Holds the country lookup, the derived alliance/conflict index and the
/// power-tier layer config. Cheap to clone.
#[derive(Debug, Clone)]
pub struct LayerEncoder {
    lookup: Arc<CountryLookup>,
    index: Arc<LayerIndex>,
    power_tiers: Arc<LayerConfig>,
}

impl LayerEncoder {
    /// Create an encoder from prebuilt parts.
    pub fn new(lookup: Arc<CountryLookup>, index: Arc<LayerIndex>, power_tiers: Arc<LayerConfig>) -> Self {
        Self {
            lookup,
            index,
            power_tiers,
        }
    }

    /// Build an encoder from raw datasets, reusing a memoized index when
    /// the alliance and conflict inputs are unchanged.
    pub fn build(
        bridge: &IdentifierBridge,
        cache: &IndexCache,
        countries: &[crate::types::Country],
        alliances: &[Alliance],
        conflicts: &[Conflict],
        power_tiers: LayerConfig,
    ) -> Self {
        Self {
            lookup: Arc::new(bridge.build_lookup(countries)),
            index: cache.get_or_build(alliances, conflicts),
            power_tiers: Arc::new(power_tiers),
        }
    }

    /// The country lookup.
    pub fn lookup(&self) -> &Arc<CountryLookup> {
        &self.lookup
    }

    /// The power-tier layer config.
    pub fn power_tiers(&self) -> &LayerConfig {
        &self.power_tiers
    }

    /// Fill color of a feature under a layer.
    pub fn color_for(&self, feature_id: &str, layer: LayerKind) -> &str {
        let Some(country) = self.lookup.get(feature_id) else {
            return NEUTRAL_FILL;
        };

        match layer {
            LayerKind::PowerTiers => self
                .power_tiers
                .color_for_value(country.power_tier)
                .unwrap_or(NEUTRAL_FILL),
            LayerKind::Alliances => self.index.alliance_color(&country.id).unwrap_or(NEUTRAL_FILL),
            LayerKind::Conflicts => {
                if self.index.in_conflict(&country.id) {
                    ALERT_FILL
                } else {
                    NEUTRAL_FILL
                }
            }
        }
    }

    /// Bind the encoder to one layer.
    pub fn for_layer(&self, layer: LayerKind) -> ThematicFill<'_> {
        ThematicFill { encoder: self, layer }
    }

    /// Every color `color_for` can return under a layer.
    pub fn palette(&self, layer: LayerKind) -> BTreeSet<&str> {
        let mut palette: BTreeSet<&str> = BTreeSet::from([NEUTRAL_FILL]);
        match layer {
            LayerKind::PowerTiers => {
                palette.extend(
                    self.power_tiers
                        .color_scale
                        .values()
                        .map(String::as_str)
                        .filter(|color| !color.trim().is_empty()),
                );
            }
            LayerKind::Alliances => palette.extend(self.index.alliance_palette()),
            LayerKind::Conflicts => {
                palette.insert(ALERT_FILL);
            }
        }
        palette
    }
}

/// A [`LayerEncoder`] bound to the active layer.
#[derive(Debug, Clone, Copy)]
pub struct ThematicFill<'a> {
    encoder: &'a LayerEncoder,
    layer: LayerKind,
}

impl ThematicFill<'_> {
    /// The bound layer.
    pub fn layer(&self) -> LayerKind {
        self.layer
    }
}

impl FillEncoder for ThematicFill<'_> {
    fn fill(&self, feature_id: &str) -> &str {
        self.encoder.color_for(feature_id, self.layer)
    }
}
