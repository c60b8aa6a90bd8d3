//! Legends for each layer.

use serde::Serialize;

use super::ALERT_FILL;
use crate::types::{Alliance, Conflict, LayerConfig, LayerKind};

/// One legend row. Rows without a color carry a badge instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LegendEntry {
    /// Row label.
    pub label: String,
    /// Swatch color.
    pub color: Option<String>,
    /// Status badge text.
    pub badge: Option<String>,
}

impl LegendEntry {
    fn swatch(label: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            color: Some(color.into()),
            badge: None,
        }
    }

    fn badged(label: impl Into<String>, badge: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            color: None,
            badge: Some(badge.into()),
        }
    }
}

/// Legend shown for the active layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Legend {
    /// Heading (the layer label).
    pub title: String,
    /// Rows in display order.
    pub entries: Vec<LegendEntry>,
}

/// Build the legend for a layer.
///
/// - power tiers: the config's legend rows
/// - alliances: one swatch per alliance, input order
/// - conflicts: the alert swatch, then one badged row per conflict
pub fn legend_for(
    layer: LayerKind,
    power_tiers: &LayerConfig,
    alliances: &[Alliance],
    conflicts: &[Conflict],
) -> Legend {
    let entries = match layer {
        LayerKind::PowerTiers => power_tiers
            .legend
            .iter()
            .map(|item| LegendEntry::swatch(&item.label, &item.color))
            .collect(),
        LayerKind::Alliances => alliances
            .iter()
            .map(|a| LegendEntry::swatch(&a.name, &a.color))
            .collect(),
        LayerKind::Conflicts => std::iter::once(LegendEntry::swatch("Involved party", ALERT_FILL))
            .chain(conflicts.iter().map(|c| LegendEntry::badged(&c.name, &c.status)))
            .collect(),
    };

    Legend {
        title: layer.label().to_string(),
        entries,
    }
}
