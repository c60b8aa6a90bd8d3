//! Thematic layers and their configuration.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};

/// The three mutually exclusive thematic layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayerKind {
    /// Fill by power tier via the `power-tiers` layer config.
    PowerTiers,
    /// Fill by first alliance membership.
    Alliances,
    /// Fill by involvement in any conflict.
    Conflicts,
}

impl LayerKind {
    /// All layers in toggle order.
    pub const ALL: [LayerKind; 3] = [Self::PowerTiers, Self::Alliances, Self::Conflicts];

    /// Stable identifier (`power-tiers`, `alliances`, `conflicts`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PowerTiers => "power-tiers",
            Self::Alliances => "alliances",
            Self::Conflicts => "conflicts",
        }
    }

    /// Human label used by the layer toggle and legend heading.
    pub fn label(&self) -> &'static str {
        match self {
            Self::PowerTiers => "Power Tiers",
            Self::Alliances => "Alliances",
            Self::Conflicts => "Conflicts",
        }
    }
}

impl Default for LayerKind {
    fn default() -> Self {
        Self::PowerTiers
    }
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown layer name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown layer: {0}")]
pub struct ParseLayerError(pub String);

impl FromStr for LayerKind {
    type Err = ParseLayerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "power-tiers" | "power_tiers" | "tiers" => Ok(Self::PowerTiers),
            "alliances" => Ok(Self::Alliances),
            "conflicts" => Ok(Self::Conflicts),
            _ => Err(ParseLayerError(s.to_string())),
        }
    }
}

/// One legend row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegendItem {
    /// Row label.
    pub label: String,
    /// Swatch color.
    pub color: String,
}

impl LegendItem {
    /// Create a legend row.
    pub fn new(label: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            color: color.into(),
        }
    }
}

/// Configuration of a value-keyed layer (currently only `power-tiers`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerConfig {
    /// Layer identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Country field visualized by this layer.
    pub field: String,
    /// Stringified field value -> color.
    #[serde(default)]
    pub color_scale: BTreeMap<String, String>,
    /// Ordered legend rows.
    #[serde(default)]
    pub legend: Vec<LegendItem>,
}

impl LayerConfig {
    /// Create a config with an empty scale and legend.
    pub fn new(id: impl Into<String>, name: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            field: field.into(),
            color_scale: BTreeMap::new(),
            legend: Vec::new(),
        }
    }

    /// Builder-style scale entry.
    pub fn with_color(mut self, value: impl Into<String>, color: impl Into<String>) -> Self {
        self.color_scale.insert(value.into(), color.into());
        self
    }

    /// Builder-style legend row.
    pub fn with_legend(mut self, label: impl Into<String>, color: impl Into<String>) -> Self {
        self.legend.push(LegendItem::new(label, color));
        self
    }

    /// Color for a field value, looked up by its string form.
    ///
    /// Blank entries count as missing.
    pub fn color_for_value(&self, value: impl fmt::Display) -> Option<&str> {
        self.color_scale
            .get(&value.to_string())
            .map(String::as_str)
            .filter(|color| !color.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_parse_and_display() {
        for layer in LayerKind::ALL {
            assert_eq!(layer.as_str().parse::<LayerKind>().unwrap(), layer);
        }
        assert!("borders".parse::<LayerKind>().is_err());
        assert_eq!(LayerKind::default(), LayerKind::PowerTiers);
    }

    #[test]
    fn test_layer_serde_kebab() {
        let json = serde_json::to_string(&LayerKind::PowerTiers).unwrap();
        assert_eq!(json, "\"power-tiers\"");
    }

    #[test]
    fn test_color_for_value() {
        let config = LayerConfig::new("power-tiers", "Power Tiers", "powerTier")
            .with_color("1", "#111");
        assert_eq!(config.color_for_value(1), Some("#111"));
        assert_eq!(config.color_for_value(2), None);
    }

    #[test]
    fn test_blank_color_is_missing() {
        let config = LayerConfig::new("power-tiers", "Power Tiers", "powerTier")
            .with_color("1", "")
            .with_color("2", "  ");
        assert_eq!(config.color_for_value(1), None);
        assert_eq!(config.color_for_value(2), None);
    }

    #[test]
    fn test_deserialize_config() {
        let json = r##"{
            "id": "power-tiers",
            "name": "Power Tiers",
            "field": "powerTier",
            "colorScale": {"1": "#DC2626", "2": "#EA580C"},
            "legend": [{"label": "Superpower", "color": "#DC2626"}]
        }"##;
        let config: LayerConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.color_scale.len(), 2);
        assert_eq!(config.legend[0].label, "Superpower");
    }
}
