//! Hover feedback: pointer events to a transient tooltip.
//!
//! ```text
//! enter(feature) ──resolvable──► visible { position, country }
//!        │                              │ move: position only
//!        └──unresolvable──► unchanged   ▼
//!                                 leave: empty
//! ```
//!
//! Pointer positions are in container coordinates. Hit testing happens in
//! the view; [`InteractionLayer::track`] turns the feature under the pointer
//! into the enter/move/leave sequence a browser would fire.

use std::sync::Arc;

use serde::Serialize;

use crate::bridge::CountryLookup;
use crate::types::{Alliance, Country, LayerConfig, LayerKind, ScreenPoint};

/// Offset of the tooltip box from the pointer.
pub const TOOLTIP_OFFSET: (f64, f64) = (16.0, -16.0);

/// Display label of a power tier.
pub fn tier_label(tier: i32) -> String {
    match tier {
        1 => "Superpower".to_string(),
        2 => "Great Power".to_string(),
        3 => "Regional Power".to_string(),
        4 => "Middle Power".to_string(),
        5 => "Minor Power".to_string(),
        n => format!("Tier {n}"),
    }
}

/// Transient hover state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TooltipState {
    /// Whether the tooltip is shown.
    pub visible: bool,
    /// Last pointer position.
    pub position: ScreenPoint,
    /// Hovered country.
    pub country: Option<Arc<Country>>,
}

impl TooltipState {
    /// The empty, hidden state.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Where the tooltip box is placed.
    pub fn anchor(&self) -> ScreenPoint {
        ScreenPoint::new(self.position.x + TOOLTIP_OFFSET.0, self.position.y + TOOLTIP_OFFSET.1)
    }

    /// Whether a country tooltip should be drawn.
    pub fn is_shown(&self) -> bool {
        self.visible && self.country.is_some()
    }
}

/// Pointer events over features.
#[derive(Debug, Clone, PartialEq)]
pub enum HoverEvent {
    /// Pointer entered a feature.
    Enter {
        /// Numeric feature id.
        feature_id: String,
        /// Pointer position.
        at: ScreenPoint,
    },
    /// Pointer moved within the hovered feature.
    Move {
        /// Pointer position.
        at: ScreenPoint,
    },
    /// Pointer left the hovered feature.
    Leave,
}

/// Owns the tooltip cell and the currently hovered feature.
#[derive(Debug, Clone, Default)]
pub struct InteractionLayer {
    tooltip: TooltipState,
    hovered: Option<String>,
}

impl InteractionLayer {
    /// Create a layer with an empty tooltip.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current tooltip.
    pub fn tooltip(&self) -> &TooltipState {
        &self.tooltip
    }

    /// Feature under the pointer, if any.
    pub fn hovered(&self) -> Option<&str> {
        self.hovered.as_deref()
    }

    /// Apply one event.
    pub fn handle(&mut self, event: HoverEvent, lookup: &CountryLookup) {
        match event {
            HoverEvent::Enter { feature_id, at } => {
                if let Some(country) = lookup.get(&feature_id) {
                    self.tooltip = TooltipState {
                        visible: true,
                        position: at,
                        country: Some(Arc::clone(country)),
                    };
                }
            }
            HoverEvent::Move { at } => self.tooltip.position = at,
            HoverEvent::Leave => self.tooltip = TooltipState::empty(),
        }
    }

    /// Translate "pointer at `at` over `hit`" into hover events and apply them.
    ///
    /// Returns the events in the order they were applied.
    pub fn track(&mut self, hit: Option<&str>, at: ScreenPoint, lookup: &CountryLookup) -> Vec<HoverEvent> {
        let mut events = Vec::new();
        if self.hovered.as_deref() == hit {
            if hit.is_some() {
                events.push(HoverEvent::Move { at });
            }
        } else {
            if self.hovered.take().is_some() {
                events.push(HoverEvent::Leave);
            }
            if let Some(id) = hit {
                self.hovered = Some(id.to_string());
                events.push(HoverEvent::Enter {
                    feature_id: id.to_string(),
                    at,
                });
            }
        }
        for event in &events {
            self.handle(event.clone(), lookup);
        }
        events
    }

    /// Pointer left the map entirely.
    pub fn pointer_left(&mut self, lookup: &CountryLookup) -> Option<HoverEvent> {
        self.hovered.take()?;
        self.handle(HoverEvent::Leave, lookup);
        Some(HoverEvent::Leave)
    }
}

/// Layer-specific detail line of a tooltip.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum TooltipDetail {
    /// Power tier with its label and swatch color.
    Tier {
        /// Tier number.
        tier: i32,
        /// Tier label.
        label: String,
        /// Swatch color from the layer's color scale.
        swatch: Option<String>,
    },
    /// Names of every alliance the country belongs to.
    Alliances {
        /// Alliance names, raw ids where no alliance matches.
        names: Vec<String>,
    },
}

/// Content of a country tooltip under a layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TooltipContent {
    /// Country name.
    pub title: String,
    /// Layer-specific detail, if any.
    pub detail: Option<TooltipDetail>,
    /// Country description, shown under every layer.
    pub description: String,
}

impl TooltipContent {
    /// Build the tooltip of `country` under `layer`.
    ///
    /// Alliance names list full membership in the country's own order,
    /// unlike the fill which only uses the first matching alliance.
    pub fn for_layer(country: &Country, layer: LayerKind, alliances: &[Alliance], power_tiers: &LayerConfig) -> Self {
        let detail = match layer {
            LayerKind::PowerTiers => Some(TooltipDetail::Tier {
                tier: country.power_tier,
                label: tier_label(country.power_tier),
                swatch: power_tiers.color_for_value(country.power_tier).map(str::to_string),
            }),
            LayerKind::Alliances if !country.alliances.is_empty() => Some(TooltipDetail::Alliances {
                names: country
                    .alliances
                    .iter()
                    .map(|id| {
                        alliances
                            .iter()
                            .find(|a| &a.id == id)
                            .map(|a| a.name.clone())
                            .unwrap_or_else(|| id.clone())
                    })
                    .collect(),
            }),
            LayerKind::Alliances | LayerKind::Conflicts => None,
        };

        Self {
            title: country.name.clone(),
            detail,
            description: country.description.clone(),
        }
    }

    /// Single-line text of the detail, if any.
    pub fn detail_text(&self) -> Option<String> {
        match self.detail.as_ref()? {
            TooltipDetail::Tier { tier, label, .. } => Some(format!("Tier {tier} \u{2014} {label}")),
            TooltipDetail::Alliances { names } => Some(names.join(", ")),
        }
    }
}
