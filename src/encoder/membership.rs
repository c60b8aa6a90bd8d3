//! Binary membership encoder for the region view.

use std::collections::BTreeSet;

use super::{FillEncoder, HIGHLIGHT_FILL, NEUTRAL_FILL};
use crate::bridge::IdentifierBridge;

/// Default opacity of features outside the highlighted set.
pub const CONTEXT_OPACITY: f64 = 0.3;

/// Highlights a fixed set of features; everything else is dimmed context.
#[derive(Debug, Clone, PartialEq)]
pub struct MembershipEncoder {
    highlighted: BTreeSet<String>,
    context_opacity: f64,
}

impl MembershipEncoder {
    /// Create an encoder from feature ids.
    pub fn new(highlighted: BTreeSet<String>) -> Self {
        Self {
            highlighted,
            context_opacity: CONTEXT_OPACITY,
        }
    }

    /// Create an encoder from member ISO codes. Codes outside the bridge's
    /// table are dropped.
    pub fn from_iso_codes<'a, I>(bridge: &IdentifierBridge, iso_codes: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        Self::new(bridge.resolve_all(iso_codes))
    }

    /// Builder-style context opacity, clamped to `[0, 1]`.
    pub fn with_context_opacity(mut self, opacity: f64) -> Self {
        self.context_opacity = opacity.clamp(0.0, 1.0);
        self
    }

    /// Highlighted feature ids.
    pub fn highlighted(&self) -> &BTreeSet<String> {
        &self.highlighted
    }

    /// Whether a feature is highlighted.
    pub fn is_highlighted(&self, feature_id: &str) -> bool {
        self.highlighted.contains(feature_id)
    }
}

impl FillEncoder for MembershipEncoder {
    fn fill(&self, feature_id: &str) -> &str {
        if self.is_highlighted(feature_id) {
            HIGHLIGHT_FILL
        } else {
            NEUTRAL_FILL
        }
    }

    fn opacity(&self, feature_id: &str) -> f64 {
        if self.is_highlighted(feature_id) {
            1.0
        } else {
            self.context_opacity
        }
    }
}
