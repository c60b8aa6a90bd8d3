//! Country records.

use serde::{Deserialize, Serialize};

/// Lowest (most powerful) valid power tier.
pub const MIN_POWER_TIER: i32 = 1;

/// Highest (least powerful) valid power tier.
pub const MAX_POWER_TIER: i32 = 5;

/// A country as supplied by the domain data collaborator.
///
/// The ISO alpha-2 code is unique across a country set and is the only
/// field the identifier bridge looks at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Country {
    /// Domain identifier (referenced by alliances and conflicts).
    pub id: String,
    /// Display name.
    pub name: String,
    /// ISO 3166-1 alpha-2 code.
    pub iso_code: String,
    /// Power tier, 1 (superpower) through 5 (minor power).
    pub power_tier: i32,
    /// Alliance identifiers this country belongs to.
    #[serde(default)]
    pub alliances: Vec<String>,
    /// Conflict identifiers this country participates in.
    #[serde(default)]
    pub conflicts: Vec<String>,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
}

impl Country {
    /// Create a country with no memberships and an empty description.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        iso_code: impl Into<String>,
        power_tier: i32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            iso_code: iso_code.into(),
            power_tier,
            alliances: Vec::new(),
            conflicts: Vec::new(),
            description: String::new(),
        }
    }

    /// Builder-style alliance memberships.
    pub fn with_alliances<I, S>(mut self, alliances: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.alliances = alliances.into_iter().map(Into::into).collect();
        self
    }

    /// Builder-style conflict memberships.
    pub fn with_conflicts<I, S>(mut self, conflicts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.conflicts = conflicts.into_iter().map(Into::into).collect();
        self
    }

    /// Builder-style description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Whether the tier lies in the documented `[1, 5]` range.
    pub fn has_known_tier(&self) -> bool {
        (MIN_POWER_TIER..=MAX_POWER_TIER).contains(&self.power_tier)
    }
}
