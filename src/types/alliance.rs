//! Alliance records.

use serde::{Deserialize, Serialize};

/// A named alliance with an ordered member list and a display color.
///
/// Members that do not correspond to a known country are ignored when
/// rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alliance {
    /// Alliance identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Member country identifiers, in listed order.
    #[serde(default)]
    pub members: Vec<String>,
    /// Fill color used under the alliances layer.
    pub color: String,
    /// Category label (military, economic, ...).
    #[serde(rename = "type", default)]
    pub category: String,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
}

impl Alliance {
    /// Create an alliance with the given members.
    pub fn new<I, S>(id: impl Into<String>, name: impl Into<String>, color: impl Into<String>, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            name: name.into(),
            members: members.into_iter().map(Into::into).collect(),
            color: color.into(),
            category: String::new(),
            description: String::new(),
        }
    }

    /// Whether the given country id is a listed member.
    pub fn has_member(&self, country_id: &str) -> bool {
        self.members.iter().any(|m| m == country_id)
    }
}
