//! Conflict records.

use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};

/// An active conflict with direct parties and per-side supporters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conflict {
    /// Conflict identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Directly involved country identifiers.
    #[serde(default)]
    pub parties: Vec<String>,
    /// Side label -> supporting country identifiers.
    #[serde(default)]
    pub supporters: BTreeMap<String, Vec<String>>,
    /// Status label ("active", "frozen", ...).
    #[serde(default)]
    pub status: String,
    /// Owning region identifier.
    #[serde(default)]
    pub region: String,
}

impl Conflict {
    /// Create a conflict with parties and no supporters.
    pub fn new<I, S>(id: impl Into<String>, name: impl Into<String>, parties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            name: name.into(),
            parties: parties.into_iter().map(Into::into).collect(),
            supporters: BTreeMap::new(),
            status: String::new(),
            region: String::new(),
        }
    }

    /// Builder-style supporter list for one side.
    pub fn with_supporters<I, S>(mut self, side: impl Into<String>, supporters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.supporters
            .insert(side.into(), supporters.into_iter().map(Into::into).collect());
        self
    }

    /// Builder-style status label.
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    /// Every involved country id: parties first, then supporters by side.
    ///
    /// May contain duplicates when a country appears in several roles.
    pub fn involved(&self) -> impl Iterator<Item = &str> {
        self.parties
            .iter()
            .chain(self.supporters.values().flatten())
            .map(String::as_str)
    }
}
