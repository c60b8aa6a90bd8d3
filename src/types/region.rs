//! Regions and geographic bounding windows.

use serde::{Deserialize, Serialize};

/// A geographic window given by two `[lat, lon]` corners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoBounds {
    /// North-west corner as `[lat, lon]`.
    pub top_left: [f64; 2],
    /// South-east corner as `[lat, lon]`.
    pub bottom_right: [f64; 2],
}

impl GeoBounds {
    /// Create bounds from `[lat, lon]` corners.
    pub fn new(top_left: [f64; 2], bottom_right: [f64; 2]) -> Self {
        Self { top_left, bottom_right }
    }

    /// Midpoint of the window as `(lon, lat)`.
    pub fn center(&self) -> (f64, f64) {
        let [lat1, lon1] = self.top_left;
        let [lat2, lon2] = self.bottom_right;
        ((lon1 + lon2) / 2.0, (lat1 + lat2) / 2.0)
    }

    /// The window's corners as `(lon, lat)` pairs.
    pub fn corners(&self) -> [(f64, f64); 2] {
        let [lat1, lon1] = self.top_left;
        let [lat2, lon2] = self.bottom_right;
        [(lon1, lat1), (lon2, lat2)]
    }
}

/// A region of interest with its member countries and analysis document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    /// Region identifier (also the page slug).
    pub id: String,
    /// Display name.
    pub name: String,
    /// Member ISO alpha-2 codes.
    #[serde(default)]
    pub countries: Vec<String>,
    /// Bounding window.
    pub bounds: GeoBounds,
    /// Associated conflict identifiers.
    #[serde(default)]
    pub conflicts: Vec<String>,
    /// Path of the long-form analysis document, relative to the content root.
    #[serde(default)]
    pub analysis: String,
}

impl Region {
    /// Whether the ISO code is a member of this region.
    pub fn includes(&self, iso_code: &str) -> bool {
        self.countries.iter().any(|c| c == iso_code)
    }
}
