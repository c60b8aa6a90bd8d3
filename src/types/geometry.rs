//! Decoded topology features in geographic coordinates.
//!
//! Coordinates are `(x = longitude, y = latitude)` in degrees.

use std::collections::BTreeSet;
use geo::{BoundingRect, MultiPolygon, Rect};

/// One country boundary keyed by its numeric topology identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryFeature {
    /// ISO 3166-1 numeric code as a string (e.g. `"076"`).
    pub id: String,
    /// Boundary polygons. Empty for features without geometry.
    pub geometry: MultiPolygon<f64>,
}

impl GeometryFeature {
    /// Create a feature.
    pub fn new(id: impl Into<String>, geometry: MultiPolygon<f64>) -> Self {
        Self {
            id: id.into(),
            geometry,
        }
    }

    /// Whether the feature carries no polygons.
    pub fn is_empty(&self) -> bool {
        self.geometry.0.is_empty()
    }
}

/// An ordered collection of features. Draw order is collection order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureCollection {
    /// Features in draw order.
    pub features: Vec<GeometryFeature>,
}

impl FeatureCollection {
    /// Create a collection.
    pub fn new(features: Vec<GeometryFeature>) -> Self {
        Self { features }
    }

    /// Number of features.
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Whether the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Iterate features in draw order.
    pub fn iter(&self) -> impl Iterator<Item = &GeometryFeature> {
        self.features.iter()
    }

    /// Find a feature by id.
    pub fn get(&self, id: &str) -> Option<&GeometryFeature> {
        self.features.iter().find(|f| f.id == id)
    }

    /// Features whose id is in `ids`, in draw order.
    pub fn subset<'a>(&'a self, ids: &'a BTreeSet<String>) -> impl Iterator<Item = &'a GeometryFeature> + 'a {
        self.features.iter().filter(move |f| ids.contains(&f.id))
    }

    /// Geographic bounding box of all non-empty features.
    pub fn bounding_rect(&self) -> Option<Rect<f64>> {
        merge_rects(self.features.iter().filter_map(|f| f.geometry.bounding_rect()))
    }
}

fn merge_rects(rects: impl Iterator<Item = Rect<f64>>) -> Option<Rect<f64>> {
    rects.reduce(|a, b| {
        Rect::new(
            (a.min().x.min(b.min().x), a.min().y.min(b.min().y)),
            (a.max().x.max(b.max().x), a.max().y.max(b.max().y)),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::polygon;

    fn square(id: &str, x: f64, y: f64, size: f64) -> GeometryFeature {
        let poly = polygon![
            (x: x, y: y),
            (x: x + size, y: y),
            (x: x + size, y: y + size),
            (x: x, y: y + size),
            (x: x, y: y),
        ];
        GeometryFeature::new(id, MultiPolygon(vec![poly]))
    }

    #[test]
    fn test_subset_preserves_draw_order() {
        let collection = FeatureCollection::new(vec![
            square("840", 0.0, 0.0, 1.0),
            square("124", 5.0, 5.0, 1.0),
            square("484", 10.0, 10.0, 1.0),
        ]);
        let ids: BTreeSet<String> = ["484".to_string(), "840".to_string()].into();
        let picked: Vec<_> = collection.subset(&ids).map(|f| f.id.as_str()).collect();
        assert_eq!(picked, vec!["840", "484"]);
    }

    #[test]
    fn test_bounding_rect_merges_features() {
        let collection = FeatureCollection::new(vec![
            square("1", -10.0, -5.0, 2.0),
            square("2", 20.0, 30.0, 5.0),
            GeometryFeature::new("3", MultiPolygon(vec![])),
        ]);
        let rect = collection.bounding_rect().unwrap();
        assert_eq!(rect.min().x, -10.0);
        assert_eq!(rect.max().y, 35.0);
    }
}
