//! TopoJSON decoding.
//!
//! A topology stores shared boundary arcs once; polygons reference arcs by
//! index (negative indices `~i` mean "arc `i`, reversed"). Quantized
//! topologies delta-encode arc positions and carry a `transform` that maps
//! integer positions back to longitude/latitude.
//!
//! Decoding stitches arcs into closed rings and yields one
//! [`GeometryFeature`] per geometry of the named object.

use std::collections::BTreeMap;

use geo::{Coord, LineString, MultiPolygon, Polygon};
use serde::Deserialize;
use serde_json::Value;

use super::TopologyError;
use crate::types::{FeatureCollection, GeometryFeature};

#[derive(Debug, Deserialize)]
struct Topology {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    transform: Option<Transform>,
    #[serde(default)]
    objects: BTreeMap<String, TopoGeometry>,
    #[serde(default)]
    arcs: Vec<Vec<Vec<f64>>>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
struct Transform {
    scale: [f64; 2],
    translate: [f64; 2],
}

#[derive(Debug, Deserialize)]
struct TopoGeometry {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    arcs: Option<Value>,
    #[serde(default)]
    geometries: Option<Vec<TopoGeometry>>,
}

/// Decode a topology document and extract the named object as features.
pub fn decode_topology(bytes: &[u8], object_name: &str) -> Result<FeatureCollection, TopologyError> {
    let topology: Topology = serde_json::from_slice(bytes)?;
    if topology.kind != "Topology" {
        return Err(TopologyError::NotTopology(topology.kind));
    }

    let object = topology
        .objects
        .get(object_name)
        .ok_or_else(|| TopologyError::MissingObject(object_name.to_string()))?;

    let arcs = decode_arcs(&topology.arcs, topology.transform)?;

    let geometries: Vec<&TopoGeometry> = match object.kind.as_deref() {
        Some("GeometryCollection") => object.geometries.iter().flatten().collect(),
        _ => vec![object],
    };

    let mut features = Vec::with_capacity(geometries.len());
    for geometry in geometries {
        features.push(GeometryFeature::new(
            normalize_id(geometry.id.as_ref()),
            decode_geometry(geometry, &arcs)?,
        ));
    }

    Ok(FeatureCollection::new(features))
}

/// Normalize a feature id: strings pass through, integers become
/// three-digit zero-padded strings.
pub fn normalize_id(id: Option<&Value>) -> String {
    match id {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => match n.as_u64() {
            Some(code) => format!("{code:03}"),
            None => n.to_string(),
        },
        _ => String::new(),
    }
}

/// Convert every arc to absolute geographic coordinates.
fn decode_arcs(raw: &[Vec<Vec<f64>>], transform: Option<Transform>) -> Result<Vec<Vec<Coord<f64>>>, TopologyError> {
    let mut decoded = Vec::with_capacity(raw.len());
    for (arc_index, arc) in raw.iter().enumerate() {
        let mut x = 0.0;
        let mut y = 0.0;
        let mut coords = Vec::with_capacity(arc.len());
        for position in arc {
            let (px, py) = match position.as_slice() {
                [px, py, ..] => (*px, *py),
                _ => return Err(TopologyError::InvalidPosition(arc_index)),
            };
            let coord = match transform {
                Some(t) => {
                    x += px;
                    y += py;
                    Coord {
                        x: x * t.scale[0] + t.translate[0],
                        y: y * t.scale[1] + t.translate[1],
                    }
                }
                None => Coord { x: px, y: py },
            };
            coords.push(coord);
        }
        decoded.push(coords);
    }
    Ok(decoded)
}

fn decode_geometry(geometry: &TopoGeometry, arcs: &[Vec<Coord<f64>>]) -> Result<MultiPolygon<f64>, TopologyError> {
    let Some(raw_arcs) = geometry.arcs.as_ref() else {
        return Ok(MultiPolygon(Vec::new()));
    };

    match geometry.kind.as_deref() {
        Some("Polygon") => {
            let rings: Vec<Vec<i64>> = serde_json::from_value(raw_arcs.clone())?;
            Ok(MultiPolygon(vec![polygon(&rings, arcs)?]))
        }
        Some("MultiPolygon") => {
            let polygons: Vec<Vec<Vec<i64>>> = serde_json::from_value(raw_arcs.clone())?;
            let decoded = polygons
                .iter()
                .map(|rings| polygon(rings, arcs))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(MultiPolygon(decoded))
        }
        other => {
            tracing::debug!(kind = ?other, "Skipping non-polygonal topology geometry");
            Ok(MultiPolygon(Vec::new()))
        }
    }
}

fn polygon(rings: &[Vec<i64>], arcs: &[Vec<Coord<f64>>]) -> Result<Polygon<f64>, TopologyError> {
    let mut decoded = rings
        .iter()
        .map(|ring_arcs| ring(ring_arcs, arcs))
        .collect::<Result<Vec<_>, _>>()?
        .into_iter();
    let exterior = decoded.next().unwrap_or_else(|| LineString(Vec::new()));
    Ok(Polygon::new(exterior, decoded.collect()))
}

/// Stitch arcs into one closed ring. Consecutive arcs share an endpoint,
/// which is kept only once.
fn ring(ring_arcs: &[i64], arcs: &[Vec<Coord<f64>>]) -> Result<LineString<f64>, TopologyError> {
    let mut points: Vec<Coord<f64>> = Vec::new();
    for &index in ring_arcs {
        let (arc_index, reversed) = if index < 0 { (!index, true) } else { (index, false) };
        let arc = usize::try_from(arc_index)
            .ok()
            .and_then(|i| arcs.get(i))
            .ok_or(TopologyError::InvalidArc(index))?;

        points.pop();
        if reversed {
            points.extend(arc.iter().rev().copied());
        } else {
            points.extend(arc.iter().copied());
        }
    }

    if points.len() < 4 {
        if let Some(&first) = points.first() {
            points.push(first);
        }
    }
    Ok(LineString(points))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two unit squares sharing the edge x = 1, quantized with a 1-degree scale.
    const SHARED_EDGE: &str = r#"{
        "type": "Topology",
        "transform": {"scale": [1, 1], "translate": [0, 0]},
        "objects": {
            "countries": {
                "type": "GeometryCollection",
                "geometries": [
                    {"type": "Polygon", "id": "840", "arcs": [[0, 1]]},
                    {"type": "Polygon", "id": 76, "arcs": [[2, -1]]},
                    {"type": null, "id": "010"}
                ]
            }
        },
        "arcs": [
            [[1, 0], [0, 1]],
            [[1, 1], [-1, 0], [0, -1], [1, 0]],
            [[1, 0], [1, 0], [0, 1], [-1, 0]]
        ]
    }"#;

    fn coords(feature: &GeometryFeature) -> Vec<(f64, f64)> {
        feature.geometry.0[0].exterior().0.iter().map(|c| (c.x, c.y)).collect()
    }

    #[test]
    fn test_decode_shared_edge() {
        let collection = decode_topology(SHARED_EDGE.as_bytes(), "countries").unwrap();
        assert_eq!(collection.len(), 3);

        let west = collection.get("840").unwrap();
        assert_eq!(
            coords(west),
            vec![(1.0, 0.0), (1.0, 1.0), (0.0, 1.0), (0.0, 0.0), (1.0, 0.0)]
        );

        // Reversed shared arc closes the eastern square.
        let east = collection.get("076").unwrap();
        assert_eq!(
            coords(east),
            vec![(1.0, 0.0), (2.0, 0.0), (2.0, 1.0), (1.0, 1.0), (1.0, 0.0)]
        );
    }

    #[test]
    fn test_null_geometry_is_empty_feature() {
        let collection = decode_topology(SHARED_EDGE.as_bytes(), "countries").unwrap();
        assert!(collection.get("010").unwrap().is_empty());
    }

    #[test]
    fn test_missing_object() {
        let err = decode_topology(SHARED_EDGE.as_bytes(), "land").unwrap_err();
        assert!(matches!(err, TopologyError::MissingObject(name) if name == "land"));
    }

    #[test]
    fn test_not_a_topology() {
        let err = decode_topology(br#"{"type": "FeatureCollection"}"#, "countries").unwrap_err();
        assert!(matches!(err, TopologyError::NotTopology(_)));
    }

    #[test]
    fn test_invalid_arc_index() {
        let doc = r#"{
            "type": "Topology",
            "objects": {"countries": {"type": "Polygon", "id": "1", "arcs": [[5]]}},
            "arcs": [[[0, 0], [1, 1]]]
        }"#;
        let err = decode_topology(doc.as_bytes(), "countries").unwrap_err();
        assert!(matches!(err, TopologyError::InvalidArc(5)));
    }

    #[test]
    fn test_most_negative_arc_index_is_invalid() {
        let doc = r#"{
            "type": "Topology",
            "objects": {"countries": {"type": "Polygon", "id": "1", "arcs": [[-9223372036854775808]]}},
            "arcs": [[[0, 0], [1, 1]]]
        }"#;
        let err = decode_topology(doc.as_bytes(), "countries").unwrap_err();
        assert!(matches!(err, TopologyError::InvalidArc(i64::MIN)));
    }

    #[test]
    fn test_unquantized_arcs_are_absolute() {
        let doc = r#"{
            "type": "Topology",
            "objects": {"countries": {"type": "Polygon", "id": "1", "arcs": [[0]]}},
            "arcs": [[[10, 10], [12, 10], [12, 12], [10, 10]]]
        }"#;
        let collection = decode_topology(doc.as_bytes(), "countries").unwrap();
        let ring = coords(collection.get("1").unwrap());
        assert_eq!(ring[1], (12.0, 10.0));
    }

    #[test]
    fn test_normalize_id() {
        assert_eq!(normalize_id(Some(&Value::from("076"))), "076");
        assert_eq!(normalize_id(Some(&Value::from(8))), "008");
        assert_eq!(normalize_id(Some(&Value::from(840))), "840");
        assert_eq!(normalize_id(None), "");
    }
}
