//! Shared fixtures for the map integration tests.

#![allow(dead_code)]

use geolayer_kernel::{
    Alliance, Conflict, Country, GeoBounds, LayerConfig, Region, StaticTopologySource,
};

/// Topology URI used by every fixture source.
pub const TOPOLOGY_URI: &str = "/geo/countries-110m.json";

/// Six unquantized rectangles standing in for real borders. Brazil's id is
/// numeric to exercise zero padding; "010" has no country record.
pub const TOPOLOGY: &str = r#"{
    "type": "Topology",
    "objects": {
        "countries": {
            "type": "GeometryCollection",
            "geometries": [
                {"type": "Polygon", "id": "010", "arcs": [[5]]},
                {"type": "Polygon", "id": "840", "arcs": [[0]]},
                {"type": "Polygon", "id": 76, "arcs": [[1]]},
                {"type": "Polygon", "id": "250", "arcs": [[2]]},
                {"type": "Polygon", "id": "887", "arcs": [[3]]},
                {"type": "Polygon", "id": "262", "arcs": [[4]]}
            ]
        }
    },
    "arcs": [
        [[-120, 30], [-80, 30], [-80, 50], [-120, 50], [-120, 30]],
        [[-70, -30], [-40, -30], [-40, 0], [-70, 0], [-70, -30]],
        [[0, 42], [8, 42], [8, 50], [0, 50], [0, 42]],
        [[43, 12], [53, 12], [53, 18], [43, 18], [43, 12]],
        [[42, 11], [43, 11], [43, 12.5], [42, 12.5], [42, 11]],
        [[-180, -85], [180, -85], [180, -70], [-180, -70], [-180, -85]]
    ]
}"#;

pub fn topology_source() -> StaticTopologySource {
    StaticTopologySource::new().with_document(TOPOLOGY_URI, TOPOLOGY)
}

pub fn countries() -> Vec<Country> {
    vec![
        Country::new("usa", "United States", "US", 1).with_description("Global military and economic hegemon."),
        Country::new("bra", "Brazil", "BR", 3).with_alliances(["brics"]),
        Country::new("fra", "France", "FR", 2).with_alliances(["nato", "eu"]),
        Country::new("yem", "Yemen", "YE", 5).with_conflicts(["red-sea"]),
        Country::new("dji", "Djibouti", "DJ", 7),
    ]
}

pub fn alliances() -> Vec<Alliance> {
    vec![
        Alliance::new("nato", "NATO", "#2563EB", ["fra"]),
        Alliance::new("eu", "European Union", "#FACC15", ["fra"]),
        Alliance::new("brics", "BRICS", "#16A34A", ["bra", "ghost"]),
    ]
}

pub fn conflicts() -> Vec<Conflict> {
    vec![Conflict::new("red-sea", "Red Sea Crisis", ["yem"])
        .with_supporters("coalition", ["dji"])
        .with_status("active")]
}

pub fn power_tiers() -> LayerConfig {
    LayerConfig::new("power-tiers", "Power Tiers", "powerTier")
        .with_color("1", "#111")
        .with_color("2", "#222")
        .with_color("3", "#333")
        .with_color("4", "#444")
        .with_color("5", "#555")
        .with_legend("Superpower", "#111")
        .with_legend("Great Power", "#222")
}

pub fn red_sea() -> Region {
    Region {
        id: "red-sea".into(),
        name: "The Red Sea".into(),
        countries: vec!["YE".into(), "DJ".into(), "ER".into(), "ZZ".into()],
        bounds: GeoBounds::new([30.0, 32.0], [11.0, 45.0]),
        conflicts: vec!["red-sea".into()],
        analysis: "content/regions/red-sea.md".into(),
    }
}
