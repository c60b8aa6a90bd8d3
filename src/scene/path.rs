//! SVG path data for projected polygons.
//!
//! Coordinates are rounded to three decimals. Each ring becomes one closed
//! subpath (`M x,y Lx,y ... Z`) without repeating its closing vertex.

use std::fmt::Write;

use geo::{LineString, MultiPolygon};

/// Path data for a projected multipolygon. Empty geometry yields `""`.
pub fn path_data(shape: &MultiPolygon<f64>) -> String {
    let mut out = String::new();
    for polygon in &shape.0 {
        write_ring(&mut out, polygon.exterior());
        for interior in polygon.interiors() {
            write_ring(&mut out, interior);
        }
    }
    out
}

fn write_ring(out: &mut String, ring: &LineString<f64>) {
    let mut points = ring.0.as_slice();
    if points.len() > 1 && points.first() == points.last() {
        points = &points[..points.len() - 1];
    }
    if points.is_empty() {
        return;
    }

    for (i, point) in points.iter().enumerate() {
        let command = if i == 0 { 'M' } else { 'L' };
        let _ = write!(out, "{}{},{}", command, round3(point.x), round3(point.y));
    }
    out.push('Z');
}

fn round3(value: f64) -> f64 {
    let rounded = (value * 1000.0).round() / 1000.0;
    // Avoid printing "-0".
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}
