//! GeoJSON polygon handling for the department map.
//!
//! Geometry stays opaque everywhere else; this is the only place that
//! reads coordinates.

use crate::data::Geometry;
use serde_json::Value;

/// Latitude used to correct longitudes so France is not stretched.
const MEAN_LATITUDE_DEG: f64 = 46.5;

/// Closed ring of projected points.
pub type Ring = Vec<[f64; 2]>;

/// One polygon: outer ring first, holes after.
pub type PolygonRings = Vec<Ring>;

/// Equirectangular projection centred on mainland France.
pub fn project([lon, lat]: [f64; 2]) -> [f64; 2] {
    [lon * MEAN_LATITUDE_DEG.to_radians().cos(), lat]
}

/// Projected polygons of a `Polygon` or `MultiPolygon` geometry.
///
/// Other geometry types and malformed coordinates yield no polygons.
pub fn polygons(geometry: &Geometry) -> Vec<PolygonRings> {
    let json = geometry.as_json();
    let coordinates = &json["coordinates"];
    match json["type"].as_str() {
        Some("Polygon") => parse_polygon(coordinates).into_iter().collect(),
        Some("MultiPolygon") => coordinates
            .as_array()
            .map(|polys| polys.iter().filter_map(parse_polygon).collect())
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}

fn parse_polygon(value: &Value) -> Option<PolygonRings> {
    value.as_array()?.iter().map(parse_ring).collect()
}

fn parse_ring(value: &Value) -> Option<Ring> {
    value
        .as_array()?
        .iter()
        .map(|point| {
            let point = point.as_array()?;
            Some(project([point.first()?.as_f64()?, point.get(1)?.as_f64()?]))
        })
        .collect()
}

/// Even-odd point test over all rings of each polygon.
pub fn contains(polygons: &[PolygonRings], point: [f64; 2]) -> bool {
    polygons.iter().any(|rings| {
        rings
            .iter()
            .filter(|ring| ring_contains(ring, point))
            .count()
            % 2
            == 1
    })
}

fn ring_contains(ring: &[[f64; 2]], [x, y]: [f64; 2]) -> bool {
    let mut inside = false;
    let mut j = ring.len().wrapping_sub(1);
    for i in 0..ring.len() {
        let [xi, yi] = ring[i];
        let [xj, yj] = ring[j];
        if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}
