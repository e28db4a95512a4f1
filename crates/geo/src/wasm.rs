//! WASM bindings for the geo crate.
//!
//! These bindings let the browser front end measure drawn polygons and
//! check them against the no-fly catalogue without a server round trip.

use crate::{collection_bounds, parse_feature_collection, polygon_from_coordinates, Coordinate, NoFlyZones, PolygonInfo};
use wasm_bindgen::prelude::*;

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn polygon_info_with(coordinates_json: &str, zones: &NoFlyZones) -> Result<String, JsValue> {
    let pairs: Vec<[f64; 2]> = serde_json::from_str(coordinates_json)
        .map_err(|e| JsValue::from_str(&format!("JSON parse error: {}", e)))?;
    let vertices: Vec<Coordinate> = pairs.iter().map(|[lng, lat]| Coordinate::new(*lat, *lng)).collect();

    let polygon = polygon_from_coordinates(&vertices).map_err(js_err)?;
    let info = PolygonInfo::new(&polygon, zones);

    serde_json::to_string(&info).map_err(|e| JsValue::from_str(&format!("JSON serialize error: {}", e)))
}

/// Measure a drawn polygon against the bundled no-fly zones.
///
/// # Arguments
/// * `coordinates_json` - JSON array of `[lng, lat]` pairs
///
/// # Returns
/// JSON string of the polygon info
#[wasm_bindgen]
pub fn polygon_info(coordinates_json: &str) -> Result<String, JsValue> {
    let zones = NoFlyZones::builtin().map_err(js_err)?;
    polygon_info_with(coordinates_json, &zones)
}

/// Measure a drawn polygon against a caller-supplied zone catalogue.
#[wasm_bindgen]
pub fn polygon_info_with_zones(coordinates_json: &str, zones_geojson: &str) -> Result<String, JsValue> {
    let zones = NoFlyZones::from_geojson_str(zones_geojson).map_err(js_err)?;
    polygon_info_with(coordinates_json, &zones)
}

/// Bounding box of an uploaded GeoJSON file.
///
/// # Returns
/// JSON `{south, west, north, east}`, or `null` for an empty file
#[wasm_bindgen]
pub fn geojson_bounds(geojson: &str) -> Result<String, JsValue> {
    let collection = parse_feature_collection(geojson).map_err(js_err)?;
    let bounds = collection_bounds(&collection).map_err(js_err)?;
    serde_json::to_string(&bounds).map_err(js_err)
}

/// The bundled no-fly zones as a GeoJSON string.
#[wasm_bindgen]
pub fn builtin_no_fly_zones() -> Result<String, JsValue> {
    NoFlyZones::builtin().map(|z| z.to_geojson_string()).map_err(js_err)
}
