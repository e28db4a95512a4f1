//! Polygon summary shown after drawing.

use crate::{measure_polygon, NoFlyZones};
use geo::Polygon;
use serde::{Deserialize, Serialize};

/// Everything the info dialog shows about a drawn polygon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolygonInfo {
    /// Exterior ring vertices as `[longitude, latitude]`, closing vertex included
    pub coordinates: Vec<[f64; 2]>,
    /// Area in square meters
    pub area_m2: f64,
    /// Perimeter in meters
    pub perimeter_m: f64,
    /// Names of intersected no-fly zones, in catalogue order
    pub no_fly_zones: Vec<String>,
}

impl PolygonInfo {
    /// Measures the polygon and checks it against the catalogue.
    pub fn new(polygon: &Polygon<f64>, zones: &NoFlyZones) -> Self {
        let measurement = measure_polygon(polygon);
        Self {
            coordinates: polygon.exterior().coords().map(|c| [c.x, c.y]).collect(),
            area_m2: measurement.area_m2,
            perimeter_m: measurement.perimeter_m,
            no_fly_zones: zones.intersecting(polygon),
        }
    }

    /// Area with two decimals.
    pub fn area_display(&self) -> String {
        format!("{:.2}", self.area_m2)
    }

    /// Perimeter with two decimals.
    pub fn perimeter_display(&self) -> String {
        format!("{:.2}", self.perimeter_m)
    }

    /// Coordinates as indented JSON.
    pub fn coordinates_json(&self) -> String {
        serde_json::to_string_pretty(&self.coordinates).unwrap_or_else(|_| "[]".to_string())
    }

    /// True when at least one no-fly zone is hit.
    pub fn has_no_fly_conflict(&self) -> bool {
        !self.no_fly_zones.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::polygon;

    #[test]
    fn test_info_for_clear_polygon() {
        let zones = NoFlyZones::builtin().unwrap();
        let p = polygon![(x: 34.5, y: 30.5), (x: 34.51, y: 30.5), (x: 34.51, y: 30.51)];
        let info = PolygonInfo::new(&p, &zones);

        assert_eq!(info.coordinates.len(), 4);
        assert_eq!(info.coordinates[0], [34.5, 30.5]);
        assert!(!info.has_no_fly_conflict());
        assert!(info.area_m2 > 0.0);
    }

    #[test]
    fn test_display_rounds_to_two_decimals() {
        let info = PolygonInfo {
            coordinates: vec![],
            area_m2: 1234.5678,
            perimeter_m: 10.0,
            no_fly_zones: vec![],
        };
        assert_eq!(info.area_display(), "1234.57");
        assert_eq!(info.perimeter_display(), "10.00");
    }

    #[test]
    fn test_coordinates_json_is_pretty() {
        let info = PolygonInfo {
            coordinates: vec![[35.0, 31.0]],
            area_m2: 0.0,
            perimeter_m: 0.0,
            no_fly_zones: vec![],
        };
        let json = info.coordinates_json();
        assert!(json.contains('\n'));
        let back: Vec<[f64; 2]> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, info.coordinates);
    }

    #[test]
    fn test_conflict_lists_zone() {
        let zones = NoFlyZones::builtin().unwrap();
        let p = polygon![(x: 35.0, y: 32.81), (x: 35.01, y: 32.81), (x: 35.01, y: 32.82)];
        let info = PolygonInfo::new(&p, &zones);
        assert!(info.has_no_fly_conflict());
        assert_eq!(info.no_fly_zones, vec!["Haifa Port".to_string()]);
    }
}
