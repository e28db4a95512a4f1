//! No-fly zone catalogue.
//!
//! A catalogue is a GeoJSON FeatureCollection of Polygon or MultiPolygon
//! features, each optionally carrying a `name` property. The bundled
//! catalogue is compiled into the binary.

use crate::{GeoError, Result};
use geo::{Intersects, MultiPolygon, Polygon};
use geojson::{FeatureCollection, GeoJson};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

const BUILTIN_ZONES: &str = include_str!("../data/no_fly_zones.geojson");

/// Name given to zones whose feature has no `name` property.
pub const UNNAMED_ZONE: &str = "unnamed zone";

/// A single restricted area.
#[derive(Debug, Clone, PartialEq)]
pub struct NoFlyZone {
    /// Display name
    pub name: String,
    /// Restricted area
    pub area: MultiPolygon<f64>,
}

impl NoFlyZone {
    /// Whether the polygon shares any point with this zone, boundary included.
    pub fn intersects(&self, polygon: &Polygon<f64>) -> bool {
        self.area.0.iter().any(|zone| zone.intersects(polygon))
    }
}

/// Ordered collection of no-fly zones.
#[derive(Debug, Clone)]
pub struct NoFlyZones {
    zones: Vec<NoFlyZone>,
    source: FeatureCollection,
}

impl NoFlyZones {
    /// The catalogue shipped with dronemap.
    pub fn builtin() -> Result<Self> {
        Self::from_geojson_str(BUILTIN_ZONES)
    }

    /// Parses a catalogue from GeoJSON text.
    pub fn from_geojson_str(text: &str) -> Result<Self> {
        let source = crate::parse_feature_collection(text)?;
        let mut zones = Vec::with_capacity(source.features.len());

        for (index, feature) in source.features.iter().enumerate() {
            let name = feature
                .property("name")
                .and_then(|v| v.as_str())
                .map_or_else(|| UNNAMED_ZONE.to_string(), str::to_string);

            let geometry = feature.geometry.clone().ok_or_else(|| {
                GeoError::NoPolygon(format!("zone #{index} ({name}) has no geometry"))
            })?;

            let area = match geo::Geometry::<f64>::try_from(geometry)? {
                geo::Geometry::Polygon(p) => MultiPolygon::new(vec![p]),
                geo::Geometry::MultiPolygon(mp) => mp,
                _ => {
                    return Err(GeoError::NoPolygon(format!(
                        "zone #{index} ({name}) is not a Polygon or MultiPolygon"
                    )));
                }
            };

            zones.push(NoFlyZone { name, area });
        }

        Ok(Self { zones, source })
    }

    /// Names of every zone the polygon touches, in catalogue order.
    pub fn intersecting(&self, polygon: &Polygon<f64>) -> Vec<String> {
        #[cfg(feature = "parallel")]
        {
            self.zones
                .par_iter()
                .filter(|zone| zone.intersects(polygon))
                .map(|zone| zone.name.clone())
                .collect()
        }

        #[cfg(not(feature = "parallel"))]
        {
            self.zones
                .iter()
                .filter(|zone| zone.intersects(polygon))
                .map(|zone| zone.name.clone())
                .collect()
        }
    }

    /// Number of zones.
    pub fn len(&self) -> usize {
        self.zones.len()
    }

    /// Whether the catalogue is empty.
    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Iterate zones in catalogue order.
    pub fn iter(&self) -> impl Iterator<Item = &NoFlyZone> {
        self.zones.iter()
    }

    /// The catalogue as GeoJSON, for drawing it on the map.
    pub fn feature_collection(&self) -> &FeatureCollection {
        &self.source
    }

    /// The catalogue as a GeoJSON string.
    pub fn to_geojson_string(&self) -> String {
        GeoJson::FeatureCollection(self.source.clone()).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::polygon;

    fn square(west: f64, south: f64, size: f64) -> Polygon<f64> {
        polygon![
            (x: west, y: south),
            (x: west + size, y: south),
            (x: west + size, y: south + size),
            (x: west, y: south + size),
        ]
    }

    #[test]
    fn test_builtin_catalogue_loads() {
        let zones = NoFlyZones::builtin().unwrap();
        assert_eq!(zones.len(), 6);
        assert!(zones.iter().all(|z| z.name != UNNAMED_ZONE));
        assert_eq!(zones.feature_collection().features.len(), 6);
    }

    #[test]
    fn test_polygon_inside_airport_is_flagged() {
        let zones = NoFlyZones::builtin().unwrap();
        let hits = zones.intersecting(&square(34.88, 31.99, 0.01));
        assert_eq!(hits, vec!["Ben Gurion Airport".to_string()]);
    }

    #[test]
    fn test_polygon_in_open_desert_is_clear() {
        let zones = NoFlyZones::builtin().unwrap();
        assert!(zones.intersecting(&square(34.5, 30.5, 0.05)).is_empty());
    }

    #[test]
    fn test_polygon_spanning_zones_keeps_catalogue_order() {
        let zones = NoFlyZones::builtin().unwrap();
        // Covers the Negev from Ramon up to Nevatim
        let big = square(34.9, 29.6, 1.7);
        let hits = zones.intersecting(&big);
        assert_eq!(
            hits,
            vec![
                "Nevatim Air Base".to_string(),
                "Ramon Airport".to_string(),
                "Dimona Nuclear Research Center".to_string(),
            ]
        );
    }

    #[test]
    fn test_touching_boundary_counts() {
        let zones = NoFlyZones::from_geojson_str(
            r#"{"type":"FeatureCollection","features":[
                {"type":"Feature","properties":{"name":"Box"},
                 "geometry":{"type":"Polygon","coordinates":[[[0,0],[1,0],[1,1],[0,1],[0,0]]]}}
            ]}"#,
        )
        .unwrap();
        assert_eq!(zones.intersecting(&square(1.0, 0.0, 1.0)), vec!["Box".to_string()]);
    }

    #[test]
    fn test_unnamed_and_multipolygon_zones() {
        let zones = NoFlyZones::from_geojson_str(
            r#"{"type":"FeatureCollection","features":[
                {"type":"Feature","properties":null,
                 "geometry":{"type":"MultiPolygon","coordinates":[
                    [[[0,0],[1,0],[1,1],[0,1],[0,0]]],
                    [[[5,5],[6,5],[6,6],[5,6],[5,5]]]
                 ]}}
            ]}"#,
        )
        .unwrap();
        assert_eq!(zones.intersecting(&square(5.2, 5.2, 0.1)), vec![UNNAMED_ZONE.to_string()]);
        assert!(zones.intersecting(&square(2.0, 2.0, 0.5)).is_empty());
    }

    #[test]
    fn test_point_zone_is_rejected() {
        let err = NoFlyZones::from_geojson_str(
            r#"{"type":"Feature","properties":{"name":"Pin"},
                "geometry":{"type":"Point","coordinates":[35.0,31.0]}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, GeoError::NoPolygon(_)));
    }
}
