//! Geodesic polygon measurement.
//!
//! Area uses the Chamberlain–Duquette spherical approximation on the WGS84
//! equatorial radius; perimeter sums the haversine length of every ring on
//! the mean Earth radius. Holes are subtracted from the area and added to the
//! perimeter.

use crate::{Coordinate, GeoError, Result};
use geo::{ChamberlainDuquetteArea, HaversineLength, LineString, Polygon};

/// WGS84 equatorial radius in meters, used for area.
pub const EQUATORIAL_EARTH_RADIUS_M: f64 = 6_378_137.0;

/// Mean Earth radius in meters, used for lengths.
pub const MEAN_EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Area and perimeter of a polygon.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Measurement {
    /// Area in square meters
    pub area_m2: f64,
    /// Perimeter in meters
    pub perimeter_m: f64,
}

/// Measures a polygon on the sphere.
///
/// # Example
/// ```
/// use dronemap_geo::{measure_polygon, polygon_from_coordinates, Coordinate};
///
/// let square = polygon_from_coordinates(&[
///     Coordinate::new(0.0, 0.0),
///     Coordinate::new(0.0, 1.0),
///     Coordinate::new(1.0, 1.0),
///     Coordinate::new(1.0, 0.0),
/// ])
/// .unwrap();
///
/// let m = measure_polygon(&square);
/// assert!((m.area_m2 / 1e6 - 12_391.4).abs() < 50.0);
/// ```
pub fn measure_polygon(polygon: &Polygon<f64>) -> Measurement {
    let holes: f64 = polygon.interiors().iter().map(ring_area).sum();
    let area_m2 = (ring_area(polygon.exterior()) - holes).max(0.0);

    let perimeter_m = std::iter::once(polygon.exterior())
        .chain(polygon.interiors())
        .map(HaversineLength::haversine_length)
        .sum();

    Measurement { area_m2, perimeter_m }
}

/// Unsigned area of a single ring, independent of its winding.
#[inline]
fn ring_area(ring: &LineString<f64>) -> f64 {
    Polygon::new(ring.clone(), vec![]).chamberlain_duquette_unsigned_area()
}

/// Builds a polygon from drawn vertices.
///
/// The ring is closed automatically; a repeated closing vertex is accepted.
/// At least three distinct valid coordinates are required.
pub fn polygon_from_coordinates(vertices: &[Coordinate]) -> Result<Polygon<f64>> {
    if let Some(bad) = vertices.iter().find(|c| !c.is_valid()) {
        return Err(GeoError::InvalidCoordinate(format!(
            "({}, {}) is outside the valid latitude/longitude range",
            bad.latitude, bad.longitude
        )));
    }

    let mut distinct: Vec<Coordinate> = Vec::with_capacity(vertices.len());
    for v in vertices {
        if !distinct.contains(v) {
            distinct.push(*v);
        }
    }
    if distinct.len() < 3 {
        return Err(GeoError::NoPolygon(format!(
            "a polygon needs at least 3 distinct vertices, got {}",
            distinct.len()
        )));
    }

    let ring: LineString<f64> = vertices.iter().map(|&c| geo::Coord::from(c)).collect();
    Ok(Polygon::new(ring, vec![]))
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn small_box() -> impl Strategy<Value = (f64, f64, f64, f64)> {
        (-60.0f64..60.0, -170.0f64..170.0, 0.001f64..2.0, 0.001f64..2.0)
    }

    proptest! {
        #[test]
        fn area_and_perimeter_are_positive((lat, lng, dlat, dlng) in small_box()) {
            let p = polygon_from_coordinates(&[
                Coordinate::new(lat, lng),
                Coordinate::new(lat, lng + dlng),
                Coordinate::new(lat + dlat, lng + dlng),
                Coordinate::new(lat + dlat, lng),
            ]).unwrap();
            let m = measure_polygon(&p);
            prop_assert!(m.area_m2 > 0.0);
            prop_assert!(m.perimeter_m > 0.0);
        }

        #[test]
        fn isoperimetric_bound_holds((lat, lng, dlat, dlng) in small_box()) {
            let p = polygon_from_coordinates(&[
                Coordinate::new(lat, lng),
                Coordinate::new(lat, lng + dlng),
                Coordinate::new(lat + dlat, lng + dlng),
                Coordinate::new(lat + dlat, lng),
            ]).unwrap();
            let m = measure_polygon(&p);
            // No planar-ish region encloses more than a circle of equal perimeter
            let circle = m.perimeter_m * m.perimeter_m / (4.0 * std::f64::consts::PI);
            prop_assert!(m.area_m2 <= circle * 1.01);
        }
    }
}
