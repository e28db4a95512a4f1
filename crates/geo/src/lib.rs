//! Geospatial building blocks for dronemap.
//!
//! This crate provides:
//! - Geodesic polygon area and perimeter
//! - The no-fly zone catalogue and intersection checks
//! - GeoJSON loading for uploaded vector files
//! - WASM bindings for browser usage
//!
//! # Example
//!
//! ```
//! use dronemap_geo::{polygon_from_coordinates, Coordinate, NoFlyZones, PolygonInfo};
//!
//! let polygon = polygon_from_coordinates(&[
//!     Coordinate::new(31.98, 34.86),
//!     Coordinate::new(31.98, 34.90),
//!     Coordinate::new(32.02, 34.90),
//! ])
//! .unwrap();
//!
//! let zones = NoFlyZones::builtin().unwrap();
//! let info = PolygonInfo::new(&polygon, &zones);
//! assert_eq!(info.no_fly_zones, vec!["Ben Gurion Airport".to_string()]);
//! assert!(info.area_m2 > 0.0);
//! ```

mod error;
mod info;
mod measure;
mod vector;
pub mod zones;

#[cfg(feature = "wasm")]
mod wasm;

pub use error::{GeoError, GeoErrorCode, Result};
pub use info::PolygonInfo;
pub use measure::{measure_polygon, polygon_from_coordinates, Measurement, EQUATORIAL_EARTH_RADIUS_M, MEAN_EARTH_RADIUS_M};
pub use vector::{collection_bounds, first_polygon, parse_feature_collection};
pub use zones::{NoFlyZone, NoFlyZones};

pub use geo::{MultiPolygon, Polygon};
pub use geojson::FeatureCollection;

/// A geographic coordinate with latitude and longitude.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees (-90 to 90)
    pub latitude: f64,
    /// Longitude in degrees (-180 to 180)
    pub longitude: f64,
}

impl Coordinate {
    /// Creates a new coordinate.
    #[inline]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Returns true if the coordinate has valid values.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self::new(lat, lng)
    }
}

impl From<Coordinate> for geo::Coord<f64> {
    fn from(c: Coordinate) -> Self {
        geo::coord! { x: c.longitude, y: c.latitude }
    }
}

impl From<geo::Coord<f64>> for Coordinate {
    fn from(c: geo::Coord<f64>) -> Self {
        Self::new(c.y, c.x)
    }
}

/// A latitude/longitude bounding box.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Bounds {
    /// Southern edge (minimum latitude)
    pub south: f64,
    /// Western edge (minimum longitude)
    pub west: f64,
    /// Northern edge (maximum latitude)
    pub north: f64,
    /// Eastern edge (maximum longitude)
    pub east: f64,
}

impl Bounds {
    /// Bounds spanning two corners, in any order.
    pub fn from_corners(a: Coordinate, b: Coordinate) -> Self {
        Self {
            south: a.latitude.min(b.latitude),
            west: a.longitude.min(b.longitude),
            north: a.latitude.max(b.latitude),
            east: a.longitude.max(b.longitude),
        }
    }

    /// Smallest bounds containing both.
    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            south: self.south.min(other.south),
            west: self.west.min(other.west),
            north: self.north.max(other.north),
            east: self.east.max(other.east),
        }
    }

    /// Grow the bounds to include a coordinate.
    pub fn extend(&mut self, c: Coordinate) {
        self.south = self.south.min(c.latitude);
        self.west = self.west.min(c.longitude);
        self.north = self.north.max(c.latitude);
        self.east = self.east.max(c.longitude);
    }

    /// Centre of the box.
    pub fn center(&self) -> Coordinate {
        Coordinate::new((self.south + self.north) / 2.0, (self.west + self.east) / 2.0)
    }

    /// South-west corner.
    pub fn south_west(&self) -> Coordinate {
        Coordinate::new(self.south, self.west)
    }

    /// North-east corner.
    pub fn north_east(&self) -> Coordinate {
        Coordinate::new(self.north, self.east)
    }

    /// Whether the coordinate lies inside or on the edge.
    pub fn contains(&self, c: Coordinate) -> bool {
        (self.south..=self.north).contains(&c.latitude) && (self.west..=self.east).contains(&c.longitude)
    }

    /// A box of zero width or height.
    pub fn is_empty(&self) -> bool {
        self.north <= self.south || self.east <= self.west
    }
}

impl From<geo::Rect<f64>> for Bounds {
    fn from(rect: geo::Rect<f64>) -> Self {
        Bounds {
            south: rect.min().y,
            west: rect.min().x,
            north: rect.max().y,
            east: rect.max().x,
        }
    }
}
