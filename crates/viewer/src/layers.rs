//! Overlay layers drawn on top of the base tiles.

use dronemap_geo::{Bounds, Coordinate, FeatureCollection};
use dronemap_raster::{BandStats, RasterOverlay};
use serde::Serialize;

/// Stroke and fill of a vector layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathStyle {
    /// CSS colour
    pub color: String,
    /// Stroke width in pixels
    pub weight: u32,
    /// Fill opacity in `0.0..=1.0`
    pub fill_opacity: f64,
}

impl PathStyle {
    /// Red outline with a light fill, used for no-fly zones.
    pub fn no_fly() -> Self {
        Self {
            color: "red".to_string(),
            weight: 2,
            fill_opacity: 0.2,
        }
    }
}

/// A GeoJSON layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VectorLayer {
    /// Features as parsed
    pub collection: FeatureCollection,
    /// Extent, `None` when no feature has coordinates
    pub bounds: Option<Bounds>,
    /// Style, `None` for the host's default
    pub style: Option<PathStyle>,
}

impl VectorLayer {
    /// Number of features.
    pub fn feature_count(&self) -> usize {
        self.collection.features.len()
    }
}

/// A rendered GeoTIFF layer.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterLayer {
    /// Uploaded file name
    pub file_name: String,
    /// Source size in pixels
    pub source_size: (u32, u32),
    /// First-band statistics of the source
    pub stats: Option<BandStats>,
    /// Rendered image and its placement
    pub overlay: RasterOverlay,
}

impl RasterLayer {
    /// Where the overlay is stretched.
    pub fn bounds(&self) -> Bounds {
        self.overlay.bounds
    }
}

/// Pin dropped on a search result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchMarker {
    /// Location
    pub position: Coordinate,
    /// Popup text, the geocoder's display name
    pub popup: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_fly_style() {
        let style = PathStyle::no_fly();
        assert_eq!(style.color, "red");
        assert_eq!(style.weight, 2);
        assert!((style.fill_opacity - 0.2).abs() < f64::EPSILON);
    }

    #[test]
    fn test_vector_layer_counts_features() {
        let collection = dronemap_geo::parse_feature_collection(
            r#"{"type":"Point","coordinates":[35.0,31.0]}"#,
        )
        .unwrap();
        let layer = VectorLayer {
            bounds: dronemap_geo::collection_bounds(&collection).unwrap(),
            collection,
            style: None,
        };
        assert_eq!(layer.feature_count(), 1);
        assert!(layer.bounds.is_some());
    }
}
