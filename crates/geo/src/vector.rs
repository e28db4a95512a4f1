//! GeoJSON vector loading.

use crate::{Bounds, GeoError, Result};
use geo::{BoundingRect, Polygon};
use geojson::{Feature, FeatureCollection, GeoJson};

/// Parses GeoJSON text into a FeatureCollection.
///
/// A bare Geometry or a single Feature is wrapped into a one-element
/// collection so callers only deal with one shape.
pub fn parse_feature_collection(text: &str) -> Result<FeatureCollection> {
    let parsed: GeoJson = text.parse()?;
    Ok(match parsed {
        GeoJson::FeatureCollection(fc) => fc,
        GeoJson::Feature(feature) => single(feature),
        GeoJson::Geometry(geometry) => single(Feature {
            bbox: None,
            geometry: Some(geometry),
            id: None,
            properties: None,
            foreign_members: None,
        }),
    })
}

fn single(feature: Feature) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features: vec![feature],
        foreign_members: None,
    }
}

/// Bounding box of every geometry in the collection.
///
/// Returns `None` when the collection has no geometry with coordinates.
pub fn collection_bounds(collection: &FeatureCollection) -> Result<Option<Bounds>> {
    let mut bounds: Option<Bounds> = None;
    for feature in &collection.features {
        let Some(geometry) = feature.geometry.clone() else {
            continue;
        };
        let geometry = geo::Geometry::<f64>::try_from(geometry)?;
        if let Some(rect) = geometry.bounding_rect() {
            let rect = Bounds::from(rect);
            bounds = Some(bounds.map_or(rect, |b| b.union(&rect)));
        }
    }
    Ok(bounds)
}

/// First Polygon in the collection, taking the first member of a MultiPolygon.
pub fn first_polygon(collection: &FeatureCollection) -> Result<Polygon<f64>> {
    for feature in &collection.features {
        let Some(geometry) = feature.geometry.clone() else {
            continue;
        };
        match geo::Geometry::<f64>::try_from(geometry)? {
            geo::Geometry::Polygon(p) => return Ok(p),
            geo::Geometry::MultiPolygon(mp) => {
                if let Some(p) = mp.0.into_iter().next() {
                    return Ok(p);
                }
            }
            _ => {}
        }
    }
    Err(GeoError::NoPolygon("the file contains no Polygon or MultiPolygon feature".to_string()))
}
