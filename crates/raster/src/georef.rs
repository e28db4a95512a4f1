//! GeoTIFF georeferencing: affine transform and model CRS.

use crate::{RasterError, Result};
use dronemap_geo::EQUATORIAL_EARTH_RADIUS_M;
use std::io::{Read, Seek};
use tiff::decoder::Decoder;
use tiff::tags::Tag;

const MODEL_PIXEL_SCALE: u16 = 33550;
const MODEL_TIEPOINT: u16 = 33922;
const MODEL_TRANSFORMATION: u16 = 34264;
const GEO_KEY_DIRECTORY: u16 = 34735;
const GDAL_NODATA: u16 = 42113;

const GT_MODEL_TYPE_KEY: u32 = 1024;
const PROJECTED_CS_TYPE_KEY: u32 = 3072;

const MODEL_TYPE_PROJECTED: u32 = 1;
const MODEL_TYPE_GEOGRAPHIC: u32 = 2;

/// EPSG codes that name spherical web mercator.
const WEB_MERCATOR_CODES: [u32; 3] = [3857, 3785, 900_913];

/// Affine transform from pixel (col, row) to model (x, y).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoTransform {
    /// X of the upper-left corner of the upper-left pixel
    pub origin_x: f64,
    /// Y of the upper-left corner of the upper-left pixel
    pub origin_y: f64,
    /// Pixel width in model units
    pub pixel_width: f64,
    /// Pixel height in model units (negative for north-up)
    pub pixel_height: f64,
    /// Row contribution to X
    pub rotation_x: f64,
    /// Column contribution to Y
    pub rotation_y: f64,
}

impl GeoTransform {
    /// Pixel to model coordinates.
    pub fn pixel_to_model(&self, col: f64, row: f64) -> (f64, f64) {
        let x = self.origin_x + col * self.pixel_width + row * self.rotation_x;
        let y = self.origin_y + col * self.rotation_y + row * self.pixel_height;
        (x, y)
    }

    /// Model to pixel coordinates; `None` for a degenerate transform.
    pub fn model_to_pixel(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        let det = self.pixel_width * self.pixel_height - self.rotation_x * self.rotation_y;
        if det.abs() < 1e-15 {
            return None;
        }
        let dx = x - self.origin_x;
        let dy = y - self.origin_y;
        let col = (self.pixel_height * dx - self.rotation_x * dy) / det;
        let row = (self.pixel_width * dy - self.rotation_y * dx) / det;
        Some((col, row))
    }
}

/// Model coordinate system of a raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelCrs {
    /// Longitude/latitude degrees
    Geographic,
    /// Spherical web mercator metres
    WebMercator,
}

impl ModelCrs {
    /// Model (x, y) to (latitude, longitude).
    pub fn to_lat_lng(self, x: f64, y: f64) -> (f64, f64) {
        match self {
            ModelCrs::Geographic => (y, x),
            ModelCrs::WebMercator => {
                let lng = (x / EQUATORIAL_EARTH_RADIUS_M).to_degrees();
                let lat = (2.0 * (y / EQUATORIAL_EARTH_RADIUS_M).exp().atan() - std::f64::consts::FRAC_PI_2)
                    .to_degrees();
                (lat, lng)
            }
        }
    }

    /// (latitude, longitude) to model (x, y).
    pub fn from_lat_lng(self, lat: f64, lng: f64) -> (f64, f64) {
        match self {
            ModelCrs::Geographic => (lng, lat),
            ModelCrs::WebMercator => {
                let x = EQUATORIAL_EARTH_RADIUS_M * lng.to_radians();
                let y = EQUATORIAL_EARTH_RADIUS_M
                    * (std::f64::consts::FRAC_PI_4 + lat.to_radians() / 2.0).tan().ln();
                (x, y)
            }
        }
    }
}

/// Georeferencing read from a TIFF directory.
#[derive(Debug, Clone, PartialEq)]
pub struct Georeference {
    /// Pixel to model transform
    pub transform: GeoTransform,
    /// Model coordinate system
    pub crs: ModelCrs,
    /// Sample value meaning "no data"
    pub nodata: Option<f64>,
}

fn optional_f64s<R: Read + Seek>(decoder: &mut Decoder<R>, code: u16) -> Result<Option<Vec<f64>>> {
    match decoder.find_tag(Tag::from_u16_exhaustive(code))? {
        Some(value) => Ok(Some(value.into_f64_vec()?)),
        None => Ok(None),
    }
}

/// Reads the georeferencing tags of the current image.
pub fn read_georeference<R: Read + Seek>(decoder: &mut Decoder<R>) -> Result<Georeference> {
    let transform = read_transform(decoder)?;
    let crs = read_crs(decoder)?;

    let nodata = match decoder.find_tag(Tag::from_u16_exhaustive(GDAL_NODATA))? {
        Some(value) => value.into_string()?.trim_matches(char::from(0)).trim().parse::<f64>().ok(),
        None => None,
    };

    Ok(Georeference { transform, crs, nodata })
}

fn read_transform<R: Read + Seek>(decoder: &mut Decoder<R>) -> Result<GeoTransform> {
    if let Some(m) = optional_f64s(decoder, MODEL_TRANSFORMATION)? {
        if m.len() < 8 {
            return Err(RasterError::MissingGeoreference(format!(
                "ModelTransformation has {} values, expected 16",
                m.len()
            )));
        }
        return Ok(GeoTransform {
            origin_x: m[3],
            origin_y: m[7],
            pixel_width: m[0],
            pixel_height: m[5],
            rotation_x: m[1],
            rotation_y: m[4],
        });
    }

    let scale = optional_f64s(decoder, MODEL_PIXEL_SCALE)?;
    let tiepoint = optional_f64s(decoder, MODEL_TIEPOINT)?;
    match (scale, tiepoint) {
        (Some(scale), Some(tie)) if scale.len() >= 2 && tie.len() >= 6 => {
            let (i, j, x, y) = (tie[0], tie[1], tie[3], tie[4]);
            let (sx, sy) = (scale[0], scale[1]);
            Ok(GeoTransform {
                origin_x: x - i * sx,
                origin_y: y + j * sy,
                pixel_width: sx,
                pixel_height: -sy,
                rotation_x: 0.0,
                rotation_y: 0.0,
            })
        }
        _ => Err(RasterError::MissingGeoreference(
            "no ModelPixelScale/ModelTiepoint pair or ModelTransformation tag".to_string(),
        )),
    }
}

/// Looks up a key in a GeoKeyDirectory laid out as a header of four shorts
/// followed by `(key, location, count, value)` entries. Only inline values
/// (location 0) are returned.
fn geo_key(directory: &[u32], key: u32) -> Option<u32> {
    directory
        .get(4..)?
        .chunks_exact(4)
        .find(|entry| entry[0] == key && entry[1] == 0)
        .map(|entry| entry[3])
}

fn read_crs<R: Read + Seek>(decoder: &mut Decoder<R>) -> Result<ModelCrs> {
    let Some(value) = decoder.find_tag(Tag::from_u16_exhaustive(GEO_KEY_DIRECTORY))? else {
        // Plain TIFF with coordinates; assume lat/lng and let the bounds check catch mistakes
        return Ok(ModelCrs::Geographic);
    };
    let directory = value.into_u32_vec()?;

    match geo_key(&directory, GT_MODEL_TYPE_KEY) {
        Some(MODEL_TYPE_PROJECTED) => match geo_key(&directory, PROJECTED_CS_TYPE_KEY) {
            Some(code) if WEB_MERCATOR_CODES.contains(&code) => Ok(ModelCrs::WebMercator),
            Some(code) => Err(RasterError::UnsupportedCrs(format!(
                "projected EPSG:{code}; only geographic and web mercator rasters can be shown"
            ))),
            None => Err(RasterError::UnsupportedCrs(
                "projected raster without a ProjectedCSTypeGeoKey".to_string(),
            )),
        },
        Some(MODEL_TYPE_GEOGRAPHIC) | None => Ok(ModelCrs::Geographic),
        Some(other) => Err(RasterError::UnsupportedCrs(format!("GTModelTypeGeoKey {other}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_roundtrip() {
        let t = GeoTransform {
            origin_x: 35.0,
            origin_y: 32.0,
            pixel_width: 0.01,
            pixel_height: -0.01,
            rotation_x: 0.0,
            rotation_y: 0.0,
        };
        let (x, y) = t.pixel_to_model(10.0, 20.0);
        assert!((x - 35.1).abs() < 1e-12);
        assert!((y - 31.8).abs() < 1e-12);

        let (col, row) = t.model_to_pixel(x, y).unwrap();
        assert!((col - 10.0).abs() < 1e-9);
        assert!((row - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_transform() {
        let t = GeoTransform {
            origin_x: 0.0,
            origin_y: 0.0,
            pixel_width: 0.0,
            pixel_height: 0.0,
            rotation_x: 0.0,
            rotation_y: 0.0,
        };
        assert!(t.model_to_pixel(1.0, 1.0).is_none());
    }

    #[test]
    fn test_web_mercator_known_points() {
        let (x, y) = ModelCrs::WebMercator.from_lat_lng(0.0, 180.0);
        assert!((x - 20_037_508.342_789_244).abs() < 1e-6);
        assert!(y.abs() < 1e-6);

        let (lat, lng) = ModelCrs::WebMercator.to_lat_lng(3_897_559.0, 3_919_806.0);
        let (x2, y2) = ModelCrs::WebMercator.from_lat_lng(lat, lng);
        assert!((x2 - 3_897_559.0).abs() < 1e-3);
        assert!((y2 - 3_919_806.0).abs() < 1e-3);
    }

    #[test]
    fn test_geo_key_lookup() {
        let dir = [1, 1, 0, 2, 1024, 0, 1, 1, 3072, 0, 1, 3857];
        assert_eq!(geo_key(&dir, GT_MODEL_TYPE_KEY), Some(1));
        assert_eq!(geo_key(&dir, PROJECTED_CS_TYPE_KEY), Some(3857));
        assert_eq!(geo_key(&dir, 2048), None);
        assert_eq!(geo_key(&[1, 1], 1024), None);
    }
}
