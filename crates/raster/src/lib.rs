//! GeoTIFF overlays for dronemap.
//!
//! This crate provides:
//! - GeoTIFF decoding with georeferencing (tiepoint/scale or matrix)
//! - Geographic and web mercator rasters
//! - Band statistics
//! - RGBA overlay rendering at a fixed grid resolution, grayscale or true colour

#![warn(missing_docs)]

mod error;
mod georef;
mod render;

pub use error::{RasterError, RasterErrorCode, Result};
pub use georef::{GeoTransform, Georeference, ModelCrs};
pub use render::{RasterOverlay, RenderOptions};

use dronemap_geo::{Bounds, Coordinate};
use std::io::Cursor;
use tiff::decoder::{Decoder, DecodingResult};

/// Summary of the first band's valid samples.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct BandStats {
    /// Smallest value
    pub min: f64,
    /// Largest value
    pub max: f64,
    /// Arithmetic mean
    pub mean: f64,
    /// Samples that are neither nodata nor NaN
    pub valid_count: usize,
}

/// A decoded, georeferenced raster.
#[derive(Debug, Clone)]
pub struct GeoRaster {
    width: u32,
    height: u32,
    band_count: usize,
    /// Pixel-interleaved samples, `band_count` per pixel
    samples: Vec<f64>,
    georef: Georeference,
    bounds: Bounds,
}

impl GeoRaster {
    /// Decodes the first image of a GeoTIFF, keeping every band.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut decoder = Decoder::new(Cursor::new(bytes))?;
        let (width, height) = decoder.dimensions()?;
        let pixels = width as usize * height as usize;
        if pixels == 0 {
            return Err(RasterError::Empty);
        }

        let georef = georef::read_georeference(&mut decoder)?;
        let samples = samples_to_f64(decoder.read_image()?);

        if samples.len() % pixels != 0 || samples.is_empty() {
            return Err(RasterError::UnsupportedSampleFormat(format!(
                "{} samples do not divide into {width}x{height} pixels",
                samples.len()
            )));
        }
        let band_count = samples.len() / pixels;

        let bounds = compute_bounds(&georef, width, height)?;

        Ok(Self {
            width,
            height,
            band_count,
            samples,
            georef,
            bounds,
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Samples per pixel in the source file.
    pub fn band_count(&self) -> usize {
        self.band_count
    }

    /// Whether the overlay is drawn in true colour from the first three bands.
    pub fn is_rgb(&self) -> bool {
        self.band_count >= 3
    }

    /// Geographic extent.
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Georeferencing read from the file.
    pub fn georeference(&self) -> &Georeference {
        &self.georef
    }

    /// Whether a sample carries data.
    pub(crate) fn is_valid(&self, v: f64) -> bool {
        !v.is_nan() && self.georef.nodata.is_none_or(|nd| (v - nd).abs() > f64::EPSILON * nd.abs().max(1.0))
    }

    /// Every band's raw value at a pixel, nodata included.
    pub fn pixel_values(&self, col: u32, row: u32) -> Option<&[f64]> {
        if col >= self.width || row >= self.height {
            return None;
        }
        let start = (row as usize * self.width as usize + col as usize) * self.band_count;
        Some(&self.samples[start..start + self.band_count])
    }

    /// First band value at a pixel.
    pub fn sample(&self, col: u32, row: u32) -> Option<f64> {
        let v = self.pixel_values(col, row)?[0];
        self.is_valid(v).then_some(v)
    }

    /// Pixel containing a geographic coordinate.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub(crate) fn pixel_at(&self, coord: Coordinate) -> Option<(u32, u32)> {
        let (x, y) = self.georef.crs.from_lat_lng(coord.latitude, coord.longitude);
        let (col, row) = self.georef.transform.model_to_pixel(x, y)?;
        if col < 0.0 || row < 0.0 || col >= f64::from(self.width) || row >= f64::from(self.height) {
            return None;
        }
        Some((col.floor() as u32, row.floor() as u32))
    }

    /// First band value at a geographic coordinate, nearest neighbour.
    pub fn sample_at(&self, coord: Coordinate) -> Option<f64> {
        let (col, row) = self.pixel_at(coord)?;
        self.sample(col, row)
    }

    /// Statistics over valid samples, `None` when every sample is nodata.
    #[allow(clippy::cast_precision_loss)]
    pub fn band_stats(&self) -> Option<BandStats> {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        let mut valid_count = 0usize;

        for &v in self.samples.iter().step_by(self.band_count).filter(|&&v| self.is_valid(v)) {
            min = min.min(v);
            max = max.max(v);
            sum += v;
            valid_count += 1;
        }

        (valid_count > 0).then(|| BandStats {
            min,
            max,
            mean: sum / valid_count as f64,
            valid_count,
        })
    }
}

#[allow(clippy::cast_precision_loss, clippy::cast_lossless)]
fn samples_to_f64(data: DecodingResult) -> Vec<f64> {
    match data {
        DecodingResult::U8(v) => v.into_iter().map(f64::from).collect(),
        DecodingResult::U16(v) => v.into_iter().map(f64::from).collect(),
        DecodingResult::U32(v) => v.into_iter().map(f64::from).collect(),
        DecodingResult::U64(v) => v.into_iter().map(|x| x as f64).collect(),
        DecodingResult::I8(v) => v.into_iter().map(f64::from).collect(),
        DecodingResult::I16(v) => v.into_iter().map(f64::from).collect(),
        DecodingResult::I32(v) => v.into_iter().map(f64::from).collect(),
        DecodingResult::I64(v) => v.into_iter().map(|x| x as f64).collect(),
        DecodingResult::F32(v) => v.into_iter().map(f64::from).collect(),
        DecodingResult::F64(v) => v,
    }
}

fn compute_bounds(georef: &Georeference, width: u32, height: u32) -> Result<Bounds> {
    let (w, h) = (f64::from(width), f64::from(height));
    let corners = [(0.0, 0.0), (w, 0.0), (0.0, h), (w, h)].map(|(col, row)| {
        let (x, y) = georef.transform.pixel_to_model(col, row);
        let (lat, lng) = georef.crs.to_lat_lng(x, y);
        Coordinate::new(lat, lng)
    });

    if let Some(bad) = corners.iter().find(|c| !c.is_valid()) {
        return Err(RasterError::UnsupportedCrs(format!(
            "corner ({}, {}) is not a latitude/longitude; the raster is probably projected",
            bad.latitude, bad.longitude
        )));
    }

    let mut bounds = Bounds::from_corners(corners[0], corners[3]);
    bounds.extend(corners[1]);
    bounds.extend(corners[2]);
    Ok(bounds)
}


#[cfg(test)]
mod tests {
    use super::testutil::{geotiff, rgb_geotiff, Fixture};
    use super::*;

    #[test]
    fn test_geographic_raster_bounds() {
        let raster = GeoRaster::from_bytes(&geotiff(&Fixture::default())).unwrap();
        assert_eq!((raster.width(), raster.height()), (4, 2));
        assert_eq!(raster.band_count(), 1);
        assert_eq!(raster.georeference().crs, ModelCrs::Geographic);

        let b = raster.bounds();
        assert!((b.west - 35.0).abs() < 1e-12);
        assert!((b.east - 36.0).abs() < 1e-12);
        assert!((b.north - 32.0).abs() < 1e-12);
        assert!((b.south - 31.5).abs() < 1e-12);
    }

    #[test]
    fn test_band_stats() {
        let raster = GeoRaster::from_bytes(&geotiff(&Fixture::default())).unwrap();
        let stats = raster.band_stats().unwrap();
        assert_eq!(stats.min, 0.0);
        assert_eq!(stats.max, 255.0);
        assert_eq!(stats.valid_count, 8);
        assert!((stats.mean - 1015.0 / 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_nodata_is_excluded() {
        let bytes = geotiff(&Fixture {
            nodata: Some("0"),
            ..Fixture::default()
        });
        let raster = GeoRaster::from_bytes(&bytes).unwrap();
        assert_eq!(raster.georeference().nodata, Some(0.0));
        assert_eq!(raster.sample(0, 0), None);
        assert_eq!(raster.sample(1, 0), Some(50.0));
        let stats = raster.band_stats().unwrap();
        assert_eq!(stats.valid_count, 7);
        assert_eq!(stats.min, 10.0);
    }

    #[test]
    fn test_sample_at_coordinate() {
        let raster = GeoRaster::from_bytes(&geotiff(&Fixture::default())).unwrap();
        // Second row, third column
        assert_eq!(raster.sample_at(Coordinate::new(31.6, 35.6)), Some(255.0));
        assert_eq!(raster.sample_at(Coordinate::new(33.0, 35.6)), None);
    }

    #[test]
    fn test_rgb_raster_keeps_every_band() {
        let bytes = rgb_geotiff(&Fixture {
            width: 2,
            height: 1,
            data: &[255, 0, 0, 0, 0, 255],
            scale: Some([0.5, 0.5, 0.0]),
            ..Fixture::default()
        });
        let raster = GeoRaster::from_bytes(&bytes).unwrap();
        assert_eq!(raster.band_count(), 3);
        assert!(raster.is_rgb());
        assert_eq!(raster.pixel_values(0, 0), Some(&[255.0, 0.0, 0.0][..]));
        assert_eq!(raster.pixel_values(1, 0), Some(&[0.0, 0.0, 255.0][..]));
        assert_eq!(raster.pixel_values(2, 0), None);
        // Statistics and sampling read the first band
        assert_eq!(raster.sample(1, 0), Some(0.0));
        assert_eq!(raster.band_stats().unwrap().valid_count, 2);
    }

    #[test]
    fn test_missing_georeference() {
        let bytes = geotiff(&Fixture {
            scale: None,
            tiepoint: None,
            ..Fixture::default()
        });
        assert!(matches!(
            GeoRaster::from_bytes(&bytes).unwrap_err(),
            RasterError::MissingGeoreference(_)
        ));
    }

    #[test]
    fn test_web_mercator_raster() {
        // Roughly Tel Aviv, 1 km pixels
        let bytes = geotiff(&Fixture {
            scale: Some([1000.0, 1000.0, 0.0]),
            tiepoint: Some([0.0, 0.0, 0.0, 3_860_000.0, 3_760_000.0, 0.0]),
            geokeys: Some(&[1, 1, 0, 2, 1024, 0, 1, 1, 3072, 0, 1, 3857]),
            ..Fixture::default()
        });
        let raster = GeoRaster::from_bytes(&bytes).unwrap();
        assert_eq!(raster.georeference().crs, ModelCrs::WebMercator);
        let b = raster.bounds();
        assert!((b.west - 34.674).abs() < 0.01, "west {}", b.west);
        assert!(b.north > 31.9 && b.north < 32.1, "north {}", b.north);
        assert!(b.east > b.west && b.north > b.south);
    }

    #[test]
    fn test_other_projection_is_unsupported() {
        let bytes = geotiff(&Fixture {
            scale: Some([30.0, 30.0, 0.0]),
            tiepoint: Some([0.0, 0.0, 0.0, 500_000.0, 3_500_000.0, 0.0]),
            geokeys: Some(&[1, 1, 0, 2, 1024, 0, 1, 1, 3072, 0, 1, 32636]),
            ..Fixture::default()
        });
        let err = GeoRaster::from_bytes(&bytes).unwrap_err();
        assert!(matches!(err, RasterError::UnsupportedCrs(_)));
        assert_eq!(err.code(), RasterErrorCode::UnsupportedCrs);
    }

    #[test]
    fn test_projected_coordinates_without_geokeys_are_rejected() {
        let bytes = geotiff(&Fixture {
            scale: Some([30.0, 30.0, 0.0]),
            tiepoint: Some([0.0, 0.0, 0.0, 500_000.0, 3_500_000.0, 0.0]),
            geokeys: None,
            ..Fixture::default()
        });
        assert!(matches!(
            GeoRaster::from_bytes(&bytes).unwrap_err(),
            RasterError::UnsupportedCrs(_)
        ));
    }

    #[test]
    fn test_garbage_is_decode_error() {
        assert!(matches!(
            GeoRaster::from_bytes(b"definitely not a tiff").unwrap_err(),
            RasterError::Decode(_)
        ));
    }
}
