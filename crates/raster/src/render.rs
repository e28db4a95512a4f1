//! Overlay rendering.

use crate::GeoRaster;
use dronemap_geo::{Bounds, Coordinate};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// How a raster is drawn over the map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    /// Overlay opacity in `0.0..=1.0`
    pub opacity: f64,
    /// Side length of the output grid in pixels
    pub resolution: u32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            opacity: 0.7,
            resolution: 256,
        }
    }
}

/// RGBA image covering a raster's bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterOverlay {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Geographic extent the image is stretched over
    pub bounds: Bounds,
    /// Opacity the alpha channel was scaled by
    pub opacity: f64,
    /// Row-major RGBA bytes, north row first
    pub rgba: Vec<u8>,
}

impl RasterOverlay {
    /// RGBA value of one output pixel.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Some([self.rgba[i], self.rgba[i + 1], self.rgba[i + 2], self.rgba[i + 3]])
    }

    /// Number of pixels with any opacity.
    pub fn opaque_pixels(&self) -> usize {
        self.rgba.chunks_exact(4).filter(|p| p[3] > 0).count()
    }
}

/// How sample values become colours.
#[derive(Debug, Clone, Copy)]
enum Ramp {
    /// First band stretched between its minimum and maximum
    Gray { min: f64, span: f64 },
    /// First three bands as red, green and blue on a shared scale
    Rgb { min: f64, span: f64 },
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn level(v: f64, min: f64, span: f64) -> u8 {
    if span > 0.0 {
        ((v - min) / span * 255.0).round().clamp(0.0, 255.0) as u8
    } else {
        255
    }
}

impl GeoRaster {
    fn ramp(&self) -> Ramp {
        if !self.is_rgb() {
            return match self.band_stats() {
                Some(s) => Ramp::Gray { min: s.min, span: s.max - s.min },
                None => Ramp::Gray { min: 0.0, span: 0.0 },
            };
        }

        // 8-bit imagery is drawn as is; wider ranges are scaled down to it
        let (lo, hi) = self
            .samples
            .chunks_exact(self.band_count)
            .flat_map(|px| px[..3].iter().copied())
            .filter(|&v| self.is_valid(v))
            .fold((0.0f64, 255.0f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
        Ramp::Rgb { min: lo, span: hi - lo }
    }

    fn color(&self, ramp: Ramp, values: &[f64]) -> Option<[u8; 3]> {
        match ramp {
            Ramp::Gray { min, span } => {
                let v = values[0];
                self.is_valid(v).then(|| {
                    let l = level(v, min, span);
                    [l, l, l]
                })
            }
            Ramp::Rgb { min, span } => {
                if values[..3].iter().all(|&v| !self.is_valid(v)) {
                    return None;
                }
                // A fourth band is an alpha mask
                if values.get(3).is_some_and(|&a| a <= 0.0) {
                    return None;
                }
                let channel = |v: f64| if self.is_valid(v) { level(v, min, span) } else { 0 };
                Some([channel(values[0]), channel(values[1]), channel(values[2])])
            }
        }
    }

    /// Resamples the raster onto a square grid over its bounds.
    ///
    /// Single and two band rasters are stretched to a grayscale ramp between
    /// the first band's minimum and maximum. Rasters with three or more bands
    /// are drawn in true colour. Nodata is fully transparent.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn render(&self, options: &RenderOptions) -> RasterOverlay {
        let size = options.resolution.max(1);
        let opacity = options.opacity.clamp(0.0, 1.0);
        let alpha = (opacity * 255.0).round() as u8;
        let bounds = self.bounds();
        let ramp = self.ramp();

        let row_bytes = size as usize * 4;
        let mut rgba = vec![0u8; row_bytes * size as usize];

        let paint_row = |(row, out): (usize, &mut [u8])| {
            let lat = bounds.north - (row as f64 + 0.5) / f64::from(size) * (bounds.north - bounds.south);
            for col in 0..size as usize {
                let lng = bounds.west + (col as f64 + 0.5) / f64::from(size) * (bounds.east - bounds.west);
                let color = self
                    .pixel_at(Coordinate::new(lat, lng))
                    .and_then(|(c, r)| self.pixel_values(c, r))
                    .and_then(|values| self.color(ramp, values));
                if let Some([r, g, b]) = color {
                    out[col * 4..col * 4 + 4].copy_from_slice(&[r, g, b, alpha]);
                }
            }
        };

        #[cfg(feature = "parallel")]
        rgba.par_chunks_mut(row_bytes).enumerate().for_each(paint_row);

        #[cfg(not(feature = "parallel"))]
        rgba.chunks_mut(row_bytes).enumerate().for_each(paint_row);

        RasterOverlay {
            width: size,
            height: size,
            bounds,
            opacity,
            rgba,
        }
    }
}
