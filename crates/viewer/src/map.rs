//! Map view, slippy-map tiles and web mercator arithmetic.

use dronemap_core::config::MAX_TILE_ZOOM;
use dronemap_geo::{Bounds, Coordinate};
use serde::Serialize;

/// Tile edge in pixels.
pub const TILE_SIZE: f64 = 256.0;

/// Latitude limit of the web mercator square.
pub const MAX_MERCATOR_LATITUDE: f64 = 85.051_128_779_806_59;

/// Where the map is looking.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MapView {
    /// Centre of the viewport
    pub center: Coordinate,
    /// Integer zoom level
    pub zoom: u8,
}

/// A slippy-map tile address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Tile {
    /// Column
    pub x: u32,
    /// Row, counted from the north
    pub y: u32,
    /// Zoom level
    pub z: u8,
}

/// World pixel coordinates of a point at a zoom level.
pub fn project(coord: Coordinate, zoom: f64) -> (f64, f64) {
    let scale = TILE_SIZE * 2f64.powf(zoom);
    let lat = coord.latitude.clamp(-MAX_MERCATOR_LATITUDE, MAX_MERCATOR_LATITUDE).to_radians();
    let x = (coord.longitude + 180.0) / 360.0 * scale;
    let y = (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / std::f64::consts::PI) / 2.0 * scale;
    (x, y)
}

/// Inverse of [`project`].
pub fn unproject(x: f64, y: f64, zoom: f64) -> Coordinate {
    let scale = TILE_SIZE * 2f64.powf(zoom);
    let lng = x / scale * 360.0 - 180.0;
    let n = std::f64::consts::PI * (1.0 - 2.0 * y / scale);
    let lat = n.sinh().atan().to_degrees();
    Coordinate::new(lat, lng)
}

/// Tiles along one side of the world at a zoom level.
fn tiles_per_side(zoom: u8) -> u32 {
    1u32.checked_shl(u32::from(zoom)).unwrap_or(u32::MAX)
}

/// Tile containing a coordinate.
///
/// Zoom levels beyond [`MAX_TILE_ZOOM`] are clamped to it.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn tile_at(coord: Coordinate, zoom: u8) -> Tile {
    let zoom = zoom.min(MAX_TILE_ZOOM);
    let (x, y) = project(coord, f64::from(zoom));
    let max = tiles_per_side(zoom) - 1;
    Tile {
        x: ((x / TILE_SIZE).floor().max(0.0) as u32).min(max),
        y: ((y / TILE_SIZE).floor().max(0.0) as u32).min(max),
        z: zoom,
    }
}

/// Largest integer zoom, at most `max_zoom`, at which `bounds` fit a viewport,
/// and the view centred on them.
///
/// Degenerate bounds (a single point) zoom in to `max_zoom`; an empty
/// viewport shows nothing at any zoom and stays at zoom 0.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn fit_bounds(bounds: &Bounds, viewport: [u32; 2], max_zoom: u8) -> MapView {
    let max_zoom = max_zoom.min(MAX_TILE_ZOOM);
    let (x0, y0) = project(bounds.south_west(), 0.0);
    let (x1, y1) = project(bounds.north_east(), 0.0);
    let width = (x1 - x0).abs();
    let height = (y0 - y1).abs();

    let scale_x = if width > 0.0 { f64::from(viewport[0]) / width } else { f64::INFINITY };
    let scale_y = if height > 0.0 { f64::from(viewport[1]) / height } else { f64::INFINITY };
    let scale = scale_x.min(scale_y);

    let zoom = if scale.is_infinite() {
        max_zoom
    } else if scale > 0.0 {
        scale.log2().floor().clamp(0.0, f64::from(max_zoom)) as u8
    } else {
        0
    };

    let center = unproject((x0 + x1) / 2.0, (y0 + y1) / 2.0, 0.0);
    MapView { center, zoom }
}

/// A tile server described by a URL template.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TileSource {
    /// Template with `{s}`, `{x}`, `{y}` and `{z}` placeholders
    pub url_template: String,
    /// Values for `{s}`
    pub subdomains: Vec<String>,
    /// Deepest zoom served
    pub max_zoom: u8,
}

impl TileSource {
    /// URL of one tile; the subdomain is chosen by `(x + y) mod n`.
    pub fn url_for(&self, tile: Tile) -> String {
        let mut url = self.url_template.clone();
        if !self.subdomains.is_empty() {
            let index = (tile.x as usize + tile.y as usize) % self.subdomains.len();
            let subdomain = &self.subdomains[index];
            url = url.replace("{s}", subdomain);
        }
        url.replace("{x}", &tile.x.to_string())
            .replace("{y}", &tile.y.to_string())
            .replace("{z}", &tile.z.to_string())
    }

    /// Tiles covering a viewport, row by row from the north-west.
    ///
    /// Columns wrap around the antimeridian; rows are clipped to the world.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn visible_tiles(&self, view: &MapView, viewport: [u32; 2]) -> Vec<Tile> {
        let zoom = view.zoom.min(self.max_zoom).min(MAX_TILE_ZOOM);
        let (cx, cy) = project(view.center, f64::from(zoom));
        let half_w = f64::from(viewport[0]) / 2.0;
        let half_h = f64::from(viewport[1]) / 2.0;

        let n = i64::from(tiles_per_side(zoom));
        let col_min = ((cx - half_w) / TILE_SIZE).floor() as i64;
        let col_max = ((cx + half_w) / TILE_SIZE).ceil() as i64 - 1;
        let row_min = (((cy - half_h) / TILE_SIZE).floor() as i64).max(0);
        let row_max = (((cy + half_h) / TILE_SIZE).ceil() as i64 - 1).min(n - 1);

        // At low zoom the viewport can span the world more than once
        let cols: Vec<i64> = if col_max - col_min + 1 >= n {
            (0..n).collect()
        } else {
            (col_min..=col_max).map(|c| c.rem_euclid(n)).collect()
        };

        let mut tiles = Vec::with_capacity(cols.len() * usize::try_from(row_max - row_min + 1).unwrap_or(0));
        for row in row_min..=row_max {
            for &col in &cols {
                tiles.push(Tile {
                    x: col as u32,
                    y: row as u32,
                    z: zoom,
                });
            }
        }
        tiles
    }
}

/// Corner a map control is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlPosition {
    /// Top left
    TopLeft,
    /// Top right
    TopRight,
    /// Bottom left
    BottomLeft,
    /// Bottom right
    BottomRight,
}

/// Shapes the draw toolbar offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DrawControl {
    /// Anchor corner
    pub position: ControlPosition,
    /// Free-form polygons
    pub polygon: bool,
    /// Rectangles
    pub rectangle: bool,
    /// Circles
    pub circle: bool,
    /// Circle markers
    pub circle_marker: bool,
    /// Point markers
    pub marker: bool,
    /// Polylines
    pub polyline: bool,
}

/// Placement of every control on the map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Controls {
    /// Zoom buttons
    pub zoom: ControlPosition,
    /// Draw toolbar
    pub draw: DrawControl,
    /// Upload button
    pub upload: ControlPosition,
    /// File extensions the upload dialog accepts
    pub upload_accept: &'static str,
}

impl Default for Controls {
    fn default() -> Self {
        Self {
            zoom: ControlPosition::BottomLeft,
            draw: DrawControl {
                position: ControlPosition::TopRight,
                polygon: true,
                rectangle: false,
                circle: false,
                circle_marker: false,
                marker: false,
                polyline: false,
            },
            upload: ControlPosition::TopRight,
            upload_accept: ".geojson,.json,.tif,.tiff",
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn tile_at_is_in_range(lat in -85.0f64..85.0, lng in -180.0f64..180.0, zoom in 0u8..=20) {
            let t = tile_at(Coordinate::new(lat, lng), zoom);
            prop_assert!(t.x < (1u32 << zoom));
            prop_assert!(t.y < (1u32 << zoom));
        }

        #[test]
        fn fitted_bounds_fit(
            south in -60.0f64..60.0,
            west in -170.0f64..170.0,
            dlat in 0.001f64..10.0,
            dlng in 0.001f64..10.0,
        ) {
            let b = Bounds { south, west, north: south + dlat, east: west + dlng };
            let view = fit_bounds(&b, [1280, 720], 20);
            let (x0, y0) = project(b.south_west(), f64::from(view.zoom));
            let (x1, y1) = project(b.north_east(), f64::from(view.zoom));
            prop_assert!((x1 - x0).abs() <= 1280.0 + 1e-6);
            prop_assert!((y0 - y1).abs() <= 720.0 + 1e-6);
        }
    }
}
