//! Tile command - which satellite tile covers a coordinate

use crate::context::Context;
use anyhow::Result;
use dronemap_cli::output::print_json;
use dronemap_cli::Status;
use dronemap_geo::Coordinate;
use dronemap_viewer::map::tile_at;
use dronemap_viewer::{Tile, ViewerConfig};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct TileOutput {
    coordinate: Coordinate,
    tile: Tile,
    url: String,
}

/// Run tile command
pub fn run(ctx: &Context, lat: f64, lng: f64, zoom: Option<u8>) -> Result<()> {
    let coordinate = Coordinate::new(lat, lng);
    if !coordinate.is_valid() {
        anyhow::bail!("({lat}, {lng}) is not a valid latitude/longitude");
    }

    let config = ViewerConfig::from_schema(&ctx.config.schema);
    let zoom = zoom.unwrap_or(config.initial_view.zoom);
    if zoom > config.tiles.max_zoom {
        anyhow::bail!("zoom {zoom} exceeds the tile source maximum of {}", config.tiles.max_zoom);
    }

    let tile = tile_at(coordinate, zoom);
    let url = config.tiles.url_for(tile);

    if ctx.format.is_json() {
        return Ok(print_json(&TileOutput { coordinate, tile, url })?);
    }

    Status::field("Tile", &format!("{}/{}/{}", tile.z, tile.x, tile.y));
    Status::field("URL", &url);
    Ok(())
}
