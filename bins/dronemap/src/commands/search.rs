//! Search command - geocode a place and move the map there

use crate::context::Context;
use anyhow::Result;
use dronemap_cli::output::print_json;
use dronemap_cli::progress::spinner_if;
use dronemap_cli::Status;
use dronemap_viewer::map::tile_at;
use dronemap_viewer::{MapView, SearchMarker};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct SearchOutput<'a> {
    query: &'a str,
    marker: Option<SearchMarker>,
    view: MapView,
    notices: Vec<String>,
}

/// Run search command
pub async fn run(ctx: &Context, query: &str) -> Result<()> {
    let client = ctx.client()?;
    let mut viewer = ctx.viewer()?;

    let visible = !ctx.format.is_json() && !query.trim().is_empty();
    let pb = spinner_if(visible, &format!("Searching for {query}..."));
    let marker = viewer.search(&client.search(), query).await.cloned();
    pb.finish_and_clear();

    let notices = ctx.report_notices(&mut viewer)?;
    let view = viewer.view();

    if ctx.format.is_json() {
        return Ok(print_json(&SearchOutput {
            query,
            marker,
            view,
            notices,
        })?);
    }

    if let Some(marker) = marker {
        Status::header(&marker.popup);
        Status::field("Latitude", &format!("{:.6}", marker.position.latitude));
        Status::field("Longitude", &format!("{:.6}", marker.position.longitude));
        Status::field("Zoom", &view.zoom.to_string());
        let tile = tile_at(view.center, view.zoom);
        Status::field("Tile", &viewer.config().tiles.url_for(tile));
    }
    Ok(())
}
