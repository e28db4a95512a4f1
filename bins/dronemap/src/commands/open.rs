//! Open command - load an overlay file the way the upload button does

use crate::context::{notice_error, Context};
use anyhow::{Context as _, Result};
use dronemap_cli::output::{format_count, format_size, print_json};
use dronemap_cli::Status;
use dronemap_geo::Bounds;
use dronemap_viewer::{FileKind, ViewerSnapshot};
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Serialize)]
struct OpenOutput {
    #[serde(flatten)]
    snapshot: ViewerSnapshot,
    visible_tiles: usize,
}

/// Run open command
pub fn run(ctx: &Context, file: &Path) -> Result<()> {
    let bytes = std::fs::read(file).with_context(|| format!("Failed to read {}", file.display()))?;
    let name = file.file_name().and_then(|n| n.to_str()).unwrap_or_default();

    let mut viewer = ctx.viewer()?;
    let kind = viewer
        .handle_file_upload(name, &bytes)
        .map_err(|e| notice_error(&mut viewer, e))?;
    let visible_tiles = viewer.visible_tiles().len();

    if ctx.format.is_json() {
        return Ok(print_json(&OpenOutput {
            snapshot: viewer.snapshot(),
            visible_tiles,
        })?);
    }

    Status::header(&format!("{name} ({})", format_size(bytes.len() as u64)));
    match kind {
        FileKind::Vector => {
            if let Some(layer) = viewer.vector_layer() {
                Status::field("Type", "GeoJSON");
                Status::field("Features", &format_count(layer.feature_count(), "feature", "features"));
                Status::field("Bounds", &layer.bounds.map_or_else(|| "none".to_string(), |b| format_bounds(&b)));
            }
        }
        FileKind::Raster => {
            if let Some(layer) = viewer.raster_layer() {
                let (w, h) = layer.source_size;
                Status::field("Type", "GeoTIFF");
                Status::field("Size", &format!("{w} x {h} px"));
                Status::field("Bounds", &format_bounds(&layer.bounds()));
                if let Some(stats) = layer.stats {
                    Status::field(
                        "Values",
                        &format!("{:.2} .. {:.2} (mean {:.2})", stats.min, stats.max, stats.mean),
                    );
                }
                Status::field(
                    "Overlay",
                    &format!(
                        "{}x{} at opacity {:.2}",
                        layer.overlay.width, layer.overlay.height, layer.overlay.opacity
                    ),
                );
            }
        }
    }

    let view = viewer.view();
    Status::field(
        "View",
        &format!("{:.5}, {:.5} zoom {}", view.center.latitude, view.center.longitude, view.zoom),
    );
    Status::field("Tiles", &format_count(visible_tiles, "tile", "tiles"));
    Status::success("Overlay loaded");
    Ok(())
}

fn format_bounds(b: &Bounds) -> String {
    format!("S {:.5} W {:.5} N {:.5} E {:.5}", b.south, b.west, b.north, b.east)
}
