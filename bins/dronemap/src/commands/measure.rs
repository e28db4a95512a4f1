//! Measure command - the info dialog for a polygon read from a file

use crate::context::{notice_error, Context};
use anyhow::{Context as _, Result};
use dronemap_api_client::DispatchOutcome;
use dronemap_cli::output::{format_area, format_distance, print_json};
use dronemap_cli::progress::{finish_error, finish_success, spinner_if};
use dronemap_cli::Status;
use dronemap_geo::{first_polygon, parse_feature_collection, PolygonInfo};
use owo_colors::OwoColorize;
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Serialize)]
struct MeasureOutput<'a> {
    #[serde(flatten)]
    info: &'a PolygonInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    dispatch: Option<DispatchOutcome>,
    notices: Vec<String>,
}

/// Run measure command
pub async fn run(ctx: &Context, file: &Path, send: bool, quote: bool) -> Result<()> {
    let text = std::fs::read_to_string(file).with_context(|| format!("Failed to read {}", file.display()))?;
    let collection = parse_feature_collection(&text).with_context(|| format!("Invalid GeoJSON in {}", file.display()))?;
    let polygon = first_polygon(&collection).with_context(|| format!("Nothing to measure in {}", file.display()))?;

    let mut viewer = ctx.viewer()?;
    viewer.handle_created(&polygon);

    if !ctx.format.is_json() {
        print_modal(&viewer);
    }

    if quote {
        if let Err(e) = viewer.call_for_quote() {
            return Err(notice_error(&mut viewer, e));
        }
    }

    let mut dispatch = None;
    if send {
        let client = ctx.client()?;
        let pb = spinner_if(!ctx.format.is_json(), "Sending polygon information...");
        match viewer.send_polygon(&client.dispatch()).await {
            Ok(outcome) => {
                finish_success(&pb, "Sent");
                dispatch = Some(outcome);
            }
            Err(e) => {
                finish_error(&pb, "Send failed");
                return Err(notice_error(&mut viewer, e));
            }
        }
    }

    let notices = ctx.report_notices(&mut viewer)?;

    if ctx.format.is_json() {
        if let Some(info) = viewer.polygon_info() {
            print_json(&MeasureOutput { info, dispatch, notices })?;
        }
    }
    Ok(())
}

fn print_modal(viewer: &dronemap_viewer::Viewer) {
    let (Some(modal), Some(info)) = (viewer.info_modal(), viewer.polygon_info()) else {
        return;
    };

    Status::header(&modal.title);
    for field in &modal.fields {
        if field.alert {
            Status::field(&field.label, &field.value.red().bold().to_string());
        } else {
            Status::field(&field.label, &field.value);
        }
    }
    println!(
        "  {}",
        format!("≈ {} / {}", format_area(info.area_m2), format_distance(info.perimeter_m)).dimmed()
    );
    println!();
    println!("{}", modal.coordinates_label.bold());
    println!("{}", modal.coordinates_json);
    println!();
}
