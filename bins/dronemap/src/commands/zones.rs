//! Zones command - list the no-fly catalogue

use crate::context::Context;
use anyhow::Result;
use dronemap_cli::output::{format_area, format_count, print_json};
use dronemap_cli::Status;
use dronemap_geo::{measure_polygon, NoFlyZone};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct ZoneRow {
    name: String,
    polygons: usize,
    area_m2: f64,
}

impl From<&NoFlyZone> for ZoneRow {
    fn from(zone: &NoFlyZone) -> Self {
        Self {
            name: zone.name.clone(),
            polygons: zone.area.0.len(),
            area_m2: zone.area.0.iter().map(|p| measure_polygon(p).area_m2).sum(),
        }
    }
}

/// Run zones command
pub fn run(ctx: &Context, geojson: bool) -> Result<()> {
    let zones = ctx.zones()?;

    if geojson {
        println!("{}", zones.to_geojson_string());
        return Ok(());
    }

    let rows: Vec<ZoneRow> = zones.iter().map(ZoneRow::from).collect();
    if ctx.format.is_json() {
        return Ok(print_json(&rows)?);
    }

    Status::header(&format!("No-fly zones ({})", format_count(rows.len(), "zone", "zones")));
    for row in &rows {
        Status::field(&row.name, &format_area(row.area_m2));
    }
    Ok(())
}
