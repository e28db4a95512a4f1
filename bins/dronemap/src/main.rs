//! dronemap - drone survey polygons over satellite imagery
//!
//! Measures polygons, checks them against no-fly zones, geocodes places and
//! inspects GeoJSON/GeoTIFF overlays the way the map viewer would show them.

use clap::{ArgAction, Parser, Subcommand};
use dronemap_cli::OutputFormat;
use dronemap_telemetry::TelemetryConfig;
use owo_colors::OwoColorize;
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;
mod context;

use commands::{measure, open, search, tile, zones};
use context::Context;

/// Drone survey polygons, no-fly zones and map overlays
#[derive(Parser)]
#[command(name = "dronemap")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file (default: .dronemap.toml, dronemap.toml or .config/dronemap.toml)
    #[arg(short, long, global = true, env = "DRONEMAP_CONFIG")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Print collected metrics as JSON on stderr before exiting
    #[arg(long, global = true)]
    metrics: bool,

    /// Notice language, overriding the configuration file (en, he)
    #[arg(long, global = true)]
    lang: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Measure the first polygon of a GeoJSON file and check it against no-fly zones
    Measure {
        /// GeoJSON file containing a Polygon or MultiPolygon
        file: PathBuf,

        /// Send the polygon information to the drone operator
        #[arg(short, long)]
        send: bool,

        /// Ask the operator for a price quote (only for polygons in a no-fly zone)
        #[arg(short, long)]
        quote: bool,
    },

    /// Find a place and show where the map would jump to
    Search {
        /// Free-text place name or address
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },

    /// Load a GeoJSON or GeoTIFF overlay and show how the map would fit it
    Open {
        /// File ending in .geojson, .json, .tif or .tiff
        file: PathBuf,
    },

    /// List the no-fly zones
    Zones {
        /// Print the catalogue as GeoJSON instead
        #[arg(long)]
        geojson: bool,
    },

    /// Show the satellite tile covering a coordinate
    Tile {
        /// Latitude in degrees
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        /// Longitude in degrees
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,

        /// Zoom level (default: the configured initial zoom)
        #[arg(short, long)]
        zoom: Option<u8>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = dronemap_telemetry::init_with_config(TelemetryConfig::from_verbosity(cli.verbose)) {
        eprintln!("{} {}", "Warning:".yellow().bold(), e);
    }

    let result = match Context::load(cli.config.as_deref(), cli.format, cli.lang.as_deref()) {
        Ok(ctx) => match cli.command {
            Commands::Measure { file, send, quote } => measure::run(&ctx, &file, send, quote).await,
            Commands::Search { query } => search::run(&ctx, &query.join(" ")).await,
            Commands::Open { file } => open::run(&ctx, &file),
            Commands::Zones { geojson } => zones::run(&ctx, geojson),
            Commands::Tile { lat, lng, zoom } => tile::run(&ctx, lat, lng, zoom),
        },
        Err(e) => Err(e),
    };

    if cli.metrics {
        let metrics = dronemap_telemetry::metrics().export_json();
        match serde_json::to_string_pretty(&metrics) {
            Ok(text) => eprintln!("{text}"),
            Err(e) => eprintln!("{} {}", "Warning:".yellow().bold(), e),
        }
    }

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
