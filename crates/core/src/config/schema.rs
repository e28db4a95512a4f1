//! Configuration schema definitions

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Deepest zoom level a slippy-map tile source may declare.
pub const MAX_TILE_ZOOM: u8 = 30;

/// Root configuration schema
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ConfigSchema {
    /// Map view and tile source
    #[serde(default)]
    pub map: MapConfig,

    /// Geocoding service
    #[serde(default)]
    pub geocoder: GeocoderConfig,

    /// Where drawn polygons are sent
    #[serde(default)]
    pub dispatch: DispatchConfig,

    /// Raster overlay rendering
    #[serde(default)]
    pub raster: RasterConfig,

    /// No-fly zone catalogue
    #[serde(default)]
    pub zones: ZonesConfig,

    /// User interface
    #[serde(default)]
    pub ui: UiConfig,
}

impl ConfigSchema {
    /// Check cross-field constraints that serde cannot express
    pub fn validate(&self) -> Result<()> {
        let [lat, lng] = self.map.center;
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
            return Err(Error::invalid_config_value(
                "map.center",
                format!("[{lat}, {lng}] is not a valid latitude/longitude"),
            ));
        }
        if self.map.max_zoom > MAX_TILE_ZOOM {
            return Err(Error::invalid_config_value(
                "map.max_zoom",
                format!("{} exceeds the deepest tile zoom {MAX_TILE_ZOOM}", self.map.max_zoom),
            ));
        }
        if self.map.viewport.contains(&0) {
            let [w, h] = self.map.viewport;
            return Err(Error::invalid_config_value(
                "map.viewport",
                format!("{w}x{h} has no area"),
            ));
        }
        if self.map.zoom > self.map.max_zoom {
            return Err(Error::invalid_config_value(
                "map.zoom",
                format!("{} exceeds map.max_zoom {}", self.map.zoom, self.map.max_zoom),
            ));
        }
        if self.map.search_zoom > self.map.max_zoom {
            return Err(Error::invalid_config_value(
                "map.search_zoom",
                format!("{} exceeds map.max_zoom {}", self.map.search_zoom, self.map.max_zoom),
            ));
        }
        if self.map.subdomains.is_empty() && self.map.tile_url.contains("{s}") {
            return Err(Error::invalid_config_value(
                "map.subdomains",
                "tile_url uses {s} but no subdomains are configured",
            ));
        }
        if !(0.0..=1.0).contains(&self.raster.opacity) {
            return Err(Error::invalid_config_value(
                "raster.opacity",
                format!("{} is outside 0.0..=1.0", self.raster.opacity),
            ));
        }
        if self.raster.resolution == 0 {
            return Err(Error::invalid_config_value("raster.resolution", "must be positive"));
        }
        if self.geocoder.timeout_secs == 0 {
            return Err(Error::invalid_config_value("geocoder.timeout_secs", "must be positive"));
        }
        Ok(())
    }
}

/// Map view and tile source configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MapConfig {
    /// Initial centre as `[latitude, longitude]`
    #[serde(default = "default_center")]
    pub center: [f64; 2],

    /// Initial zoom level
    #[serde(default = "default_zoom")]
    pub zoom: u8,

    /// Deepest zoom the tile source serves
    #[serde(default = "default_max_zoom")]
    pub max_zoom: u8,

    /// Zoom used when jumping to a search result
    #[serde(default = "default_search_zoom")]
    pub search_zoom: u8,

    /// Tile URL template with `{s}`, `{x}`, `{y}` and `{z}` placeholders
    #[serde(default = "default_tile_url")]
    pub tile_url: String,

    /// Values substituted for `{s}`
    #[serde(default = "default_subdomains")]
    pub subdomains: Vec<String>,

    /// Viewport size in pixels as `[width, height]`, used to fit bounds
    #[serde(default = "default_viewport")]
    pub viewport: [u32; 2],
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            center: default_center(),
            zoom: default_zoom(),
            max_zoom: default_max_zoom(),
            search_zoom: default_search_zoom(),
            tile_url: default_tile_url(),
            subdomains: default_subdomains(),
            viewport: default_viewport(),
        }
    }
}

fn default_center() -> [f64; 2] {
    [31.7683, 35.2137]
}

fn default_zoom() -> u8 {
    7
}

fn default_max_zoom() -> u8 {
    20
}

fn default_search_zoom() -> u8 {
    13
}

fn default_tile_url() -> String {
    "https://{s}.google.com/vt/lyrs=s&x={x}&y={y}&z={z}".to_string()
}

fn default_subdomains() -> Vec<String> {
    ["mt0", "mt1", "mt2", "mt3"].into_iter().map(String::from).collect()
}

fn default_viewport() -> [u32; 2] {
    [1280, 720]
}

/// Geocoding service configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeocoderConfig {
    /// Base URL of a Nominatim-compatible service
    #[serde(default = "default_geocoder_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User agent sent with every request (required by Nominatim's usage policy)
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            base_url: default_geocoder_url(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_geocoder_url() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

fn default_timeout_secs() -> u64 {
    15
}

fn default_user_agent() -> String {
    format!("dronemap/{}", env!("CARGO_PKG_VERSION"))
}

/// Drone operator contact configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct DispatchConfig {
    /// Endpoint that receives polygon info as JSON; unset means log only
    #[serde(default)]
    pub operator_url: Option<String>,

    /// Phone number offered for price quotes
    #[serde(default)]
    pub phone: Option<String>,
}

/// Raster overlay configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RasterConfig {
    /// Overlay opacity in `0.0..=1.0`
    #[serde(default = "default_opacity")]
    pub opacity: f64,

    /// Side length of the rendered overlay grid in pixels
    #[serde(default = "default_resolution")]
    pub resolution: u32,
}

impl Default for RasterConfig {
    fn default() -> Self {
        Self {
            opacity: default_opacity(),
            resolution: default_resolution(),
        }
    }
}

fn default_opacity() -> f64 {
    0.7
}

fn default_resolution() -> u32 {
    256
}

/// No-fly zone catalogue configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ZonesConfig {
    /// GeoJSON file replacing the bundled catalogue
    #[serde(default)]
    pub path: Option<String>,
}

/// User interface configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct UiConfig {
    /// Language for user-facing notices
    #[serde(default)]
    pub language: Language,
}

/// Notice language
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
pub enum Language {
    /// English
    #[default]
    #[serde(rename = "en")]
    English,
    /// Hebrew
    #[serde(rename = "he")]
    Hebrew,
}

impl std::str::FromStr for Language {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "en" | "english" => Ok(Self::English),
            "he" | "hebrew" => Ok(Self::Hebrew),
            other => Err(Error::validation(format!("Unknown language: {other}"))
                .with_suggestion("Use \"en\" or \"he\"")),
        }
    }
}
