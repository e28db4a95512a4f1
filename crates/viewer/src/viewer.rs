//! Viewer state and event handlers.

use crate::error::{Result, ViewerError};
use crate::layers::{PathStyle, RasterLayer, SearchMarker, VectorLayer};
use crate::map::{self, Controls, MapView, Tile, TileSource};
use crate::modal::InfoModal;
use crate::notices::{Notice, NoticeLevel};
use crate::upload::FileKind;
use dronemap_api_client::{ApiResult, DispatchApi, DispatchOutcome, Place, SearchApi};
use dronemap_core::config::{ConfigSchema, Language};
use dronemap_geo::{
    collection_bounds, parse_feature_collection, polygon_from_coordinates, Bounds, Coordinate, NoFlyZones,
    Polygon, PolygonInfo,
};
use dronemap_raster::{BandStats, GeoRaster, RenderOptions};
use dronemap_telemetry::{metrics, names, Timer};
use serde::Serialize;
use tracing::{debug, info, warn};

/// Settings the viewer starts from.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    /// View shown on start
    pub initial_view: MapView,
    /// Zoom used when jumping to a search result
    pub search_zoom: u8,
    /// Base imagery
    pub tiles: TileSource,
    /// Viewport size in pixels, used to fit bounds
    pub viewport: [u32; 2],
    /// Raster overlay rendering
    pub render: RenderOptions,
    /// Notice language
    pub language: Language,
    /// Phone number offered for quotes
    pub phone: Option<String>,
}

impl ViewerConfig {
    /// Viewer settings from the loaded configuration file.
    pub fn from_schema(schema: &ConfigSchema) -> Self {
        let [lat, lng] = schema.map.center;
        Self {
            initial_view: MapView {
                center: Coordinate::new(lat, lng),
                zoom: schema.map.zoom,
            },
            search_zoom: schema.map.search_zoom,
            tiles: TileSource {
                url_template: schema.map.tile_url.clone(),
                subdomains: schema.map.subdomains.clone(),
                max_zoom: schema.map.max_zoom,
            },
            viewport: schema.map.viewport,
            render: RenderOptions {
                opacity: schema.raster.opacity,
                resolution: schema.raster.resolution,
            },
            language: schema.ui.language,
            phone: schema.dispatch.phone.clone(),
        }
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self::from_schema(&ConfigSchema::default())
    }
}

/// The map viewer: what is shown and how it reacts to the user.
#[derive(Debug, Clone)]
pub struct Viewer {
    config: ViewerConfig,
    zones: NoFlyZones,
    controls: Controls,
    view: MapView,
    show_modal: bool,
    polygon_info: Option<PolygonInfo>,
    vector_layer: Option<VectorLayer>,
    raster_layer: Option<RasterLayer>,
    search_marker: Option<SearchMarker>,
    notices: Vec<Notice>,
}

impl Viewer {
    /// A viewer at the configured initial view with nothing drawn.
    pub fn new(config: ViewerConfig, zones: NoFlyZones) -> Self {
        let view = config.initial_view;
        debug!(zone_count = zones.len(), zoom = view.zoom, "Viewer created");
        Self {
            config,
            zones,
            controls: Controls::default(),
            view,
            show_modal: false,
            polygon_info: None,
            vector_layer: None,
            raster_layer: None,
            search_marker: None,
            notices: Vec::new(),
        }
    }

    /// Settings the viewer was created with.
    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    /// The no-fly catalogue polygons are checked against.
    pub fn zones(&self) -> &NoFlyZones {
        &self.zones
    }

    /// Control placement.
    pub fn controls(&self) -> &Controls {
        &self.controls
    }

    /// Current view.
    pub fn view(&self) -> MapView {
        self.view
    }

    /// Whether the polygon dialog is open.
    pub fn show_modal(&self) -> bool {
        self.show_modal
    }

    /// Last measured polygon.
    pub fn polygon_info(&self) -> Option<&PolygonInfo> {
        self.polygon_info.as_ref()
    }

    /// Uploaded GeoJSON layer.
    pub fn vector_layer(&self) -> Option<&VectorLayer> {
        self.vector_layer.as_ref()
    }

    /// Uploaded GeoTIFF layer.
    pub fn raster_layer(&self) -> Option<&RasterLayer> {
        self.raster_layer.as_ref()
    }

    /// Pin on the last search result.
    pub fn search_marker(&self) -> Option<&SearchMarker> {
        self.search_marker.as_ref()
    }

    /// Notices not yet taken by the host.
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Removes and returns pending notices, oldest first.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Localised text of a notice in the configured language.
    pub fn notice_text(&self, notice: &Notice) -> String {
        notice.message(self.config.language)
    }

    fn notify(&mut self, notice: Notice) {
        match notice.level() {
            NoticeLevel::Info => debug!(?notice, "Notice"),
            NoticeLevel::Error => warn!(?notice, "Notice"),
        }
        self.notices.push(notice);
    }

    // Drawing

    /// A polygon was drawn: measure it, check it and open the dialog.
    pub fn handle_created(&mut self, polygon: &Polygon<f64>) -> &PolygonInfo {
        let timer = Timer::start(names::MEASURE_MS);
        let info = PolygonInfo::new(polygon, &self.zones);
        timer.stop();

        metrics().increment(names::POLYGONS_MEASURED);
        if info.has_no_fly_conflict() {
            metrics().increment(names::NO_FLY_CONFLICTS);
        }
        info!(
            area_m2 = info.area_m2,
            perimeter_m = info.perimeter_m,
            no_fly_zones = ?info.no_fly_zones,
            "Polygon measured"
        );

        self.show_modal = true;
        self.polygon_info.insert(info)
    }

    /// Same as [`Viewer::handle_created`], from the drawn vertices.
    pub fn handle_drawn(&mut self, vertices: &[Coordinate]) -> Result<&PolygonInfo> {
        let polygon = polygon_from_coordinates(vertices)?;
        Ok(self.handle_created(&polygon))
    }

    /// Hides the dialog; the measurement is kept.
    pub fn close_modal(&mut self) {
        self.show_modal = false;
    }

    /// The dialog, when it is open.
    pub fn info_modal(&self) -> Option<InfoModal> {
        if !self.show_modal {
            return None;
        }
        self.polygon_info
            .as_ref()
            .map(|info| InfoModal::new(info, self.config.language))
    }

    /// Logs the polygon for the operator and closes the dialog.
    pub fn record_sent(&mut self) -> Result<()> {
        let info = self.polygon_info.as_ref().ok_or(ViewerError::NoPolygon)?;
        info!(
            coordinates = %serde_json::to_string(&info.coordinates).unwrap_or_default(),
            area_m2 = info.area_m2,
            perimeter_m = info.perimeter_m,
            no_fly_zones = ?info.no_fly_zones,
            "Sending polygon information"
        );
        self.finish_send();
        Ok(())
    }

    /// Sends the polygon to the operator endpoint, or logs it when none is
    /// configured, and closes the dialog.
    ///
    /// On failure the dialog stays open so the user can retry.
    pub async fn send_polygon(&mut self, dispatch: &DispatchApi) -> Result<DispatchOutcome> {
        let info = self.polygon_info.as_ref().ok_or(ViewerError::NoPolygon)?;
        match dispatch.send(info).await {
            Ok(outcome) => {
                self.finish_send();
                Ok(outcome)
            }
            Err(e) => {
                warn!(error = %e, "Dispatch failed");
                self.notify(Notice::DispatchFailed);
                Err(e.into())
            }
        }
    }

    fn finish_send(&mut self) {
        metrics().increment(names::POLYGONS_SENT);
        self.show_modal = false;
        self.notify(Notice::PolygonSent);
    }

    /// Asks the operator to call about a polygon inside a no-fly zone.
    pub fn call_for_quote(&mut self) -> Result<()> {
        let info = self.polygon_info.as_ref().ok_or(ViewerError::NoPolygon)?;
        if !info.has_no_fly_conflict() {
            return Err(ViewerError::NoNoFlyConflict);
        }
        info!(no_fly_zones = ?info.no_fly_zones, "Quote requested");
        let phone = self.config.phone.clone();
        self.notify(Notice::CallingForQuote { phone });
        Ok(())
    }

    // Uploads

    /// Loads an uploaded file as an overlay, chosen by its extension.
    ///
    /// A failed upload raises a notice and leaves existing layers untouched.
    pub fn handle_file_upload(&mut self, file_name: &str, bytes: &[u8]) -> Result<FileKind> {
        let result = match FileKind::from_name(file_name) {
            Some(FileKind::Vector) => self.load_vector(bytes).map(|()| FileKind::Vector),
            Some(FileKind::Raster) => self.load_raster(file_name, bytes).map(|()| FileKind::Raster),
            None => {
                self.notify(Notice::UnsupportedFileType);
                Err(ViewerError::UnsupportedFileType(file_name.to_string()))
            }
        };

        match &result {
            Ok(kind) => {
                metrics().increment(names::UPLOADS_ACCEPTED);
                info!(file = %file_name, ?kind, "Overlay loaded");
            }
            Err(e) => {
                metrics().increment(names::UPLOADS_REJECTED);
                warn!(file = %file_name, error = %e, "Upload rejected");
            }
        }
        result
    }

    fn load_vector(&mut self, bytes: &[u8]) -> Result<()> {
        let parsed = std::str::from_utf8(bytes)
            .map_err(ViewerError::from)
            .and_then(|text| {
                let collection = parse_feature_collection(text)?;
                let bounds = collection_bounds(&collection)?;
                Ok((collection, bounds))
            });

        let (collection, bounds) = match parsed {
            Ok(parsed) => parsed,
            Err(e) => {
                self.notify(Notice::GeoJsonParseError);
                return Err(e);
            }
        };

        self.vector_layer = Some(VectorLayer {
            collection,
            bounds,
            style: None,
        });
        if let Some(bounds) = bounds {
            self.fit_bounds(&bounds);
        }
        Ok(())
    }

    fn load_raster(&mut self, file_name: &str, bytes: &[u8]) -> Result<()> {
        let timer = Timer::start(names::RASTER_DECODE_MS);
        let raster = match GeoRaster::from_bytes(bytes) {
            Ok(raster) => raster,
            Err(e) => {
                self.notify(Notice::RasterReadError);
                return Err(e.into());
            }
        };
        let overlay = raster.render(&self.config.render);
        timer.stop();

        let bounds = overlay.bounds;
        self.raster_layer = Some(RasterLayer {
            file_name: file_name.to_string(),
            source_size: (raster.width(), raster.height()),
            stats: raster.band_stats(),
            overlay,
        });
        self.fit_bounds(&bounds);
        Ok(())
    }

    // Search

    /// Geocodes a query and moves to the best match.
    pub async fn search(&mut self, api: &SearchApi, query: &str) -> Option<&SearchMarker> {
        let query = query.trim();
        if query.is_empty() {
            self.notify(Notice::NoSearchResults);
            return None;
        }
        let result = api.first(query).await;
        self.apply_search_results(result)
    }

    /// Applies a geocoding answer: a hit drops the marker and recentres at
    /// the search zoom, no hit or a failure raises a notice.
    pub fn apply_search_results(&mut self, result: ApiResult<Option<Place>>) -> Option<&SearchMarker> {
        metrics().increment(names::SEARCHES);
        match result {
            Ok(Some(place)) => {
                let position = Coordinate::new(place.lat, place.lon);
                info!(lat = place.lat, lon = place.lon, name = %place.display_name, "Search hit");
                self.set_view(position, self.config.search_zoom);
                Some(&*self.search_marker.insert(SearchMarker {
                    position,
                    popup: place.display_name,
                }))
            }
            Ok(None) => {
                self.notify(Notice::NoSearchResults);
                None
            }
            Err(e) => {
                metrics().increment(names::SEARCH_ERRORS);
                tracing::error!(error = %e, "Error fetching location");
                self.notify(Notice::SearchFailed);
                None
            }
        }
    }

    // View

    /// Moves the view, clamping the zoom to the tile source.
    pub fn set_view(&mut self, center: Coordinate, zoom: u8) {
        self.view = MapView {
            center,
            zoom: zoom.min(self.config.tiles.max_zoom),
        };
    }

    /// Zooms to show the whole box.
    pub fn fit_bounds(&mut self, bounds: &Bounds) {
        self.view = map::fit_bounds(bounds, self.config.viewport, self.config.tiles.max_zoom);
        debug!(zoom = self.view.zoom, "Fitted bounds");
    }

    /// Base tiles covering the viewport with their URLs.
    pub fn visible_tiles(&self) -> Vec<(Tile, String)> {
        let tiles = &self.config.tiles;
        tiles
            .visible_tiles(&self.view, self.config.viewport)
            .into_iter()
            .map(|tile| (tile, tiles.url_for(tile)))
            .collect()
    }

    /// The no-fly catalogue as a styled layer.
    pub fn no_fly_layer(&self) -> VectorLayer {
        let collection = self.zones.feature_collection().clone();
        VectorLayer {
            bounds: collection_bounds(&collection).ok().flatten(),
            collection,
            style: Some(PathStyle::no_fly()),
        }
    }

    /// Serializable summary of what is on screen.
    pub fn snapshot(&self) -> ViewerSnapshot {
        ViewerSnapshot {
            view: self.view,
            show_modal: self.show_modal,
            polygon_info: self.polygon_info.clone(),
            vector_layer: self.vector_layer.as_ref().map(|l| VectorSummary {
                feature_count: l.feature_count(),
                bounds: l.bounds,
            }),
            raster_layer: self.raster_layer.as_ref().map(|l| RasterSummary {
                file_name: l.file_name.clone(),
                width: l.source_size.0,
                height: l.source_size.1,
                bounds: l.bounds(),
                opacity: l.overlay.opacity,
                stats: l.stats,
            }),
            search_marker: self.search_marker.clone(),
            notices: self
                .notices
                .iter()
                .map(|n| NoticeSummary {
                    level: n.level(),
                    message: self.notice_text(n),
                })
                .collect(),
        }
    }
}

/// What [`Viewer::snapshot`] returns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewerSnapshot {
    /// Current view
    pub view: MapView,
    /// Whether the dialog is open
    pub show_modal: bool,
    /// Last measurement
    pub polygon_info: Option<PolygonInfo>,
    /// Uploaded GeoJSON
    pub vector_layer: Option<VectorSummary>,
    /// Uploaded GeoTIFF
    pub raster_layer: Option<RasterSummary>,
    /// Search pin
    pub search_marker: Option<SearchMarker>,
    /// Pending notices
    pub notices: Vec<NoticeSummary>,
}

/// Vector layer in a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VectorSummary {
    /// Number of features
    pub feature_count: usize,
    /// Extent
    pub bounds: Option<Bounds>,
}

/// Raster layer in a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RasterSummary {
    /// File name
    pub file_name: String,
    /// Source width
    pub width: u32,
    /// Source height
    pub height: u32,
    /// Extent
    pub bounds: Bounds,
    /// Overlay opacity
    pub opacity: f64,
    /// First-band statistics
    pub stats: Option<BandStats>,
}

/// Notice in a snapshot, already localised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoticeSummary {
    /// Severity
    pub level: NoticeLevel,
    /// Text
    pub message: String,
}
