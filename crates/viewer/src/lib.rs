//! Headless map viewer for dronemap.
//!
//! Holds everything the map shows and reacts to user events; the host
//! (a browser map library or the terminal) only draws:
//! - Map view, satellite tiles and control placement
//! - Drawn polygon measurement and the info dialog
//! - GeoJSON and GeoTIFF overlays from uploaded files
//! - Geocoding search marker
//! - Localised notices
//!
//! # Example
//! ```
//! use dronemap_geo::{Coordinate, NoFlyZones};
//! use dronemap_viewer::{Viewer, ViewerConfig};
//!
//! let mut viewer = Viewer::new(ViewerConfig::default(), NoFlyZones::builtin().unwrap());
//! let info = viewer
//!     .handle_drawn(&[
//!         Coordinate::new(31.99, 34.88),
//!         Coordinate::new(31.99, 34.89),
//!         Coordinate::new(32.00, 34.89),
//!     ])
//!     .unwrap();
//! assert_eq!(info.no_fly_zones, vec!["Ben Gurion Airport".to_string()]);
//! assert!(viewer.show_modal());
//! ```

#![warn(missing_docs)]

mod error;
pub mod i18n;
mod layers;
pub mod map;
mod modal;
mod notices;
mod upload;
mod viewer;

pub use error::{Result, ViewerError, ViewerErrorCode};
pub use layers::{PathStyle, RasterLayer, SearchMarker, VectorLayer};
pub use map::{ControlPosition, Controls, DrawControl, MapView, Tile, TileSource};
pub use modal::{InfoModal, ModalAction, ModalField};
pub use notices::{Notice, NoticeLevel};
pub use upload::FileKind;
pub use viewer::{NoticeSummary, RasterSummary, VectorSummary, Viewer, ViewerConfig, ViewerSnapshot};
