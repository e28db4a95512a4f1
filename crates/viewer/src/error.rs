//! Error types for the viewer crate.

use thiserror::Error;

/// Result type alias for viewer operations.
pub type Result<T> = std::result::Result<T, ViewerError>;

/// Errors raised by viewer event handlers.
#[derive(Debug, Error)]
pub enum ViewerError {
    /// Drawn or uploaded geometry is unusable
    #[error(transparent)]
    Geo(#[from] dronemap_geo::GeoError),

    /// Uploaded raster could not be decoded or placed
    #[error(transparent)]
    Raster(#[from] dronemap_raster::RasterError),

    /// Geocoder or operator endpoint failed
    #[error(transparent)]
    Api(#[from] dronemap_api_client::ApiError),

    /// Uploaded file has an extension the viewer cannot handle
    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    /// Uploaded vector file is not UTF-8 text
    #[error("File is not valid UTF-8: {0}")]
    NotText(#[from] std::str::Utf8Error),

    /// An action needs a drawn polygon and none exists
    #[error("No polygon has been drawn yet")]
    NoPolygon,

    /// Quotes are offered only for polygons inside no-fly zones
    #[error("The polygon does not intersect any no-fly zone")]
    NoNoFlyConflict,
}

/// Error code for integration with dronemap-core error handling.
/// Range: 12xxx for viewer errors.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerErrorCode {
    /// Geometry error
    Geo = 12001,
    /// Raster error
    Raster = 12002,
    /// Network error
    Api = 12003,
    /// Unsupported file type
    UnsupportedFileType = 12004,
    /// Non-text vector file
    NotText = 12005,
    /// No polygon drawn
    NoPolygon = 12006,
    /// Quote requested without a conflict
    NoNoFlyConflict = 12007,
}

impl ViewerError {
    /// Returns the error code for this error.
    pub fn code(&self) -> ViewerErrorCode {
        match self {
            ViewerError::Geo(_) => ViewerErrorCode::Geo,
            ViewerError::Raster(_) => ViewerErrorCode::Raster,
            ViewerError::Api(_) => ViewerErrorCode::Api,
            ViewerError::UnsupportedFileType(_) => ViewerErrorCode::UnsupportedFileType,
            ViewerError::NotText(_) => ViewerErrorCode::NotText,
            ViewerError::NoPolygon => ViewerErrorCode::NoPolygon,
            ViewerError::NoNoFlyConflict => ViewerErrorCode::NoNoFlyConflict,
        }
    }
}

impl From<ViewerError> for dronemap_core::Error {
    fn from(err: ViewerError) -> Self {
        use dronemap_core::{Error, ErrorCode};

        match err {
            ViewerError::Api(api) => api.into(),
            ViewerError::UnsupportedFileType(name) => Error::unsupported_file_type(&name),
            ViewerError::Geo(e) => {
                let code = match e {
                    dronemap_geo::GeoError::NoPolygon(_) => ErrorCode::NoPolygon,
                    dronemap_geo::GeoError::InvalidCoordinate(_) => ErrorCode::GeometryError,
                    _ => ErrorCode::InvalidGeoJson,
                };
                Error::new(code, e.to_string())
            }
            ViewerError::NotText(e) => Error::new(ErrorCode::InvalidGeoJson, e.to_string()),
            ViewerError::Raster(e) => {
                let code = match e {
                    dronemap_raster::RasterError::UnsupportedCrs(_) => ErrorCode::UnsupportedCrs,
                    _ => ErrorCode::RasterError,
                };
                Error::new(code, e.to_string())
            }
            other @ (ViewerError::NoPolygon | ViewerError::NoNoFlyConflict) => {
                Error::new(ErrorCode::InvalidInput, other.to_string())
            }
        }
    }
}
