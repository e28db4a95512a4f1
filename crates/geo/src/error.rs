//! Error types for the geo crate.

use thiserror::Error;

/// Result type alias for geo operations.
pub type Result<T> = std::result::Result<T, GeoError>;

/// Errors that can occur during geo operations.
#[derive(Debug, Error)]
pub enum GeoError {
    /// The text is not valid GeoJSON
    #[error("Invalid GeoJSON: {0}")]
    InvalidGeoJson(#[from] geojson::Error),

    /// Invalid coordinate values
    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    /// No usable polygon in the input
    #[error("No polygon found: {0}")]
    NoPolygon(String),

    /// JSON parsing or serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Error code for integration with dronemap-core error handling.
/// Range: 10xxx for geo errors.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeoErrorCode {
    /// Invalid GeoJSON
    InvalidGeoJson = 10001,
    /// Invalid coordinate values
    InvalidCoordinate = 10002,
    /// No usable polygon
    NoPolygon = 10003,
    /// JSON error
    JsonParsing = 10004,
}

impl GeoError {
    /// Returns the error code for this error.
    pub fn code(&self) -> GeoErrorCode {
        match self {
            GeoError::InvalidGeoJson(_) => GeoErrorCode::InvalidGeoJson,
            GeoError::InvalidCoordinate(_) => GeoErrorCode::InvalidCoordinate,
            GeoError::NoPolygon(_) => GeoErrorCode::NoPolygon,
            GeoError::JsonError(_) => GeoErrorCode::JsonParsing,
        }
    }
}
