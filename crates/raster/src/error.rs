//! Error types for the raster crate.

use thiserror::Error;

/// Result type alias for raster operations.
pub type Result<T> = std::result::Result<T, RasterError>;

/// Errors that can occur while decoding a GeoTIFF.
#[derive(Debug, Error)]
pub enum RasterError {
    /// The bytes are not a readable TIFF
    #[error("TIFF decode error: {0}")]
    Decode(#[from] tiff::TiffError),

    /// Neither a tiepoint/scale pair nor a transformation matrix is present
    #[error("Missing georeference: {0}")]
    MissingGeoreference(String),

    /// The raster is in a coordinate system that cannot be placed on the map
    #[error("Unsupported coordinate reference system: {0}")]
    UnsupportedCrs(String),

    /// Sample layout the decoder produced is not usable
    #[error("Unsupported sample format: {0}")]
    UnsupportedSampleFormat(String),

    /// Zero-sized raster
    #[error("Raster is empty")]
    Empty,
}

/// Error code for integration with dronemap-core error handling.
/// Range: 11xxx for raster errors.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RasterErrorCode {
    /// TIFF decode failure
    Decode = 11001,
    /// No georeferencing tags
    MissingGeoreference = 11002,
    /// Unsupported CRS
    UnsupportedCrs = 11003,
    /// Unsupported sample format
    UnsupportedSampleFormat = 11004,
    /// Empty raster
    Empty = 11005,
}

impl RasterError {
    /// Returns the error code for this error.
    pub fn code(&self) -> RasterErrorCode {
        match self {
            RasterError::Decode(_) => RasterErrorCode::Decode,
            RasterError::MissingGeoreference(_) => RasterErrorCode::MissingGeoreference,
            RasterError::UnsupportedCrs(_) => RasterErrorCode::UnsupportedCrs,
            RasterError::UnsupportedSampleFormat(_) => RasterErrorCode::UnsupportedSampleFormat,
            RasterError::Empty => RasterErrorCode::Empty,
        }
    }
}
