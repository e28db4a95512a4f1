//! User-facing notices raised by viewer events.

use crate::i18n::{text, Text};
use dronemap_core::config::Language;
use serde::Serialize;

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    /// Confirmation of something the user did
    Info,
    /// Something the user did failed
    Error,
}

/// A message the host should show to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    /// The polygon info went to the drone operator
    PolygonSent,
    /// The user asked to be called about a no-fly polygon
    CallingForQuote {
        /// Number the operator publishes for quotes
        phone: Option<String>,
    },
    /// Geocoding returned nothing
    NoSearchResults,
    /// Geocoding request failed
    SearchFailed,
    /// An uploaded vector file did not parse
    GeoJsonParseError,
    /// An uploaded raster could not be decoded or placed
    RasterReadError,
    /// An uploaded file had an unknown extension
    UnsupportedFileType,
    /// The operator endpoint rejected the polygon
    DispatchFailed,
}

impl Notice {
    /// Severity.
    pub fn level(&self) -> NoticeLevel {
        match self {
            Notice::PolygonSent | Notice::CallingForQuote { .. } | Notice::NoSearchResults => NoticeLevel::Info,
            _ => NoticeLevel::Error,
        }
    }

    /// Localised text.
    pub fn message(&self, language: Language) -> String {
        let key = match self {
            Notice::PolygonSent => Text::PolygonSent,
            Notice::CallingForQuote { phone } => {
                let base = text(language, Text::CallingForQuote);
                return match phone {
                    Some(phone) => format!("{base} {phone}"),
                    None => base.to_string(),
                };
            }
            Notice::NoSearchResults => Text::NoSearchResults,
            Notice::SearchFailed => Text::SearchFailed,
            Notice::GeoJsonParseError => Text::GeoJsonParseError,
            Notice::RasterReadError => Text::RasterReadError,
            Notice::UnsupportedFileType => Text::UnsupportedFileType,
            Notice::DispatchFailed => Text::DispatchFailed,
        };
        text(language, key).to_string()
    }
}
