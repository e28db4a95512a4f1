//! User-facing strings in English and Hebrew.

use dronemap_core::config::Language;

/// Keys of every translatable string.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Text {
    AppTitle,
    UploadTitle,
    ModalTitle,
    Area,
    SquareMeters,
    Perimeter,
    Meters,
    NoFlyZones,
    NoneFound,
    Coordinates,
    Close,
    SendToOperator,
    CallForQuote,
    PolygonSent,
    CallingForQuote,
    NoSearchResults,
    SearchFailed,
    GeoJsonParseError,
    RasterReadError,
    UnsupportedFileType,
    DispatchFailed,
}

/// The string for a key in a language.
pub fn text(language: Language, key: Text) -> &'static str {
    match language {
        Language::English => english(key),
        Language::Hebrew => hebrew(key),
    }
}

fn english(key: Text) -> &'static str {
    match key {
        Text::AppTitle => "Drone geospatial imaging services",
        Text::UploadTitle => "Upload GeoJSON or TIF",
        Text::ModalTitle => "Polygon information",
        Text::Area => "Area",
        Text::SquareMeters => "m²",
        Text::Perimeter => "Perimeter",
        Text::Meters => "m",
        Text::NoFlyZones => "No-fly zones",
        Text::NoneFound => "None",
        Text::Coordinates => "Coordinates",
        Text::Close => "Close",
        Text::SendToOperator => "Send to the drone company",
        Text::CallForQuote => "Call for a price quote",
        Text::PolygonSent => "Polygon information sent to the drone company!",
        Text::CallingForQuote => "Calling the company for a price quote...",
        Text::NoSearchResults => "No results found for this search.",
        Text::SearchFailed => "An error occurred while searching. Please try again later.",
        Text::GeoJsonParseError => "Error parsing GeoJSON file. Please make sure it is a valid GeoJSON file.",
        Text::RasterReadError => "Error reading TIF file. Please make sure it is a georeferenced GeoTIFF.",
        Text::UnsupportedFileType => "Unsupported file type. Please upload a GeoJSON or TIF file.",
        Text::DispatchFailed => "Sending the polygon information failed. Please try again.",
    }
}

fn hebrew(key: Text) -> &'static str {
    match key {
        Text::AppTitle => "שירותי הדמיה של רחפן גיאומרחבי",
        Text::UploadTitle => "העלה GeoJSON או TIF",
        Text::ModalTitle => "מידע על הפוליגון",
        Text::Area => "שטח",
        Text::SquareMeters => "מ\"ר",
        Text::Perimeter => "היקף",
        Text::Meters => "מ'",
        Text::NoFlyZones => "איזורי איסור טיסה",
        Text::NoneFound => "אין",
        Text::Coordinates => "קואורדינטות",
        Text::Close => "סגור",
        Text::SendToOperator => "שלח לחברת הרחפנים",
        Text::CallForQuote => "התקשר להצעת מחיר",
        Text::PolygonSent => "מידע על הפוליגון נשלח לחברת הרחפנים!",
        Text::CallingForQuote => "מתקשר לחברה לקבלת הצעת מחיר...",
        Text::NoSearchResults => "לא נמצאו תוצאות עבור החיפוש הזה.",
        Text::SearchFailed => "אירעה שגיאה בעת ביצוע החיפוש. אנא נסה שוב מאוחר יותר.",
        Text::GeoJsonParseError => "שגיאה בניתוח קובץ GeoJSON. אנא ודא שזהו קובץ GeoJSON תקין.",
        Text::RasterReadError => "שגיאה בקריאת קובץ TIF. אנא ודא שזהו קובץ GeoTIFF עם נתוני מיקום.",
        Text::UnsupportedFileType => "סוג קובץ לא נתמך. אנא העלה קובץ GeoJSON או TIF.",
        Text::DispatchFailed => "שליחת המידע על הפוליגון נכשלה. אנא נסה שוב.",
    }
}

/// Whether the language is written right to left.
pub fn is_rtl(language: Language) -> bool {
    matches!(language, Language::Hebrew)
}
