//! Classifying uploaded files.

use std::path::Path;

/// How an uploaded file is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// GeoJSON text
    Vector,
    /// GeoTIFF image
    Raster,
}

impl FileKind {
    /// Kind selected by the file's extension, ignoring case.
    pub fn from_name(file_name: &str) -> Option<Self> {
        let ext = Path::new(file_name).extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "geojson" | "json" => Some(Self::Vector),
            "tif" | "tiff" => Some(Self::Raster),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_extensions() {
        assert_eq!(FileKind::from_name("zones.geojson"), Some(FileKind::Vector));
        assert_eq!(FileKind::from_name("field.JSON"), Some(FileKind::Vector));
    }

    #[test]
    fn test_raster_extensions() {
        assert_eq!(FileKind::from_name("ortho.tif"), Some(FileKind::Raster));
        assert_eq!(FileKind::from_name("/data/DEM.TIFF"), Some(FileKind::Raster));
    }

    #[test]
    fn test_unknown_or_missing_extension() {
        assert_eq!(FileKind::from_name("notes.txt"), None);
        assert_eq!(FileKind::from_name("README"), None);
        assert_eq!(FileKind::from_name("archive.tif.zip"), None);
    }
}
