//! Geocoding search endpoint

use crate::client::DronemapClient;
use crate::error::{ApiError, ApiResult};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Geocoding search API interface
#[derive(Clone)]
pub struct SearchApi {
    client: DronemapClient,
}

impl SearchApi {
    /// Create a new search API interface
    pub(crate) fn new(client: DronemapClient) -> Self {
        Self { client }
    }

    /// URL of a search request, with the query encoded
    pub fn search_url(&self, query: &str) -> ApiResult<Url> {
        let base = format!("{}/search", self.client.config().geocoder_url.trim_end_matches('/'));
        Url::parse_with_params(&base, &[("format", "json"), ("q", query)])
            .map_err(|e| ApiError::InvalidUrl(format!("{base}: {e}")))
    }

    /// All places matching a free-text query, best match first
    pub async fn search(&self, query: &str) -> ApiResult<Vec<Place>> {
        let url = self.search_url(query)?;
        let raw: Vec<RawPlace> = self.client.get_url(url.as_str()).await?;
        let places = raw.into_iter().map(Place::try_from).collect::<ApiResult<Vec<_>>>()?;
        debug!(query = %query, results = places.len(), "Geocoding search finished");
        Ok(places)
    }

    /// Best match for a query, if any
    pub async fn first(&self, query: &str) -> ApiResult<Option<Place>> {
        Ok(self.search(query).await?.into_iter().next())
    }
}

/// A geocoded place
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lon: f64,
    /// Full human-readable name
    pub display_name: String,
}

/// Nominatim sends coordinates as strings
#[derive(Debug, Deserialize)]
struct RawPlace {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: String,
}

impl TryFrom<RawPlace> for Place {
    type Error = ApiError;

    fn try_from(raw: RawPlace) -> ApiResult<Self> {
        let parse = |field: &str, value: &str| {
            value
                .trim()
                .parse::<f64>()
                .map_err(|_| ApiError::InvalidResponse(format!("{field} is not a number: {value:?}")))
        };
        Ok(Self {
            lat: parse("lat", &raw.lat)?,
            lon: parse("lon", &raw.lon)?,
            display_name: raw.display_name,
        })
    }
}
