//! Configuration for the API client
//!
//! Defaults come from the `[geocoder]` and `[dispatch]` config sections;
//! environment variables override them.

use crate::error::{ApiError, ApiResult};
use dronemap_core::config::ConfigSchema;
use dronemap_core::rate_limit::RateLimitConfig;
use dronemap_core::retry::RetryConfig;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Public Nominatim instance
const DEFAULT_GEOCODER_URL: &str = "https://nominatim.openstreetmap.org";

/// Client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of a Nominatim-compatible geocoder
    pub geocoder_url: String,
    /// Endpoint receiving drawn polygons; `None` logs them instead
    pub operator_url: Option<String>,
    /// User agent sent with every request
    pub user_agent: String,
    /// Request timeout
    #[serde(with = "duration_secs")]
    pub timeout: Duration,
    /// Retry configuration
    pub retry: RetryConfig,
    /// Rate limit configuration, per endpoint host
    pub rate_limit: RateLimitConfig,
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            geocoder_url: DEFAULT_GEOCODER_URL.to_string(),
            operator_url: None,
            user_agent: format!("dronemap/{}", env!("CARGO_PKG_VERSION")),
            timeout: Duration::from_secs(15),
            retry: RetryConfig::interactive(),
            // Nominatim usage policy: at most one request per second
            rate_limit: RateLimitConfig {
                max_requests: 1,
                window: Duration::from_secs(1),
                burst: 0,
            },
        }
    }
}

impl ClientConfig {
    /// Create configuration from environment variables
    ///
    /// Reads the following environment variables:
    /// - `DRONEMAP_GEOCODER_URL`: Base URL of the geocoder
    /// - `DRONEMAP_OPERATOR_URL`: Endpoint receiving drawn polygons
    /// - `DRONEMAP_TIMEOUT_SECS`: Request timeout in seconds
    /// - `DRONEMAP_USER_AGENT`: User agent header
    pub fn from_env() -> ApiResult<Self> {
        Self::default().with_env_overrides()
    }

    /// Configuration from a loaded config file, without environment overrides
    #[must_use]
    pub fn from_schema(schema: &ConfigSchema) -> Self {
        Self {
            geocoder_url: schema.geocoder.base_url.clone(),
            operator_url: schema.dispatch.operator_url.clone(),
            user_agent: schema.geocoder.user_agent.clone(),
            timeout: Duration::from_secs(schema.geocoder.timeout_secs),
            ..Self::default()
        }
    }

    /// Apply `DRONEMAP_*` environment variables on top of this configuration
    pub fn with_env_overrides(mut self) -> ApiResult<Self> {
        if let Ok(url) = env::var("DRONEMAP_GEOCODER_URL") {
            self.geocoder_url = url;
        }
        if let Ok(url) = env::var("DRONEMAP_OPERATOR_URL") {
            self.operator_url = Some(url).filter(|u| !u.is_empty());
        }
        if let Ok(agent) = env::var("DRONEMAP_USER_AGENT") {
            self.user_agent = agent;
        }
        if let Ok(secs) = env::var("DRONEMAP_TIMEOUT_SECS") {
            let secs: u64 = secs
                .parse()
                .map_err(|_| ApiError::config(format!("DRONEMAP_TIMEOUT_SECS is not a number: {secs}")))?;
            self.timeout = Duration::from_secs(secs);
        }
        Ok(self)
    }

    /// Builder-style method to set the geocoder URL
    #[must_use]
    pub fn with_geocoder_url(mut self, url: impl Into<String>) -> Self {
        self.geocoder_url = url.into();
        self
    }

    /// Builder-style method to set the operator URL
    #[must_use]
    pub fn with_operator_url(mut self, url: impl Into<String>) -> Self {
        self.operator_url = Some(url.into());
        self
    }

    /// Builder-style method to set the user agent
    #[must_use]
    pub fn with_user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    /// Builder-style method to set timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builder-style method to set retry config
    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Builder-style method to set rate limit config
    #[must_use]
    pub fn with_rate_limit(mut self, rate_limit: RateLimitConfig) -> Self {
        self.rate_limit = rate_limit;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> ApiResult<()> {
        check_url("geocoder_url", &self.geocoder_url)?;
        if let Some(url) = &self.operator_url {
            check_url("operator_url", url)?;
        }

        if self.user_agent.trim().is_empty() {
            return Err(ApiError::config("user_agent cannot be empty"));
        }

        if self.timeout.is_zero() {
            return Err(ApiError::config("timeout cannot be zero"));
        }

        Ok(())
    }
}

fn check_url(field: &str, url: &str) -> ApiResult<()> {
    if url.is_empty() {
        return Err(ApiError::config(format!("{field} cannot be empty")));
    }
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ApiError::config(format!("{field} must start with http:// or https://")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.geocoder_url, "https://nominatim.openstreetmap.org");
        assert!(config.operator_url.is_none());
        assert!(config.user_agent.starts_with("dronemap/"));
        assert_eq!(config.rate_limit.capacity(), 1);
    }

    #[test]
    fn test_from_schema() {
        let mut schema = ConfigSchema::default();
        schema.geocoder.timeout_secs = 5;
        schema.dispatch.operator_url = Some("https://ops.example.com/polygons".to_string());

        let config = ClientConfig::from_schema(&schema);
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.operator_url.as_deref(), Some("https://ops.example.com/polygons"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = ClientConfig::default()
            .with_geocoder_url("http://localhost:8080")
            .with_timeout(Duration::from_secs(60));

        assert_eq!(config.geocoder_url, "http://localhost:8080");
        assert_eq!(config.timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_validation() {
        assert!(ClientConfig::default().validate().is_ok());
        assert!(ClientConfig::default().with_geocoder_url("").validate().is_err());
        assert!(ClientConfig::default().with_geocoder_url("ftp://x").validate().is_err());
        assert!(ClientConfig::default().with_operator_url("nope").validate().is_err());
        assert!(ClientConfig::default().with_timeout(Duration::ZERO).validate().is_err());
        assert!(ClientConfig::default().with_user_agent(" ").validate().is_err());
    }
}
