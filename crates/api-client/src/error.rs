//! Error types for the API client

use thiserror::Error;

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// API client errors
#[derive(Error, Debug)]
pub enum ApiError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Service returned an error response
    #[error("API error ({status}): {message}")]
    ApiResponse {
        /// HTTP status code
        status: u16,
        /// Error message from the service
        message: String,
    },

    /// Response body did not have the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Circuit breaker is open
    #[error("Circuit breaker is open - service temporarily unavailable")]
    CircuitOpen,

    /// All retry attempts exhausted
    #[error("All {attempts} retry attempts failed: {last_error}")]
    RetriesExhausted {
        /// Number of attempts made
        attempts: u32,
        /// Last error message
        last_error: String,
    },

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an API response error
    pub fn api_response(status: u16, message: impl Into<String>) -> Self {
        Self::ApiResponse {
            status,
            message: message.into(),
        }
    }

    /// Check if this error is retryable
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Request(e) => e.is_connect() || e.is_timeout(),
            Self::ApiResponse { status, .. } => *status >= 500 || *status == 429,
            Self::CircuitOpen
            | Self::Config(_)
            | Self::Json(_)
            | Self::InvalidResponse(_)
            | Self::InvalidUrl(_)
            | Self::RetriesExhausted { .. } => false,
        }
    }

    /// Check if this is a client error (4xx)
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::ApiResponse { status, .. } if (400..500).contains(status))
    }

    /// Check if this is a server error (5xx)
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::ApiResponse { status, .. } if *status >= 500)
    }
}

impl From<ApiError> for dronemap_core::Error {
    fn from(err: ApiError) -> Self {
        let suggestion = match &err {
            ApiError::CircuitOpen | ApiError::RetriesExhausted { .. } => {
                Some("The service looks unavailable; try again in a minute")
            }
            ApiError::Config(_) | ApiError::InvalidUrl(_) => {
                Some("Check DRONEMAP_GEOCODER_URL / DRONEMAP_OPERATOR_URL and the [geocoder] config section")
            }
            _ => None,
        };
        let converted = dronemap_core::Error::network(err.to_string());
        match suggestion {
            Some(s) => converted.with_suggestion(s),
            None => converted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        let server = ApiError::api_response(503, "down");
        assert!(server.is_retryable());
        assert!(server.is_server_error());
        assert!(!server.is_client_error());

        let throttled = ApiError::api_response(429, "slow down");
        assert!(throttled.is_retryable());
        assert!(throttled.is_client_error());

        let not_found = ApiError::api_response(404, "missing");
        assert!(!not_found.is_retryable());
    }

    #[test]
    fn test_non_transport_errors_not_retryable() {
        assert!(!ApiError::CircuitOpen.is_retryable());
        assert!(!ApiError::config("x").is_retryable());
        assert!(!ApiError::InvalidResponse("x".into()).is_retryable());
    }

    #[test]
    fn test_conversion_to_core_error() {
        let core: dronemap_core::Error = ApiError::CircuitOpen.into();
        assert_eq!(core.code, dronemap_core::ErrorCode::NetworkError);
        assert!(core.suggestion.is_some());
    }
}
