//! HTTP client for the services dronemap talks to
//!
//! This crate provides a resilient HTTP client for the geocoding service used
//! by the search box and for the endpoint that receives drawn polygons.
//!
//! # Features
//!
//! - **Environment-based configuration**: Load URLs from environment variables
//! - **Retry with exponential backoff**: Automatic retry for transient failures
//! - **Circuit breaker**: Stop hammering a service that is down
//! - **Rate limiting**: Wait for a token instead of exceeding the geocoder's usage policy
//! - **Request correlation**: Track requests with unique IDs for debugging
//!
//! # Example
//!
//! ```rust,no_run
//! use dronemap_api_client::{DronemapClient, ClientConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = DronemapClient::new()?;
//!
//!     if let Some(place) = client.search().first("Jerusalem").await? {
//!         println!("{} at {}, {}", place.display_name, place.lat, place.lon);
//!     }
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;

pub use client::DronemapClient;
pub use config::ClientConfig;
pub use endpoints::{DispatchApi, DispatchOutcome, Place, SearchApi};
pub use error::{ApiError, ApiResult};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::client::DronemapClient;
    pub use crate::config::ClientConfig;
    pub use crate::endpoints::{DispatchApi, DispatchOutcome, Place, SearchApi};
    pub use crate::error::{ApiError, ApiResult};
}
