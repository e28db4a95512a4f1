//! Drone operator dispatch endpoint

use crate::client::DronemapClient;
use crate::error::ApiResult;
use serde::Serialize;
use tracing::info;

/// What happened to a dispatched payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DispatchOutcome {
    /// The operator endpoint accepted it
    Delivered {
        /// HTTP status returned by the endpoint
        status: u16,
    },
    /// No endpoint is configured; the payload was written to the log
    Logged,
}

/// Dispatch API interface
#[derive(Clone)]
pub struct DispatchApi {
    client: DronemapClient,
}

impl DispatchApi {
    /// Create a new dispatch API interface
    pub(crate) fn new(client: DronemapClient) -> Self {
        Self { client }
    }

    /// Whether an operator endpoint is configured
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.client.config().operator_url.is_some()
    }

    /// Send a payload to the drone operator
    pub async fn send<B: Serialize>(&self, body: &B) -> ApiResult<DispatchOutcome> {
        match &self.client.config().operator_url {
            Some(url) => {
                let status = self.client.post_json(url, body).await?;
                info!(url = %url, status, "Polygon information delivered");
                Ok(DispatchOutcome::Delivered { status })
            }
            None => {
                let payload = serde_json::to_string(body)?;
                info!(payload = %payload, "Polygon information sent (no operator endpoint configured)");
                Ok(DispatchOutcome::Logged)
            }
        }
    }
}
