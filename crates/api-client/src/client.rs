//! Main API client implementation

use crate::config::ClientConfig;
use crate::endpoints::{DispatchApi, SearchApi};
use crate::error::{ApiError, ApiResult};
use dronemap_core::rate_limit::RateLimiter;
use dronemap_core::retry::{CircuitBreaker, CircuitBreakerConfig, CircuitState};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{Client, Method, Response, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

/// Request correlation ID header
const X_REQUEST_ID: &str = "X-Request-ID";

/// dronemap HTTP client with built-in resilience patterns
///
/// This client wraps `reqwest` and adds:
/// - Automatic retry with exponential backoff
/// - Circuit breaker to stop calling a service that keeps failing
/// - Rate limiting that waits for a free slot
/// - Request correlation IDs for tracing
#[derive(Clone)]
pub struct DronemapClient {
    inner: Client,
    config: Arc<ClientConfig>,
    circuit_breaker: Arc<CircuitBreaker>,
    rate_limiter: Arc<RateLimiter>,
}

impl DronemapClient {
    /// Create a new client with default configuration from environment
    pub fn new() -> ApiResult<Self> {
        let config = ClientConfig::from_env()?;
        Self::with_config(config)
    }

    /// Create a new client with specific configuration
    pub fn with_config(config: ClientConfig) -> ApiResult<Self> {
        config.validate()?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let agent = HeaderValue::from_str(&config.user_agent)
            .map_err(|_| ApiError::config("user_agent contains characters not allowed in a header"))?;
        default_headers.insert(USER_AGENT, agent);

        let inner = Client::builder()
            .timeout(config.timeout)
            .default_headers(default_headers)
            .build()
            .map_err(ApiError::Request)?;

        let circuit_breaker = Arc::new(CircuitBreaker::new(CircuitBreakerConfig::default()));
        let rate_limiter = Arc::new(RateLimiter::new(config.rate_limit.clone()));

        Ok(Self {
            inner,
            config: Arc::new(config),
            circuit_breaker,
            rate_limiter,
        })
    }

    /// Get the current configuration
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Get circuit breaker state
    #[must_use]
    pub fn circuit_state(&self) -> CircuitState {
        self.circuit_breaker.state()
    }

    /// Reset the circuit breaker
    pub fn reset_circuit(&self) {
        self.circuit_breaker.reset();
    }

    // -------------------------------------------------------------------------
    // Endpoint API accessors
    // -------------------------------------------------------------------------

    /// Access the geocoding search endpoint
    #[must_use]
    pub fn search(&self) -> SearchApi {
        SearchApi::new(self.clone())
    }

    /// Access the polygon dispatch endpoint
    #[must_use]
    pub fn dispatch(&self) -> DispatchApi {
        DispatchApi::new(self.clone())
    }

    // -------------------------------------------------------------------------
    // Low-level HTTP methods with resilience
    // -------------------------------------------------------------------------

    /// Perform a GET request to an absolute URL and decode the JSON body
    #[instrument(skip(self), fields(request_id))]
    pub async fn get_url<T: DeserializeOwned>(&self, url: &str) -> ApiResult<T> {
        let response = self.request_url(Method::GET, url, Option::<&()>::None).await?;
        response.json().await.map_err(ApiError::Request)
    }

    /// POST a JSON body and return the response status
    #[instrument(skip(self, body), fields(request_id))]
    pub async fn post_json<B: Serialize>(&self, url: &str, body: &B) -> ApiResult<u16> {
        let response = self.request_url(Method::POST, url, Some(body)).await?;
        Ok(response.status().as_u16())
    }

    /// Execute a request to an absolute URL with full resilience patterns
    async fn request_url<B: Serialize>(
        &self,
        method: Method,
        url: &str,
        body: Option<&B>,
    ) -> ApiResult<Response> {
        let request_id = Uuid::new_v4().to_string();
        tracing::Span::current().record("request_id", request_id.as_str());
        let rate_limit_key = extract_rate_limit_key(url);

        // Check circuit breaker
        if !self.circuit_breaker.can_execute() {
            warn!(
                request_id = %request_id,
                url = %url,
                "Circuit breaker is open, rejecting request"
            );
            return Err(ApiError::CircuitOpen);
        }

        // Wait for a rate limit slot
        let wait = self.rate_limiter.reserve(&rate_limit_key);
        if !wait.is_zero() {
            debug!(
                request_id = %request_id,
                key = %rate_limit_key,
                wait_ms = wait.as_millis(),
                "Rate limited, waiting for a slot"
            );
            tokio::time::sleep(wait).await;
        }

        self.execute_with_retry(&request_id, method, url, body).await
    }

    /// Execute request with retry logic
    async fn execute_with_retry<B: Serialize>(
        &self,
        request_id: &str,
        method: Method,
        url: &str,
        body: Option<&B>,
    ) -> ApiResult<Response> {
        let retry_config = &self.config.retry;
        let mut last_error: Option<ApiError> = None;

        for attempt in 0..retry_config.max_attempts {
            // Wait before retry (except first attempt)
            if attempt > 0 {
                let delay = retry_config.delay_for_attempt(attempt);
                debug!(
                    request_id = %request_id,
                    attempt = attempt,
                    delay_ms = delay.as_millis(),
                    "Retrying after delay"
                );
                tokio::time::sleep(delay).await;
            }

            let start = Instant::now();
            let result = self
                .execute_single_request(request_id, method.clone(), url, body)
                .await;
            let elapsed = start.elapsed();

            match result {
                Ok(response) => {
                    self.circuit_breaker.record_success();
                    debug!(
                        request_id = %request_id,
                        attempt = attempt + 1,
                        elapsed_ms = elapsed.as_millis(),
                        "Request succeeded"
                    );
                    return Ok(response);
                }
                Err(e) => {
                    self.circuit_breaker.record_failure();

                    if e.is_retryable() && attempt + 1 < retry_config.max_attempts {
                        debug!(
                            request_id = %request_id,
                            attempt = attempt + 1,
                            error = %e,
                            "Request failed, will retry"
                        );
                        last_error = Some(e);
                    } else {
                        debug!(
                            request_id = %request_id,
                            attempt = attempt + 1,
                            error = %e,
                            "Request failed, not retrying"
                        );
                        return Err(e);
                    }
                }
            }
        }

        Err(ApiError::RetriesExhausted {
            attempts: retry_config.max_attempts,
            last_error: last_error.map_or_else(|| "Unknown error".to_string(), |e| e.to_string()),
        })
    }

    /// Execute a single request without retry
    async fn execute_single_request<B: Serialize>(
        &self,
        request_id: &str,
        method: Method,
        url: &str,
        body: Option<&B>,
    ) -> ApiResult<Response> {
        let mut request = self
            .inner
            .request(method, url)
            .header(X_REQUEST_ID, request_id);

        if let Some(b) = body {
            request = request.json(b);
        }

        let response = request.send().await?;
        Self::check_status(response).await
    }

    /// Turn non-2xx responses into errors
    async fn check_status(response: Response) -> ApiResult<Response> {
        let status = response.status();

        if status.is_success() {
            Ok(response)
        } else {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            Err(ApiError::api_response(status.as_u16(), message))
        }
    }
}

/// Rate limit key for a URL: its host and port, so each service gets its own bucket
fn extract_rate_limit_key(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| {
            u.host_str().map(|h| match u.port() {
                Some(p) => format!("{h}:{p}"),
                None => h.to_string(),
            })
        })
        .unwrap_or_else(|| "default".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dronemap_core::rate_limit::RateLimitConfig;
    use dronemap_core::retry::RetryConfig;
    use wiremock::matchers::{header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(url: &str) -> ClientConfig {
        ClientConfig::default()
            .with_geocoder_url(url)
            .with_retry(RetryConfig::no_retry())
            .with_rate_limit(RateLimitConfig::per_second(100))
    }

    #[test]
    fn test_extract_rate_limit_key() {
        assert_eq!(
            extract_rate_limit_key("https://nominatim.openstreetmap.org/search?q=x"),
            "nominatim.openstreetmap.org"
        );
        assert_eq!(extract_rate_limit_key("http://localhost:8080/health"), "localhost:8080");
        assert_eq!(extract_rate_limit_key("not a url"), "default");
    }

    #[test]
    fn test_client_creation() {
        assert!(DronemapClient::with_config(ClientConfig::default()).is_ok());
        assert!(DronemapClient::with_config(ClientConfig::default().with_geocoder_url("")).is_err());
    }

    #[tokio::test]
    async fn test_get_sends_headers_and_decodes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/status"))
            .and(header_exists(X_REQUEST_ID))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;
        let client = DronemapClient::with_config(test_config(&server.uri())).unwrap();

        let value: serde_json::Value = client.get_url(&format!("{}/status", server.uri())).await.unwrap();
        assert_eq!(value["ok"], true);

        let requests = server.received_requests().await.unwrap();
        let user_agent = requests[0].headers.get("user-agent").unwrap().to_str().unwrap();
        assert!(user_agent.starts_with("dronemap/"));
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({"error": "nope"})))
            .mount(&server)
            .await;
        let client = DronemapClient::with_config(test_config(&server.uri())).unwrap();

        let err = client
            .get_url::<serde_json::Value>(&format!("{}/missing", server.uri()))
            .await
            .unwrap_err();
        assert!(err.is_client_error());
        assert_eq!(client.circuit_state(), CircuitState::Closed);
    }

    #[tokio::test]
    async fn test_circuit_opens_after_repeated_failures() {
        // Nothing listens on this port once the listener is dropped
        let addr = std::net::TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap();
        let client = DronemapClient::with_config(test_config(&format!("http://{addr}"))).unwrap();

        for _ in 0..5 {
            let err = client.get_url::<serde_json::Value>(&format!("http://{addr}/x")).await.unwrap_err();
            assert!(err.is_retryable());
        }
        assert_eq!(client.circuit_state(), CircuitState::Open);
        assert!(matches!(
            client.get_url::<serde_json::Value>(&format!("http://{addr}/x")).await,
            Err(ApiError::CircuitOpen)
        ));

        client.reset_circuit();
        assert_eq!(client.circuit_state(), CircuitState::Closed);
    }
}
