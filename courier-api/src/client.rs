//! HTTP client for the Courier backend REST API.
//!
//! Handles bearer-token authentication, timeout management, TLS
//! certificate handling, exponential backoff retry, and request/response
//! lifecycle.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use courier_core::config::{AppConfig, BackendConfig};
use courier_core::constants;
use courier_core::error::{CourierError, CourierResult};

use crate::response::ErrorResponse;

/// Retry configuration for HTTP requests.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retry attempts.
    pub max_retries: u32,
    /// Base delay between retries (doubles each attempt).
    pub base_delay: Duration,
    /// Maximum delay cap.
    pub max_delay: Duration,
    /// HTTP status codes that trigger a retry.
    pub retryable_statuses: Vec<u16>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(4),
            retryable_statuses: vec![502, 503, 504],
        }
    }
}

/// HTTP client for communicating with the Courier backend.
///
/// Wraps reqwest::Client with bearer-token auth, retry logic, and typed
/// error mapping. The token slot starts empty and is installed after login.
#[derive(Clone)]
pub struct ApiClient {
    inner: Client,
    /// Base URL for the API (e.g. "https://api.courier.example/v1").
    api_root: String,
    /// Default request timeout.
    timeout: Duration,
    /// Bearer access token, installed after login.
    access_token: Arc<RwLock<Option<String>>>,
    /// Retry configuration.
    retry_config: RetryConfig,
}

impl ApiClient {
    /// Create a new ApiClient from backend configuration.
    pub fn new(config: &BackendConfig) -> CourierResult<Self> {
        let sanitized_address = AppConfig::sanitize_backend_address(&config.address);
        if sanitized_address.is_empty() {
            return Err(CourierError::MissingConfig("backend.address".into()));
        }

        let mut builder = Client::builder()
            .timeout(Duration::from_millis(config.api_timeout_ms))
            .connect_timeout(Duration::from_secs(15))
            .pool_max_idle_per_host(5)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(30));

        // Handle self-signed certificates (staging setups)
        if config.accept_self_signed_certs {
            builder = builder.danger_accept_invalid_certs(true);
        }

        let inner = builder
            .build()
            .map_err(|e| CourierError::Http(format!("failed to build HTTP client: {e}")))?;

        let api_root = format!("{sanitized_address}/{}", constants::API_VERSION);

        Ok(Self {
            inner,
            api_root,
            timeout: Duration::from_millis(config.api_timeout_ms),
            access_token: Arc::new(RwLock::new(None)),
            retry_config: RetryConfig::default(),
        })
    }

    /// Set custom retry configuration.
    pub fn with_retry_config(mut self, config: RetryConfig) -> Self {
        self.retry_config = config;
        self
    }

    /// Get the current API root URL.
    pub fn api_root(&self) -> &str {
        &self.api_root
    }

    /// Install (or clear) the bearer access token used for all requests.
    pub async fn set_access_token(&self, token: Option<String>) {
        let mut guard = self.access_token.write().await;
        *guard = token;
        if guard.is_some() {
            debug!("access token installed");
        } else {
            debug!("access token cleared");
        }
    }

    /// Whether an access token is currently installed.
    pub async fn has_access_token(&self) -> bool {
        self.access_token.read().await.is_some()
    }

    /// Build the full URL for an API path.
    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.api_root)
    }

    /// Internal: build a request for the given method, URL, and optional JSON body.
    async fn build_request(
        &self,
        method: Method,
        url: &str,
        body: Option<&serde_json::Value>,
    ) -> RequestBuilder {
        let mut builder = self.inner.request(method, url).timeout(self.timeout);
        if let Some(b) = body {
            builder = builder.json(b);
        }
        let token = self.access_token.read().await;
        if let Some(ref t) = *token {
            builder = builder.bearer_auth(t);
        }
        builder
    }

    /// Execute a request with exponential backoff retry.
    async fn request_with_retry(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> CourierResult<Response> {
        let url = self.url(path);
        debug!("{} {}", method, path);

        let mut last_error: Option<CourierError> = None;

        for attempt in 0..=self.retry_config.max_retries {
            if attempt > 0 {
                let delay = self.calculate_retry_delay(attempt - 1);
                warn!(
                    "retrying {} {} (attempt {}/{}) after {:.1}s",
                    method,
                    path,
                    attempt + 1,
                    self.retry_config.max_retries + 1,
                    delay.as_secs_f64()
                );
                tokio::time::sleep(delay).await;
            }

            let builder = self.build_request(method.clone(), &url, body).await;

            match builder.send().await {
                Ok(response) => {
                    let status = response.status();

                    if self
                        .retry_config
                        .retryable_statuses
                        .contains(&status.as_u16())
                        && attempt < self.retry_config.max_retries
                    {
                        warn!("retryable status {} from {}", status.as_u16(), path);
                        last_error = Some(CourierError::Backend {
                            status: status.as_u16(),
                            label: "gateway-error".into(),
                            message: format!("retryable status {status}"),
                        });
                        continue;
                    }

                    return Self::check_status(response).await;
                }
                Err(e) => {
                    let is_retryable = e.is_timeout() || e.is_connect();
                    let err = Self::classify_error(e);

                    if is_retryable && attempt < self.retry_config.max_retries {
                        warn!("retryable error on {}: {}", path, err);
                        last_error = Some(err);
                        continue;
                    }

                    return Err(err);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| CourierError::Http("max retries exceeded".into())))
    }

    /// Calculate retry delay with exponential backoff.
    fn calculate_retry_delay(&self, attempt: u32) -> Duration {
        let base_ms = self.retry_config.base_delay.as_millis() as u64;
        let delay_ms = base_ms.saturating_mul(1u64 << attempt);
        let max_ms = self.retry_config.max_delay.as_millis() as u64;
        Duration::from_millis(delay_ms.min(max_ms))
    }

    // --- Public HTTP methods ---

    /// Execute a GET request with automatic retry.
    pub async fn get(&self, path: &str) -> CourierResult<Response> {
        self.request_with_retry(Method::GET, path, None).await
    }

    /// Execute a POST request with a JSON body.
    pub async fn post(&self, path: &str, body: &serde_json::Value) -> CourierResult<Response> {
        self.request_with_retry(Method::POST, path, Some(body)).await
    }

    /// Execute a PUT request with a JSON body.
    pub async fn put(&self, path: &str, body: &serde_json::Value) -> CourierResult<Response> {
        self.request_with_retry(Method::PUT, path, Some(body)).await
    }

    /// Execute a DELETE request.
    pub async fn delete(&self, path: &str) -> CourierResult<Response> {
        self.request_with_retry(Method::DELETE, path, None).await
    }

    // --- Response helpers ---

    /// Deserialize a response body into T.
    pub async fn parse_response<T: DeserializeOwned>(response: Response) -> CourierResult<T> {
        response
            .json::<T>()
            .await
            .map_err(|e| CourierError::Serialization(format!("failed to parse response: {e}")))
    }

    /// Convenience: GET + parse into T.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> CourierResult<T> {
        let resp = self.get(path).await?;
        Self::parse_response(resp).await
    }

    /// Convenience: POST + parse into T.
    pub async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> CourierResult<T> {
        let resp = self.post(path, body).await?;
        Self::parse_response(resp).await
    }

    /// Check the HTTP status code and convert to CourierError if needed.
    ///
    /// Error responses carry a JSON body of the form
    /// `{ "code": 403, "label": "invalid-credentials", "message": "..." }`;
    /// the label is preserved so callers can react to specific failures.
    async fn check_status(response: Response) -> CourierResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let parsed: Option<ErrorResponse> = serde_json::from_str(&body).ok();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            let message = parsed
                .map(|e| e.message)
                .unwrap_or_else(|| format!("backend returned {status}"));
            return Err(CourierError::AuthFailed(message));
        }

        match parsed {
            Some(e) => Err(CourierError::Backend {
                status: status.as_u16(),
                label: e.label,
                message: e.message,
            }),
            None => Err(CourierError::Backend {
                status: status.as_u16(),
                label: "unknown".into(),
                message: body,
            }),
        }
    }

    /// Classify a reqwest error into a CourierError variant.
    fn classify_error(e: reqwest::Error) -> CourierError {
        if e.is_timeout() {
            CourierError::Timeout(e.to_string())
        } else if e.is_connect() {
            CourierError::Http(format!("connection failed: {e}"))
        } else {
            CourierError::Http(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ApiClient {
        let config = BackendConfig {
            address: "https://api.courier.example".into(),
            api_timeout_ms: 5_000,
            accept_self_signed_certs: false,
        };
        ApiClient::new(&config).unwrap()
    }

    #[test]
    fn test_api_root_derivation() {
        let c = client();
        assert_eq!(c.api_root(), "https://api.courier.example/v1");
    }

    #[test]
    fn test_missing_address_is_rejected() {
        let config = BackendConfig::default();
        assert!(matches!(
            ApiClient::new(&config),
            Err(CourierError::MissingConfig(_))
        ));
    }

    #[test]
    fn test_retry_delay_backoff() {
        let c = client();
        let d0 = c.calculate_retry_delay(0);
        let d1 = c.calculate_retry_delay(1);
        let d5 = c.calculate_retry_delay(5);
        assert_eq!(d0, Duration::from_secs(1));
        assert_eq!(d1, Duration::from_secs(2));
        // Capped at max_delay
        assert_eq!(d5, Duration::from_secs(4));
    }

    #[tokio::test]
    async fn test_access_token_slot() {
        let c = client();
        assert!(!c.has_access_token().await);
        c.set_access_token(Some("tok".into())).await;
        assert!(c.has_access_token().await);
        c.set_access_token(None).await;
        assert!(!c.has_access_token().await);
    }
}
