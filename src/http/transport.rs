//! The transport collaborator
//!
//! Executes exactly one request per call and classifies every non-2xx
//! response. Interceptors are ordered sequences of pure transforms applied
//! to the outgoing request parts and the parsed response body; there is no
//! global registry and no hidden cache.

use crate::error::{Error, Result};
use reqwest::{Client, Method, Response};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Default production endpoint
pub const DEFAULT_BASE_URL: &str = "https://creeble.io";

/// Configuration for the transport
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// API key sent as `X-API-Key` on every request
    pub api_key: String,
    /// Base URL; the `/api` prefix is appended per request
    pub base_url: String,
    /// Per-request deadline
    pub timeout: Duration,
    /// User agent string
    pub user_agent: String,
    /// Headers added to every request
    pub default_headers: HashMap<String, String>,
}

impl TransportConfig {
    /// Create a config with the given API key and defaults for the rest
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            user_agent: format!("creeble-rs/{}", env!("CARGO_PKG_VERSION")),
            default_headers: HashMap::new(),
        }
    }

    /// Create a config builder
    pub fn builder(api_key: impl Into<String>) -> TransportConfigBuilder {
        TransportConfigBuilder {
            config: Self::new(api_key),
        }
    }
}

/// Builder for [`TransportConfig`]
#[derive(Debug)]
pub struct TransportConfigBuilder {
    config: TransportConfig,
}

impl TransportConfigBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Set the per-request deadline
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Add a default header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    pub fn build(self) -> TransportConfig {
        self.config
    }
}

/// Mutable view of an outgoing request, handed through request interceptors
#[derive(Debug, Clone, Default)]
pub struct RequestParts {
    pub headers: HashMap<String, String>,
    pub params: Vec<(String, String)>,
}

/// Pure transform applied to the outgoing request parts, in insertion order
pub type RequestInterceptor = Arc<dyn Fn(RequestParts) -> RequestParts + Send + Sync>;

/// Pure transform applied to the parsed response body, in insertion order
pub type ResponseInterceptor = Arc<dyn Fn(Value) -> Value + Send + Sync>;

/// HTTP transport for the Creeble API
pub struct Transport {
    client: Client,
    config: TransportConfig,
    request_interceptors: Vec<RequestInterceptor>,
    response_interceptors: Vec<ResponseInterceptor>,
}

impl Transport {
    /// Create a transport from a config
    pub fn new(config: TransportConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(Error::config("API key is required"));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self {
            client,
            config,
            request_interceptors: Vec::new(),
            response_interceptors: Vec::new(),
        })
    }

    /// Append a request interceptor
    pub fn add_request_interceptor(&mut self, interceptor: RequestInterceptor) {
        self.request_interceptors.push(interceptor);
    }

    /// Append a response interceptor
    pub fn add_response_interceptor(&mut self, interceptor: ResponseInterceptor) {
        self.response_interceptors.push(interceptor);
    }

    /// The configured per-request deadline
    pub fn timeout(&self) -> Duration {
        self.config.timeout
    }

    /// Make a GET request
    pub async fn get(&self, path: &str, params: &[(String, String)]) -> Result<Value> {
        self.request(Method::GET, path, params, None).await
    }

    /// Make a POST request with a JSON body
    pub async fn post(&self, path: &str, body: &Value) -> Result<Value> {
        self.request(Method::POST, path, &[], Some(body)).await
    }

    /// Make a PUT request with a JSON body
    pub async fn put(&self, path: &str, body: &Value) -> Result<Value> {
        self.request(Method::PUT, path, &[], Some(body)).await
    }

    /// Make a DELETE request
    pub async fn delete(&self, path: &str) -> Result<Value> {
        self.request(Method::DELETE, path, &[], None).await
    }

    /// Execute one bounded exchange
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        params: &[(String, String)],
        body: Option<&Value>,
    ) -> Result<Value> {
        let url = self.build_url(path);

        let mut parts = RequestParts {
            headers: self.config.default_headers.clone(),
            params: params.to_vec(),
        };
        for interceptor in &self.request_interceptors {
            parts = interceptor(parts);
        }

        let mut req = self
            .client
            .request(method.clone(), &url)
            .header("Accept", "application/json")
            .header("X-API-Key", &self.config.api_key)
            .timeout(self.config.timeout);

        for (key, value) in &parts.headers {
            req = req.header(key.as_str(), value.as_str());
        }
        if !parts.params.is_empty() {
            req = req.query(&parts.params);
        }
        if let Some(body) = body {
            req = req.json(body);
        }

        let response = req.send().await.map_err(|e| {
            if e.is_timeout() {
                Error::Timeout {
                    timeout_ms: self.config.timeout.as_millis() as u64,
                }
            } else {
                Error::Http(e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(classify_error(response).await);
        }

        debug!(%method, url, status = status.as_u16(), "request succeeded");

        let mut value = parse_body(response).await?;
        for interceptor in &self.response_interceptors {
            value = interceptor(value);
        }
        Ok(value)
    }

    fn build_url(&self, path: &str) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{base}/api/{path}")
    }
}

impl std::fmt::Debug for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transport")
            .field("base_url", &self.config.base_url)
            .field("timeout", &self.config.timeout)
            .field("request_interceptors", &self.request_interceptors.len())
            .field("response_interceptors", &self.response_interceptors.len())
            .finish_non_exhaustive()
    }
}

/// Parse a successful response body
///
/// JSON bodies parse to a `Value`; anything else comes back as a string.
async fn parse_body(response: Response) -> Result<Value> {
    let is_json = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.contains("application/json"));

    let text = response.text().await?;
    if is_json {
        Ok(serde_json::from_str(&text)?)
    } else {
        Ok(Value::String(text))
    }
}

/// Classify a non-2xx response into the error taxonomy
async fn classify_error(response: Response) -> Error {
    let status = response.status();
    let retry_after = extract_retry_after(&response);

    let body: Value = response
        .text()
        .await
        .ok()
        .and_then(|text| serde_json::from_str(&text).ok())
        .unwrap_or(Value::Null);

    let message = body
        .get("message")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_string()
        });

    match status.as_u16() {
        401 => Error::Unauthorized { message },
        422 => Error::Validation {
            message,
            errors: extract_validation_errors(&body),
        },
        429 => Error::RateLimited {
            message,
            retry_after_seconds: retry_after,
        },
        status @ 500..=599 => Error::Server { status, message },
        status => Error::Api { status, message },
    }
}

/// Pull the `errors` field->messages map out of a 422 body
fn extract_validation_errors(body: &Value) -> HashMap<String, Vec<String>> {
    let mut errors = HashMap::new();
    if let Some(map) = body.get("errors").and_then(Value::as_object) {
        for (field, messages) in map {
            let messages = match messages {
                Value::Array(list) => list
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect(),
                Value::String(s) => vec![s.clone()],
                _ => Vec::new(),
            };
            errors.insert(field.clone(), messages);
        }
    }
    errors
}

/// Extract the Retry-After header as seconds
fn extract_retry_after(response: &Response) -> u64 {
    response
        .headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse().ok())
        .unwrap_or(0)
}
