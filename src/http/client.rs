//! HTTP client with typed errors and retry
//!
//! Provides the execution core every resource call goes through:
//! - Authenticated JSON requests against the configured base URL
//! - Classification of every outcome into `Result<Value, Error>`
//! - Automatic retries with exponential backoff, honouring `Retry-After`

use super::classify;
use super::retry::{decide, RetryPolicy, Sleeper, TokioSleeper};
use crate::config::{ClientConfig, ConfigError};
use crate::error::Result;
use crate::types::Method;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Per-call request options
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Query parameters
    pub query: HashMap<String, String>,
    /// Request headers
    pub headers: HashMap<String, String>,
    /// Request body (JSON)
    pub body: Option<Value>,
    /// Override the API key for this request
    pub api_key: Option<String>,
    /// Override the base URL for this request
    pub base_url: Option<String>,
    /// Override timeout for this request
    pub timeout: Option<Duration>,
    /// Override max retries for this request
    pub max_retries: Option<u32>,
}

impl RequestOptions {
    /// Create empty request options
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a query parameter
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// Add a header
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Set JSON body
    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Use a different API key for this request
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Use a different base URL for this request
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set timeout
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set max retries
    #[must_use]
    pub fn retries(mut self, retries: u32) -> Self {
        self.max_retries = Some(retries);
        self
    }
}

/// API client
///
/// Cheap to clone; clones share the connection pool and configuration.
/// No call mutates shared state, so one client can serve many concurrent
/// requests and pagination streams.
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    config: Arc<ClientConfig>,
    sleeper: Arc<dyn Sleeper>,
}

impl Client {
    /// Create a client, failing if the config has no usable credential
    pub fn new(config: ClientConfig) -> std::result::Result<Self, ConfigError> {
        config.validate()?;

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self {
            http,
            config: Arc::new(config),
            sleeper: Arc::new(TokioSleeper),
        })
    }

    /// Replace the sleeper used between retries
    #[must_use]
    pub fn with_sleeper(mut self, sleeper: impl Sleeper + 'static) -> Self {
        self.sleeper = Arc::new(sleeper);
        self
    }

    /// Get the client configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Make a request with an optional JSON body
    pub async fn request(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value> {
        let mut options = RequestOptions::default();
        options.body = body;
        self.execute(method, path, options).await
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> Result<Value> {
        self.execute(Method::GET, path, RequestOptions::default())
            .await
    }

    /// Make a GET request with options
    pub async fn get_with(&self, path: &str, options: RequestOptions) -> Result<Value> {
        self.execute(Method::GET, path, options).await
    }

    /// Make a POST request
    pub async fn post(&self, path: &str, body: Value) -> Result<Value> {
        self.execute(Method::POST, path, RequestOptions::default().json(body))
            .await
    }

    /// Make a PATCH request
    pub async fn patch(&self, path: &str, body: Value) -> Result<Value> {
        self.execute(Method::PATCH, path, RequestOptions::default().json(body))
            .await
    }

    /// Make a DELETE request
    pub async fn delete(&self, path: &str) -> Result<Value> {
        self.execute(Method::DELETE, path, RequestOptions::default())
            .await
    }

    /// Execute a request, retrying transient failures
    ///
    /// Once the retry budget is spent the last classified error is returned
    /// unchanged.
    pub async fn execute(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> Result<Value> {
        let policy = self.retry_policy(&options);
        let mut attempt = 0;

        loop {
            match self.send_once(method, path, &options).await {
                Ok(body) => {
                    debug!("Request succeeded: {} {}", method, path);
                    return Ok(body);
                }
                Err(err) => {
                    let decision = decide(&err);
                    let Some(delay) = policy.next_delay(decision, attempt) else {
                        if decision.should_retry() {
                            warn!(
                                "Request {} {} failed after {} attempts: {}",
                                method,
                                path,
                                attempt + 1,
                                err
                            );
                        }
                        return Err(err);
                    };

                    warn!(
                        "Request {} {} failed with {}, attempt {}/{}, retrying in {:?}",
                        method,
                        path,
                        err.kind(),
                        attempt + 1,
                        policy.max_retries + 1,
                        delay
                    );
                    self.sleeper.sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }

    /// Perform a single attempt and classify its outcome
    async fn send_once(
        &self,
        method: Method,
        path: &str,
        options: &RequestOptions,
    ) -> Result<Value> {
        let base_url = options.base_url.as_deref().unwrap_or(&self.config.base_url);
        let url = build_url(base_url, path);
        let api_key = options
            .api_key
            .as_deref()
            .or(self.config.api_key.as_deref())
            .unwrap_or_default();
        let timeout = options.timeout.unwrap_or(self.config.timeout);

        let mut req = self
            .http
            .request(method.into(), &url)
            .bearer_auth(api_key)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .timeout(timeout);

        for (key, value) in &self.config.default_headers {
            req = req.header(key.as_str(), value.as_str());
        }

        for (key, value) in &options.headers {
            req = req.header(key.as_str(), value.as_str());
        }

        if !options.query.is_empty() {
            req = req.query(&options.query);
        }

        // GET and DELETE never carry a body
        if let Some(body) = options.body.as_ref().filter(|_| method.has_body()) {
            req = req.json(body);
        }

        let response = req.send().await.map_err(|e| classify::from_transport(&e))?;
        let status = response.status();
        let headers = response.headers().clone();
        let text = response
            .text()
            .await
            .map_err(|e| classify::from_transport(&e))?;
        let body = classify::decode_body(&text);

        if status.is_success() {
            Ok(body)
        } else {
            Err(classify::from_response(status.as_u16(), &headers, &body))
        }
    }

    fn retry_policy(&self, options: &RequestOptions) -> RetryPolicy {
        RetryPolicy {
            max_retries: options.max_retries.unwrap_or(self.config.max_retries),
            initial_backoff: self.config.initial_backoff,
            max_backoff: self.config.max_backoff,
        }
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Join a base URL and a path; absolute URLs pass through
fn build_url(base: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }

    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    format!("{base}/{path}")
}
