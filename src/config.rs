//! Client configuration
//!
//! [`ClientConfig`] is an explicit, immutable value handed to
//! [`crate::http::Client::new`]. Per-call overrides go through
//! [`crate::http::RequestOptions`] instead of mutating shared state.

use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

/// Default API endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.braintrust.dev";

/// Errors raised while building a client
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("API key is required but was not provided")]
    MissingCredential,

    #[error("Invalid base URL '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidValue { field: String, message: String },

    #[error("Failed to build HTTP transport: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ConfigError {
    /// Create an invalid value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Configuration for the API client
#[derive(Clone)]
pub struct ClientConfig {
    /// Bearer credential
    pub api_key: Option<String>,
    /// Base URL for all requests
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Delay before the first retry; doubles on each subsequent retry
    pub initial_backoff: Duration,
    /// Upper bound for computed backoff delays
    pub max_backoff: Duration,
    /// Default headers for all requests
    pub default_headers: HashMap<String, String>,
    /// User agent string
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(60),
            max_retries: 2,
            initial_backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(60),
            default_headers: HashMap::new(),
            user_agent: format!("evalkit/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientConfig {
    /// Create a new config builder
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Check the config can back a client
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => {}
            _ => return Err(ConfigError::MissingCredential),
        }

        url::Url::parse(&self.base_url).map_err(|source| ConfigError::InvalidBaseUrl {
            url: self.base_url.clone(),
            source,
        })?;

        if self.timeout.is_zero() {
            return Err(ConfigError::invalid_value("timeout", "must be non-zero"));
        }

        Ok(())
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("max_retries", &self.max_retries)
            .field("initial_backoff", &self.initial_backoff)
            .field("max_backoff", &self.max_backoff)
            .field("default_headers", &self.default_headers)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

/// Builder for client config
#[derive(Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Set the API key
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(key.into());
        self
    }

    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set max retries
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.config.max_retries = retries;
        self
    }

    /// Set backoff configuration
    pub fn backoff(mut self, initial: Duration, max: Duration) -> Self {
        self.config.initial_backoff = initial;
        self.config.max_backoff = max;
        self
    }

    /// Add a default header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> ClientConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert!(config.api_key.is_none());
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.max_retries, 2);
        assert_eq!(config.initial_backoff, Duration::from_secs(1));
        assert!(config.user_agent.starts_with("evalkit/"));
    }

    #[test]
    fn test_builder() {
        let config = ClientConfig::builder()
            .api_key("sk-test")
            .base_url("http://localhost:8000")
            .timeout(Duration::from_secs(5))
            .max_retries(4)
            .backoff(Duration::from_millis(10), Duration::from_millis(100))
            .header("X-Org", "acme")
            .user_agent("test-agent/1.0")
            .build();

        assert_eq!(config.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.max_retries, 4);
        assert_eq!(config.initial_backoff, Duration::from_millis(10));
        assert_eq!(config.max_backoff, Duration::from_millis(100));
        assert_eq!(config.default_headers.get("X-Org"), Some(&"acme".to_string()));
        assert_eq!(config.user_agent, "test-agent/1.0");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_missing_credential() {
        let config = ClientConfig::default();
        assert!(matches!(config.validate(), Err(ConfigError::MissingCredential)));

        let config = ClientConfig::builder().api_key("   ").build();
        assert!(matches!(config.validate(), Err(ConfigError::MissingCredential)));
    }

    #[test]
    fn test_validate_bad_base_url() {
        let config = ClientConfig::builder()
            .api_key("sk-test")
            .base_url("not a url")
            .build();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));
    }

    #[test]
    fn test_validate_zero_timeout() {
        let config = ClientConfig::builder()
            .api_key("sk-test")
            .timeout(Duration::ZERO)
            .build();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = ClientConfig::builder().api_key("sk-secret").build();
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("<redacted>"));
    }
}
