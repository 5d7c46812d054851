//! Configuration Builder
//!
//! Fluent builder for the dealership client configuration.

use std::path::PathBuf;
use std::time::Duration;
use url::Url;

use crate::error::{ConfigurationError, DealershipError};
use crate::types::{
    BackendVersion, ClientConfig, DEFAULT_LOGIN_PATH, DEFAULT_MAX_RESPONSE_SIZE,
    DEFAULT_REFRESH_TIMEOUT, DEFAULT_TIMEOUT,
};

/// Client configuration builder.
#[derive(Default)]
pub struct ClientConfigBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
    refresh_timeout: Option<Duration>,
    backend_version: BackendVersion,
    login_path: Option<String>,
    token_file: Option<PathBuf>,
    max_response_size: Option<usize>,
}

impl ClientConfigBuilder {
    /// Create new configuration builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the backend origin.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the timeout of the token refresh call.
    pub fn refresh_timeout(mut self, timeout: Duration) -> Self {
        self.refresh_timeout = Some(timeout);
        self
    }

    /// Select the backend contract.
    pub fn backend_version(mut self, version: BackendVersion) -> Self {
        self.backend_version = version;
        self
    }

    /// Set the login path used when the session ends.
    pub fn login_path(mut self, path: impl Into<String>) -> Self {
        self.login_path = Some(path.into());
        self
    }

    /// Persist tokens to this file.
    pub fn token_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.token_file = Some(path.into());
        self
    }

    /// Set the maximum accepted response size in bytes.
    pub fn max_response_size(mut self, size: usize) -> Self {
        self.max_response_size = Some(size);
        self
    }

    /// Build the configuration.
    pub fn build(self) -> Result<ClientConfig, DealershipError> {
        let raw = self
            .base_url
            .ok_or_else(|| ConfigurationError::MissingRequired {
                field: "base_url".to_string(),
            })?;

        let base_url = Url::parse(&raw)
            .map_err(|_| ConfigurationError::InvalidBaseUrl { url: raw.clone() })?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ConfigurationError::InvalidBaseUrl { url: raw }.into());
        }

        let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT);
        let refresh_timeout = self.refresh_timeout.unwrap_or(DEFAULT_REFRESH_TIMEOUT);
        if timeout.is_zero() || refresh_timeout.is_zero() {
            return Err(ConfigurationError::InvalidConfig {
                message: "timeouts must be greater than zero".to_string(),
            }
            .into());
        }

        let login_path = self
            .login_path
            .unwrap_or_else(|| DEFAULT_LOGIN_PATH.to_string());

        Ok(ClientConfig {
            base_url,
            timeout,
            refresh_timeout,
            backend_version: self.backend_version,
            login_path,
            token_file: self.token_file,
            max_response_size: self.max_response_size.unwrap_or(DEFAULT_MAX_RESPONSE_SIZE),
        })
    }
}

/// Create a new configuration builder.
pub fn client_config() -> ClientConfigBuilder {
    ClientConfigBuilder::new()
}
