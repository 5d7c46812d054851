//! Configuration Types
//!
//! Client configuration and backend contract selection.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

use crate::builders::ClientConfigBuilder;
use crate::error::{ConfigurationError, DealershipError};

/// Backend contract served by the deployment.
///
/// The two versions differ in update style, lira spelling, address fields and
/// which endpoints exist. A client talks to exactly one of them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum BackendVersion {
    /// Legacy contract: updates are `POST save` with an `id`, currency `TRY`.
    V1,
    /// Current contract: updates are `PUT update/{id}`, currency `TL`.
    #[default]
    V2,
}

impl BackendVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::V1 => "v1",
            Self::V2 => "v2",
        }
    }

    /// How this backend spells the Turkish lira.
    pub fn lira_code(&self) -> &'static str {
        match self {
            Self::V1 => "TRY",
            Self::V2 => "TL",
        }
    }
}

impl FromStr for BackendVersion {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "v1" | "1" | "legacy" => Ok(Self::V1),
            "v2" | "2" | "current" => Ok(Self::V2),
            other => Err(ConfigurationError::InvalidConfig {
                message: format!("Unknown backend version: {}", other),
            }),
        }
    }
}

/// Dealership client configuration.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Backend origin, e.g. `http://localhost:8080`.
    pub base_url: Url,
    /// Default HTTP timeout.
    pub timeout: Duration,
    /// Timeout of the `/refresh_token` call. Expiry counts as refresh failure.
    pub refresh_timeout: Duration,
    /// Backend contract.
    pub backend_version: BackendVersion,
    /// Where the session is sent when it ends.
    pub login_path: String,
    /// File that persists the token pair across restarts (in memory if unset).
    pub token_file: Option<PathBuf>,
    /// Largest accepted response body.
    pub max_response_size: usize,
}

impl ClientConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }

    /// Creates a configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `DEALERSHIP_BASE_URL` (required): backend origin
    /// - `DEALERSHIP_TIMEOUT_SECS` (optional): request timeout in seconds
    /// - `DEALERSHIP_REFRESH_TIMEOUT_SECS` (optional): refresh timeout in seconds
    /// - `DEALERSHIP_BACKEND_VERSION` (optional): `v1` or `v2`
    /// - `DEALERSHIP_LOGIN_PATH` (optional): login screen path
    /// - `DEALERSHIP_TOKEN_FILE` (optional): token persistence file
    pub fn from_env() -> Result<Self, DealershipError> {
        let base_url = std::env::var("DEALERSHIP_BASE_URL").map_err(|_| {
            ConfigurationError::MissingRequired {
                field: "DEALERSHIP_BASE_URL".to_string(),
            }
        })?;

        let mut builder = ClientConfigBuilder::new().base_url(base_url);

        if let Some(secs) = env_secs("DEALERSHIP_TIMEOUT_SECS")? {
            builder = builder.timeout(secs);
        }
        if let Some(secs) = env_secs("DEALERSHIP_REFRESH_TIMEOUT_SECS")? {
            builder = builder.refresh_timeout(secs);
        }
        if let Ok(version) = std::env::var("DEALERSHIP_BACKEND_VERSION") {
            builder = builder.backend_version(version.parse()?);
        }
        if let Ok(path) = std::env::var("DEALERSHIP_LOGIN_PATH") {
            builder = builder.login_path(path);
        }
        if let Ok(file) = std::env::var("DEALERSHIP_TOKEN_FILE") {
            builder = builder.token_file(file);
        }

        builder.build()
    }

    /// Full URL for a backend path.
    pub fn endpoint_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

fn env_secs(name: &str) -> Result<Option<Duration>, ConfigurationError> {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map(|secs| Some(Duration::from_secs(secs)))
            .map_err(|_| ConfigurationError::InvalidConfig {
                message: format!("{} must be a whole number of seconds", name),
            }),
        Err(_) => Ok(None),
    }
}

/// Default configuration values.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_REFRESH_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_LOGIN_PATH: &str = "/login";
pub const DEFAULT_MAX_RESPONSE_SIZE: usize = 1024 * 1024;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_version_parse() {
        assert_eq!("v1".parse::<BackendVersion>().unwrap(), BackendVersion::V1);
        assert_eq!("V2".parse::<BackendVersion>().unwrap(), BackendVersion::V2);
        assert!("v3".parse::<BackendVersion>().is_err());
        assert_eq!(BackendVersion::default(), BackendVersion::V2);
    }

    #[test]
    fn test_endpoint_url_joins_cleanly() {
        let config = ClientConfig::builder()
            .base_url("http://localhost:8080/")
            .build()
            .unwrap();
        assert_eq!(
            config.endpoint_url("/rest/api/car/list"),
            "http://localhost:8080/rest/api/car/list"
        );

        let config = ClientConfig::builder()
            .base_url("https://gateway.example.com/dealer")
            .build()
            .unwrap();
        assert_eq!(
            config.endpoint_url("/authenticate"),
            "https://gateway.example.com/dealer/authenticate"
        );
    }
}
