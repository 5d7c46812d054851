//! Logging
//!
//! `tracing` subscriber setup and log helpers for client traffic.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::{ConfigurationError, DealershipError};

/// Log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "TRACE"),
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warn => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => LevelFilter::TRACE,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error => LevelFilter::ERROR,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Minimum level captured, on top of `RUST_LOG`.
    pub level: LogLevel,
    /// Output format.
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Pretty,
        }
    }
}

impl LogConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }
}

/// Install the global `tracing` subscriber.
///
/// Returns an error instead of panicking when a subscriber is already set.
pub fn init_logging(config: &LogConfig) -> Result<(), DealershipError> {
    let filter =
        EnvFilter::from_default_env().add_directive(LevelFilter::from(config.level).into());

    let result = match config.format {
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true))
            .try_init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .try_init(),
    };

    result.map_err(|e| {
        ConfigurationError::LoggingInit {
            message: e.to_string(),
        }
        .into()
    })
}

/// Shorten a token for logs: the first 8 characters followed by `...`.
pub fn redact_token(token: &str) -> String {
    const VISIBLE: usize = 8;
    match token.char_indices().nth(VISIBLE) {
        Some((cut, _)) => format!("{}...", &token[..cut]),
        None if token.is_empty() => String::new(),
        None => "...".to_string(),
    }
}

/// Log an outgoing request.
pub fn log_request(method: &str, url: &str, authorized: bool) {
    tracing::debug!(method, url, authorized, "Outgoing request");
}

/// Log an incoming response.
pub fn log_response(method: &str, url: &str, status: u16, duration_ms: u64) {
    tracing::debug!(method, url, status, duration_ms, "Incoming response");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redact_token_keeps_prefix() {
        assert_eq!(redact_token("eyJhbGciOiJIUzI1NiJ9.payload"), "eyJhbGci...");
        assert_eq!(redact_token("short"), "...");
        assert_eq!(redact_token(""), "");
    }

    #[test]
    fn test_log_config_builder() {
        let config = LogConfig::new()
            .with_level(LogLevel::Debug)
            .with_format(LogFormat::Json);
        assert_eq!(config.level, LogLevel::Debug);
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(LogLevel::Warn.to_string(), "WARN");
    }

    #[test]
    fn test_second_init_is_an_error() {
        let config = LogConfig::new().with_level(LogLevel::Error);
        let _ = init_logging(&config);
        assert!(matches!(
            init_logging(&config),
            Err(DealershipError::Configuration(
                ConfigurationError::LoggingInit { .. }
            ))
        ));
    }
}
