//! Dealership Client Error Types
//!
//! Error hierarchy for the authenticated client, the resource APIs and the
//! token store. Every error is `Clone` so a single refresh failure can be
//! handed to every caller that was queued behind it.

use std::time::Duration;
use thiserror::Error;

use crate::types::{ApiErrorResponse, ErrorMessage, Operation, ResourceKind};
use crate::validation::ValidationErrors;

/// Root error type for the dealership integration.
#[derive(Error, Debug, Clone)]
pub enum DealershipError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("{operation} is not implemented for {resource} by this backend version")]
    NotImplemented {
        resource: ResourceKind,
        operation: Operation,
    },

    #[error("{resource} with id {id} not found")]
    NotFound { resource: ResourceKind, id: String },
}

impl DealershipError {
    /// Get error code for telemetry.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "DEALERSHIP_CONFIG",
            Self::Network(_) => "DEALERSHIP_NETWORK",
            Self::Auth(_) => "DEALERSHIP_AUTH",
            Self::Api(_) => "DEALERSHIP_API",
            Self::Protocol(_) => "DEALERSHIP_PROTOCOL",
            Self::Storage(_) => "DEALERSHIP_STORAGE",
            Self::Validation(_) => "DEALERSHIP_VALIDATION",
            Self::NotImplemented { .. } => "DEALERSHIP_NOT_IMPLEMENTED",
            Self::NotFound { .. } => "DEALERSHIP_NOT_FOUND",
        }
    }

    /// HTTP status carried by the error, if the backend produced one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api(e) => Some(e.status),
            Self::Auth(AuthError::RefreshFailed { status, .. }) => *status,
            _ => None,
        }
    }

    /// Check if the backend rejected the call as unauthorized.
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// Check if error requires the user to sign in again.
    pub fn needs_reauth(&self) -> bool {
        match self {
            Self::Auth(_) => true,
            Self::Api(e) => e.status == 401,
            _ => false,
        }
    }
}

/// Configuration error.
#[derive(Error, Debug, Clone)]
pub enum ConfigurationError {
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Missing required field: {field}")]
    MissingRequired { field: String },

    #[error("Invalid base URL: {url}")]
    InvalidBaseUrl { url: String },

    #[error("Logging initialization failed: {message}")]
    LoggingInit { message: String },
}

/// Network/transport error.
#[derive(Error, Debug, Clone)]
pub enum NetworkError {
    #[error("Connection failed: {message}")]
    ConnectionFailed { message: String },

    #[error("Request timeout after {timeout:?}")]
    Timeout { timeout: Duration },

    #[error("Response too large: {size} bytes")]
    ResponseTooLarge { size: usize },
}

/// Session and token error.
#[derive(Error, Debug, Clone)]
pub enum AuthError {
    #[error("Session expired: {message}")]
    SessionExpired { message: String },

    #[error("Token refresh failed: {message}")]
    RefreshFailed {
        status: Option<u16>,
        message: String,
    },

    #[error("Token refresh was abandoned before it completed")]
    RefreshAborted,
}

/// Backend answered with a non-success status.
#[derive(Error, Debug, Clone)]
#[error("HTTP {status}: {message}")]
pub struct ApiError {
    /// HTTP status code.
    pub status: u16,
    /// Human-readable message extracted from the body.
    pub message: String,
    /// Parsed backend error document, when the body had the documented shape.
    pub details: Option<ApiErrorResponse>,
}

/// Protocol/response parsing error.
#[derive(Error, Debug, Clone)]
pub enum ProtocolError {
    #[error("Invalid response: {message}")]
    InvalidResponse { message: String },

    #[error("Invalid JSON: {message}")]
    InvalidJson { message: String },

    #[error("Unexpected payload shape for {resource}: {message}")]
    UnexpectedShape { resource: String, message: String },
}

/// Persistent key-value store error.
#[derive(Error, Debug, Clone)]
pub enum StorageError {
    #[error("Read failed: {message}")]
    ReadFailed { message: String },

    #[error("Write failed: {message}")]
    WriteFailed { message: String },

    #[error("Delete failed: {message}")]
    DeleteFailed { message: String },

    #[error("Corrupted data: {message}")]
    CorruptedData { message: String },
}

/// Result type for dealership operations.
pub type DealershipResult<T> = Result<T, DealershipError>;

/// Parse the backend error document from an HTTP body.
pub fn parse_error_response(body: &str) -> Option<ApiErrorResponse> {
    serde_json::from_str(body).ok()
}

/// Flatten a field-to-messages mapping into `"field: a, b; other: c"`.
pub fn flatten_field_errors<'a, I, M>(fields: I) -> String
where
    I: IntoIterator<Item = (&'a str, M)>,
    M: IntoIterator,
    M::Item: AsRef<str>,
{
    fields
        .into_iter()
        .map(|(field, messages)| {
            let joined = messages
                .into_iter()
                .map(|m| m.as_ref().to_string())
                .collect::<Vec<_>>()
                .join(", ");
            format!("{}: {}", field, joined)
        })
        .collect::<Vec<_>>()
        .join("; ")
}

fn message_from_body(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;

    if let Some(message) = value.pointer("/exception/message") {
        if let Ok(message) = serde_json::from_value::<ErrorMessage>(message.clone()) {
            return Some(message.flatten());
        }
    }

    ["message", "error", "errorMessage"]
        .iter()
        .find_map(|key| value.get(*key).and_then(|v| v.as_str()))
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Create error from HTTP response.
pub fn create_error_from_response(status: u16, body: &str) -> DealershipError {
    let message = message_from_body(body).unwrap_or_else(|| match status {
        400 => "Bad request".to_string(),
        401 => "Unauthorized".to_string(),
        403 => "Forbidden".to_string(),
        404 => "Not found".to_string(),
        _ => format!("HTTP {}", status),
    });

    DealershipError::Api(ApiError {
        status,
        message,
        details: parse_error_response(body),
    })
}

/// Extract the message to show for an error, falling back to `default`.
pub fn extract_error_message(error: &DealershipError, default: &str) -> String {
    let message = match error {
        DealershipError::Api(api) => api.message.clone(),
        DealershipError::Validation(errors) => errors.to_string(),
        other => other.to_string(),
    };

    if message.trim().is_empty() {
        default.to_string()
    } else {
        message
    }
}

/// Get user-friendly error message.
pub fn get_user_message(error: &DealershipError) -> String {
    match error {
        DealershipError::Auth(_) => "Your session has expired. Please sign in again.".to_string(),
        DealershipError::Network(NetworkError::Timeout { .. }) => {
            "The request timed out. Please check your connection and try again.".to_string()
        }
        DealershipError::Network(_) => {
            "The server could not be reached. Please try again later.".to_string()
        }
        DealershipError::NotImplemented { .. } => {
            "This action is not available on the current server.".to_string()
        }
        DealershipError::Api(_) | DealershipError::Validation(_) => {
            extract_error_message(error, "An error occurred")
        }
        _ => "An error occurred. Please try again.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flattens_field_validation_messages() {
        let body = r#"{
            "status": 400,
            "exception": {
                "path": "/rest/api/car/save",
                "createTime": "2024-05-01T10:00:00",
                "hostName": "api-1",
                "message": {"plaka": ["must not be empty", "invalid"], "price": ["must be positive"]}
            }
        }"#;

        let error = create_error_from_response(400, body);
        assert_eq!(
            extract_error_message(&error, "fallback"),
            "plaka: must not be empty, invalid; price: must be positive"
        );
        assert_eq!(error.status(), Some(400));
    }

    #[test]
    fn test_plain_exception_message() {
        let body = r#"{"status":500,"exception":{"path":"/x","createTime":"t","hostName":"h","message":"Car not salable"}}"#;
        let error = create_error_from_response(500, body);
        assert_eq!(extract_error_message(&error, "fallback"), "Car not salable");
    }

    #[test]
    fn test_alternative_body_formats() {
        let error = create_error_from_response(409, r#"{"message":"duplicate plate"}"#);
        assert_eq!(extract_error_message(&error, "x"), "duplicate plate");

        let error = create_error_from_response(502, r#"{"error":"bad gateway"}"#);
        assert_eq!(extract_error_message(&error, "x"), "bad gateway");

        let error = create_error_from_response(401, "");
        assert_eq!(extract_error_message(&error, "x"), "Unauthorized");
        assert!(error.is_unauthorized());
        assert!(error.needs_reauth());
    }

    #[test]
    fn test_not_implemented_display() {
        let error = DealershipError::NotImplemented {
            resource: ResourceKind::Sale,
            operation: Operation::Delete,
        };
        assert_eq!(error.error_code(), "DEALERSHIP_NOT_IMPLEMENTED");
        assert!(error.to_string().contains("not implemented"));
        assert!(!error.needs_reauth());
    }

    #[test]
    fn test_refresh_failure_needs_reauth() {
        let error = DealershipError::Auth(AuthError::RefreshFailed {
            status: Some(403),
            message: "refresh token revoked".to_string(),
        });
        assert!(error.needs_reauth());
        assert_eq!(error.status(), Some(403));
        assert_eq!(
            get_user_message(&error),
            "Your session has expired. Please sign in again."
        );
    }
}
