//! Response Envelope
//!
//! Every backend response wraps its payload as `{status, payload, errorMessage}`.
//! Errors use a separate document with an `exception` block.

use serde::{Deserialize, Serialize};

use crate::error::flatten_field_errors;

/// Backend response envelope.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    /// Status reported by the backend (mirrors the HTTP status).
    #[serde(default)]
    pub status: u16,
    /// Response payload.
    pub payload: T,
    /// Error message, `null` on success.
    #[serde(default)]
    pub error_message: Option<String>,
}

/// Backend error document.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub status: u16,
    pub exception: ApiException,
}

/// Exception block of a backend error document.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiException {
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub create_time: String,
    #[serde(default)]
    pub host_name: String,
    pub message: ErrorMessage,
}

/// Exception message: plain text or per-field validation messages.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorMessage {
    Text(String),
    Fields(serde_json::Map<String, serde_json::Value>),
}

impl ErrorMessage {
    /// Flatten to a single line: `"field: msg1, msg2; field2: msg3"`.
    pub fn flatten(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Fields(fields) => flatten_field_errors(
                fields
                    .iter()
                    .map(|(field, messages)| (field.as_str(), field_messages(messages))),
            ),
        }
    }
}

fn field_messages(value: &serde_json::Value) -> Vec<String> {
    match value {
        serde_json::Value::Array(items) => items
            .iter()
            .map(|item| match item {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect(),
        serde_json::Value::String(s) => vec![s.clone()],
        serde_json::Value::Null => Vec::new(),
        other => vec![other.to_string()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_parses_null_error_message() {
        let envelope: Envelope<Vec<u32>> =
            serde_json::from_str(r#"{"status":200,"payload":[1,2],"errorMessage":null}"#).unwrap();
        assert_eq!(envelope.status, 200);
        assert_eq!(envelope.payload, vec![1, 2]);
        assert!(envelope.error_message.is_none());
    }

    #[test]
    fn test_field_messages_keep_backend_order() {
        let message: ErrorMessage =
            serde_json::from_str(r#"{"zeta":["first"],"alpha":["a","b"]}"#).unwrap();
        assert_eq!(message.flatten(), "zeta: first; alpha: a, b");
    }
}
