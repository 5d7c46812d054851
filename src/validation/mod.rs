//! Client-Side Validation
//!
//! Input schemas are checked before any request is built; a failing input
//! never reaches the network.

pub mod format;
pub mod rules;
pub mod schemas;

use std::collections::BTreeMap;
use thiserror::Error;

use crate::error::flatten_field_errors;

pub use format::{format_currency, format_iban, format_phone, format_plate, format_tckn};
pub use rules::{
    validate_iban, validate_phone, validate_plate, validate_postal_code, validate_tckn,
};

/// Per-field validation messages.
#[derive(Error, Clone, Debug, Default, PartialEq, Eq)]
#[error("{}", self.summary())]
pub struct ValidationErrors {
    fields: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message against `field`.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    /// Single-message error.
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    /// Merge another set under `prefix.`.
    pub fn nest(&mut self, prefix: &str, other: ValidationErrors) {
        for (field, messages) in other.fields {
            for message in messages {
                self.add(format!("{}.{}", prefix, field), message);
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Messages for one field.
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.fields.get(field).map(Vec::as_slice)
    }

    /// All fields with their messages.
    pub fn fields(&self) -> &BTreeMap<String, Vec<String>> {
        &self.fields
    }

    /// `Ok` when nothing was recorded.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    /// `"field: msg1, msg2; field2: msg3"`.
    pub fn summary(&self) -> String {
        flatten_field_errors(self.fields.iter().map(|(field, messages)| (field.as_str(), messages)))
    }
}

/// Input that can be checked before submission.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationErrors>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_groups_messages_per_field() {
        let mut errors = ValidationErrors::new();
        errors.add("plate", "Plate is required");
        errors.add("brand", "Brand is required");
        errors.add("plate", "Invalid plate format (e.g., 34 ABC 1234)");

        assert_eq!(
            errors.to_string(),
            "brand: Brand is required; plate: Plate is required, Invalid plate format (e.g., 34 ABC 1234)"
        );
        assert_eq!(errors.get("plate").map(|m| m.len()), Some(2));
    }

    #[test]
    fn test_nest_prefixes_fields() {
        let mut errors = ValidationErrors::new();
        errors.nest("address", ValidationErrors::single("city", "too short"));
        assert_eq!(errors.get("address.city"), Some(&["too short".to_string()][..]));
        assert!(errors.into_result().is_err());
        assert!(ValidationErrors::new().into_result().is_ok());
    }
}
