//! Backend Field Mapping
//!
//! The backend renames fields, omits them, and disagrees with itself between
//! releases. Each resource is described by a [`RecordMapping`]: an ordered
//! list of field rules for the inbound direction (backend → canonical) and
//! one for the outbound direction (canonical → backend). Rules may be pinned
//! to a single [`BackendVersion`], so supporting another backend release is a
//! table change.
//!
//! Canonical documents use the camelCase field names of the public record
//! types and are turned into those types with `serde_json::from_value`.

pub mod endpoints;
pub mod tables;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::ProtocolError;
use crate::types::BackendVersion;
use crate::validation::ValidationErrors;

pub use endpoints::{endpoints, DeleteSupport, EndpointSet, LookupStyle, UpdateStyle};
pub use tables::mapping_for;

/// How one field is converted.
#[derive(Clone, Copy, Debug)]
pub enum FieldKind {
    /// Record id. Numbers and strings become strings; absent becomes `""`.
    Id,
    /// Text with a default for absent, `null` or empty values.
    Text(&'static str),
    /// Whole number with a default for absent or zero values.
    Integer(i64),
    /// Decimal with a default for absent or zero values.
    Decimal(f64),
    /// Text that stays `null` when absent.
    OptionalText,
    /// Decimal that stays `null` when absent.
    OptionalDecimal,
    /// Embedded record; `null` when absent.
    Record(&'static RecordMapping),
    /// Id of another record. Outbound it must be numeric and is sent as an
    /// integer; an empty id is omitted.
    Reference,
    /// Currency code. Lira is always `TL` in canonical documents and takes
    /// the version's spelling on the wire; absent or empty means lira.
    Currency,
}

/// Canonical spelling of the Turkish lira.
pub const CANONICAL_LIRA: &str = "TL";

/// Single field correspondence.
#[derive(Clone, Copy, Debug)]
pub struct FieldRule {
    pub canonical: &'static str,
    pub backend: &'static str,
    pub kind: FieldKind,
    /// Restrict the rule to one backend version.
    pub only: Option<BackendVersion>,
}

impl FieldRule {
    pub const fn new(canonical: &'static str, backend: &'static str, kind: FieldKind) -> Self {
        Self {
            canonical,
            backend,
            kind,
            only: None,
        }
    }

    /// Same name on both sides.
    pub const fn same(name: &'static str, kind: FieldKind) -> Self {
        Self::new(name, name, kind)
    }

    pub const fn only(self, version: BackendVersion) -> Self {
        Self {
            only: Some(version),
            ..self
        }
    }

    fn applies(&self, version: BackendVersion) -> bool {
        self.only.map_or(true, |only| only == version)
    }
}

/// Field tables for one resource shape.
#[derive(Debug)]
pub struct RecordMapping {
    /// Resource name used in error messages.
    pub name: &'static str,
    pub inbound: &'static [FieldRule],
    pub outbound: &'static [FieldRule],
}

impl RecordMapping {
    /// Convert a backend record to its canonical document.
    pub fn to_canonical(&self, backend: &Value, version: BackendVersion) -> Result<Value, ProtocolError> {
        let source = backend.as_object().ok_or_else(|| ProtocolError::UnexpectedShape {
            resource: self.name.to_string(),
            message: format!("expected an object, got {}", type_name(backend)),
        })?;

        let mut out = Map::with_capacity(self.inbound.len());
        for rule in self.inbound.iter().filter(|r| r.applies(version)) {
            let raw = source.get(rule.backend).filter(|v| !v.is_null());
            let value = match rule.kind {
                FieldKind::Id | FieldKind::Reference => Value::String(id_text(raw)),
                FieldKind::Text(default) => Value::String(
                    raw.and_then(scalar_text)
                        .filter(|s| !s.is_empty())
                        .unwrap_or_else(|| default.to_string()),
                ),
                FieldKind::Integer(default) => {
                    Value::from(raw.and_then(as_integer).filter(|n| *n != 0).unwrap_or(default))
                }
                FieldKind::Decimal(default) => {
                    Value::from(raw.and_then(as_decimal).filter(|n| *n != 0.0).unwrap_or(default))
                }
                FieldKind::OptionalText => raw.and_then(scalar_text).map_or(Value::Null, Value::String),
                FieldKind::OptionalDecimal => raw.and_then(as_decimal).map_or(Value::Null, Value::from),
                FieldKind::Record(nested) => match raw {
                    Some(inner) if inner.is_object() => nested.to_canonical(inner, version)?,
                    _ => Value::Null,
                },
                FieldKind::Currency => Value::String(canonical_currency(raw.and_then(scalar_text))),
            };
            out.insert(rule.canonical.to_string(), value);
        }

        Ok(Value::Object(out))
    }

    /// Convert a backend record straight into a typed record.
    pub fn decode<R: DeserializeOwned>(&self, backend: &Value, version: BackendVersion) -> Result<R, ProtocolError> {
        let canonical = self.to_canonical(backend, version)?;
        serde_json::from_value(canonical).map_err(|e| ProtocolError::UnexpectedShape {
            resource: self.name.to_string(),
            message: e.to_string(),
        })
    }

    /// Convert a canonical input document to the body the backend expects.
    ///
    /// Absent and `null` fields are left out of the body.
    pub fn to_backend(&self, canonical: &Value, version: BackendVersion) -> Result<Value, ValidationErrors> {
        let source = match canonical.as_object() {
            Some(map) => map,
            None => return Err(ValidationErrors::single(self.name, "input must be an object")),
        };

        let mut errors = ValidationErrors::new();
        let mut out = Map::with_capacity(self.outbound.len());
        for rule in self.outbound.iter().filter(|r| r.applies(version)) {
            let raw = match source.get(rule.canonical).filter(|v| !v.is_null()) {
                Some(raw) => raw,
                None => continue,
            };
            match rule.kind {
                FieldKind::Reference => match reference_id(raw) {
                    Ok(Some(id)) => {
                        out.insert(rule.backend.to_string(), Value::from(id));
                    }
                    Ok(None) => {}
                    Err(message) => errors.add(rule.canonical, message),
                },
                FieldKind::Currency => match raw.as_str() {
                    Some(CANONICAL_LIRA) => {
                        out.insert(rule.backend.to_string(), Value::from(version.lira_code()));
                    }
                    Some(code) => {
                        out.insert(rule.backend.to_string(), Value::from(code));
                    }
                    None => errors.add(rule.canonical, "must be a currency code"),
                },
                _ => {
                    out.insert(rule.backend.to_string(), raw.clone());
                }
            }
        }

        errors.into_result().map(|()| Value::Object(out))
    }
}

/// Parse a record id for the wire.
pub fn numeric_id(field: &str, id: &str) -> Result<i64, ValidationErrors> {
    match reference_id(&Value::String(id.to_string())) {
        Ok(Some(id)) => Ok(id),
        Ok(None) => Err(ValidationErrors::single(field, "id is required")),
        Err(message) => Err(ValidationErrors::single(field, message)),
    }
}

fn reference_id(value: &Value) -> Result<Option<i64>, &'static str> {
    match value {
        Value::Number(n) => n.as_i64().map(Some).ok_or("must be a numeric id"),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => s.trim().parse::<i64>().map(Some).map_err(|_| "must be a numeric id"),
        _ => Err("must be a numeric id"),
    }
}

/// Both lira spellings read as `TL`.
fn canonical_currency(code: Option<String>) -> String {
    match code.as_deref().map(str::trim) {
        None | Some("") | Some("TRY") => CANONICAL_LIRA.to_string(),
        Some(other) => other.to_string(),
    }
}

fn id_text(raw: Option<&Value>) -> String {
    match raw {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn as_decimal(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
