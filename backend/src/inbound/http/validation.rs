//! Shared validation helpers for inbound HTTP adapters.
//!
//! These helpers attach a machine-readable `code` plus the offending field
//! name to every rejection so clients can highlight the right input without
//! parsing message text.

use serde_json::json;
use uuid::Uuid;

use crate::domain::Error;

/// Newtype wrapper for HTTP field names to keep call sites typo-resistant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    Error::invalid_request(format!("missing required field: {field}")).with_details(json!({
        "field": field,
        "code": "missing_field",
    }))
}

pub(crate) fn invalid_uuid_error(field: FieldName, value: &str) -> Error {
    let field = field.as_str();
    Error::invalid_request(format!("{field} must be a valid UUID")).with_details(json!({
        "field": field,
        "value": value,
        "code": "invalid_uuid",
    }))
}

/// Unwrap an optional request field, rejecting absent or blank values.
pub(crate) fn require_field(value: Option<String>, field: FieldName) -> Result<String, Error> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(missing_field_error(field)),
    }
}

pub(crate) fn parse_uuid(value: &str, field: FieldName) -> Result<Uuid, Error> {
    Uuid::parse_str(value).map_err(|_| invalid_uuid_error(field, value))
}
