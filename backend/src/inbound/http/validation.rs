//! Field-level validation errors for request bodies and query strings.
//!
//! Every helper yields an `invalid_request` error whose details name the
//! field and a reason code, e.g. `{"field": "eventType", "code": "blank_field"}`.

use serde_json::json;

use crate::domain::Error;

/// Machine-readable reason placed in `details.code`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    BlankField,
    InvalidValue,
}

impl ErrorCode {
    const fn as_str(self) -> &'static str {
        match self {
            Self::MissingField => "missing_field",
            Self::BlankField => "blank_field",
            Self::InvalidValue => "invalid_value",
        }
    }
}

/// Wire name of the offending request field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }
}

fn field_error(field: FieldName, code: ErrorCode, message: String, value: Option<&str>) -> Error {
    let mut details = json!({ "field": field.0, "code": code.as_str() });
    if let (Some(value), Some(map)) = (value, details.as_object_mut()) {
        map.insert("value".to_owned(), json!(value));
    }
    Error::invalid_request(message).with_details(details)
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    field_error(
        field,
        ErrorCode::MissingField,
        format!("missing required field: {}", field.0),
        None,
    )
}

pub(crate) fn blank_field_error(field: FieldName) -> Error {
    field_error(
        field,
        ErrorCode::BlankField,
        format!("{} must not be blank", field.0),
        None,
    )
}

pub(crate) fn invalid_value_error(
    field: FieldName,
    value: &str,
    message: impl std::fmt::Display,
) -> Error {
    field_error(field, ErrorCode::InvalidValue, message.to_string(), Some(value))
}

/// Require a present, non-blank string field.
pub(crate) fn required_text(value: Option<String>, field: FieldName) -> Result<String, Error> {
    let value = value.ok_or_else(|| missing_field_error(field))?;
    if value.trim().is_empty() {
        return Err(blank_field_error(field));
    }
    Ok(value)
}
