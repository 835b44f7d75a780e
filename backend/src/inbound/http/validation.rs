//! Shared validation helpers for inbound HTTP adapters.

use std::str::FromStr;

use serde_json::json;

use crate::domain::{Email, Error, ListingId};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    InvalidUuid,
    InvalidValue,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::InvalidValue => "invalid_value",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &str {
        self.0
    }
}

/// Builder for validation errors with field context.
struct ValidationError {
    field: String,
    message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    fn with_value(self, code: ErrorCode, value: impl Into<String>) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "value": value.into(),
            "code": code.as_str(),
        }))
    }
}

pub(crate) fn invalid_uuid_error(field: FieldName, value: &str) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("{field} must be a valid UUID"))
        .with_value(ErrorCode::InvalidUuid, value)
}

pub(crate) fn invalid_value_error(field: FieldName, value: &str) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("{field} has an unsupported value"))
        .with_value(ErrorCode::InvalidValue, value)
}

pub(crate) fn parse_listing_id(value: &str, field: FieldName) -> Result<ListingId, Error> {
    ListingId::from_str(value).map_err(|_| invalid_uuid_error(field, value))
}

/// Parse a recipient address. One no account could hold is an unknown recipient.
pub(crate) fn parse_recipient(value: &str) -> Result<Email, Error> {
    Email::new(value).map_err(|_| Error::not_found("Recipient not found"))
}

/// Parse an optional query value, rejecting anything `T` cannot represent.
pub(crate) fn parse_optional<T: FromStr>(
    value: Option<&str>,
    field: FieldName,
) -> Result<Option<T>, Error> {
    value
        .map(str::trim)
        .filter(|raw| !raw.is_empty())
        .map(|raw| raw.parse::<T>().map_err(|_| invalid_value_error(field, raw)))
        .transpose()
}

/// Parse an optional numeric bound, rejecting `NaN` and infinities.
pub(crate) fn parse_optional_finite(
    value: Option<&str>,
    field: FieldName,
) -> Result<Option<f64>, Error> {
    match parse_optional::<f64>(value, field)? {
        Some(number) if !number.is_finite() => {
            Err(invalid_value_error(field, value.unwrap_or_default().trim()))
        }
        parsed => Ok(parsed),
    }
}
