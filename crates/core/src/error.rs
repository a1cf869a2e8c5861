//! Request validation error model.

use thiserror::Error;

/// Result type used by request validation.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validation failure for an inbound request.
///
/// These are detected before any store call is attempted. The `Display` output
/// is the exact message placed in the `error` field of the 400 response.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The request payload could not be parsed as a JSON object.
    #[error("{0}")]
    MalformedBody(String),

    /// One or more required fields were absent, in canonical field order.
    #[error("Missing fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
}

impl ValidationError {
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedBody(msg.into())
    }

    pub fn missing(fields: Vec<&'static str>) -> Self {
        Self::MissingFields(fields)
    }

    /// Field names reported as missing (empty for other kinds).
    pub fn missing_fields(&self) -> &[&'static str] {
        match self {
            Self::MissingFields(fields) => fields,
            Self::MalformedBody(_) => &[],
        }
    }
}
