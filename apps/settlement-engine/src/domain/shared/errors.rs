//! Shared domain errors.

use std::fmt;

/// Errors raised by value-object construction and validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A field carries an invalid value.
    InvalidValue {
        /// Field with the invalid value.
        field: String,
        /// Error message.
        message: String,
    },

    /// A required field is missing or empty.
    MissingField {
        /// The empty field.
        field: String,
    },
}

impl DomainError {
    /// Invalid-value constructor.
    #[must_use]
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Missing-field constructor.
    #[must_use]
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidValue { field, message } => {
                write!(f, "Invalid value for '{field}': {message}")
            }
            Self::MissingField { field } => {
                write!(f, "Required field '{field}' is missing or empty")
            }
        }
    }
}

impl std::error::Error for DomainError {}
