//! Validation error types

use std::fmt;

/// Validation error for inbound payloads and records
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Field is empty when it shouldn't be
    Empty { field: &'static str },

    /// Field exceeds maximum length
    TooLong { field: &'static str, max: usize },

    /// Explicit `null` sent for a column that cannot hold one
    NotNullable { field: &'static str },

    /// Numeric field outside its allowed range
    OutOfRange { field: &'static str, reason: &'static str },

    /// Value present but not in the accepted shape (email, URL, charset)
    Invalid { field: &'static str, reason: &'static str },

    /// Body, path or query could not be parsed at all
    Malformed { location: &'static str, reason: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{} cannot be empty", field),
            Self::TooLong { field, max } => {
                write!(f, "{} exceeds maximum length of {} characters", field, max)
            }
            Self::NotNullable { field } => write!(f, "{} cannot be null", field),
            Self::OutOfRange { field, reason } | Self::Invalid { field, reason } => {
                write!(f, "{}: {}", field, reason)
            }
            Self::Malformed { location, reason } => {
                write!(f, "invalid request {}: {}", location, reason)
            }
        }
    }
}

impl std::error::Error for ValidationError {}
