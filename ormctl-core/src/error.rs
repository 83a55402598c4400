/// Errors raised while turning stored rows into domain records.
///
/// Both storage backends produce raw rows (TEXT timestamps, nullable joined
/// columns); any row that cannot be mapped surfaces as a `MappingError`.
/// Servers treat these as internal failures.
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MappingError {
    /// A timestamp column did not hold `YYYY-MM-DD HH:MM:SS` or RFC 3339
    #[error("Invalid timestamp in column '{column}': '{value}'")]
    InvalidTimestamp { column: &'static str, value: String },

    /// A column that must be populated for this row shape was NULL
    #[error("Unexpected NULL in column '{column}'")]
    UnexpectedNull { column: &'static str },
}

/// Result type alias for row mapping
pub type Result<T> = std::result::Result<T, MappingError>;

impl MappingError {
    pub fn invalid_timestamp(column: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidTimestamp {
            column,
            value: value.into(),
        }
    }
}
