//! Required display text (item names, request names, training titles)

use super::ValidationError;

/// Maximum length for names and titles
pub const MAX_NAME_LEN: usize = 255;

/// Validated, trimmed, non-empty name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Name(String);

impl Name {
    /// Validate `s` as the value of `field`.
    ///
    /// # Rules
    /// - Non-empty (after trimming whitespace)
    /// - Max 255 characters
    ///
    /// # Example
    /// ```
    /// use ormctl_core::models::Name;
    ///
    /// assert!(Name::new("name", "Widget").is_ok());
    /// assert!(Name::new("name", "").is_err());
    /// assert!(Name::new("title", "   ").is_err());  // whitespace only
    /// ```
    pub fn new(field: &'static str, s: &str) -> Result<Self, ValidationError> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field });
        }

        if trimmed.chars().count() > MAX_NAME_LEN {
            return Err(ValidationError::TooLong {
                field,
                max: MAX_NAME_LEN,
            });
        }

        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for Name {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
