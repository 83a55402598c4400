//! Tri-state field for partial updates.
//!
//! JSON distinguishes a key that is absent from a key that is present with
//! `null`. A partial update must keep that distinction: absent means "leave
//! the column alone", `null` means "clear it". `Option<T>` collapses both, so
//! payload structs use [`Patch`] with `#[serde(default)]`:
//!
//! ```
//! use ormctl_core::Patch;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Body {
//!     #[serde(default)]
//!     description: Patch<String>,
//! }
//!
//! let absent: Body = serde_json::from_str("{}").unwrap();
//! let null: Body = serde_json::from_str(r#"{"description": null}"#).unwrap();
//! let set: Body = serde_json::from_str(r#"{"description": "x"}"#).unwrap();
//!
//! assert_eq!(absent.description, Patch::Unset);
//! assert_eq!(null.description, Patch::Null);
//! assert_eq!(set.description, Patch::Value("x".to_string()));
//! ```

use serde::{Deserialize, Deserializer};

use crate::models::ValidationError;

/// A field of a partial update payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch<T> {
    /// Key absent from the payload
    Unset,
    /// Key present with `null`
    Null,
    /// Key present with a value
    Value(T),
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Self::Unset
    }
}

impl<T> Patch<T> {
    pub fn is_unset(&self) -> bool {
        matches!(self, Self::Unset)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Patch<U> {
        match self {
            Self::Unset => Patch::Unset,
            Self::Null => Patch::Null,
            Self::Value(v) => Patch::Value(f(v)),
        }
    }

    /// Change for a nullable column: `None` leaves it, `Some(None)` clears it.
    pub fn into_nullable(self) -> Option<Option<T>> {
        match self {
            Self::Unset => None,
            Self::Null => Some(None),
            Self::Value(v) => Some(Some(v)),
        }
    }

    /// Change for a NOT NULL column; an explicit `null` is rejected.
    pub fn into_required(self, field: &'static str) -> Result<Option<T>, ValidationError> {
        match self {
            Self::Unset => Ok(None),
            Self::Null => Err(ValidationError::NotNullable { field }),
            Self::Value(v) => Ok(Some(v)),
        }
    }
}

impl<'de, T> Deserialize<'de> for Patch<T>
where
    T: Deserialize<'de>,
{
    // Only reached when the key is present; absent keys use `Default`.
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(|value| match value {
            Some(v) => Self::Value(v),
            None => Self::Null,
        })
    }
}
