//! Item records and payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Name, ValidationError};
use crate::patch::Patch;

/// Stored item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Create payload. Both fields are required; `is_active` is not accepted
/// because every new item starts active.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateItem {
    pub name: String,
    pub description: String,
}

/// Validated insert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    pub name: Name,
    pub description: String,
}

impl CreateItem {
    pub fn validate(self) -> Result<NewItem, ValidationError> {
        Ok(NewItem {
            name: Name::new("name", &self.name)?,
            description: self.description,
        })
    }
}

/// Partial update payload: only keys present in the JSON are applied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemPatch {
    #[serde(default)]
    pub name: Patch<String>,
    #[serde(default)]
    pub description: Patch<String>,
    #[serde(default)]
    pub is_active: Patch<bool>,
}

impl ItemPatch {
    pub fn validate(self) -> Result<ItemChanges, ValidationError> {
        let name = match self.name.into_required("name")? {
            Some(name) => Some(Name::new("name", &name)?),
            None => None,
        };

        Ok(ItemChanges {
            name,
            description: self.description.into_nullable(),
            is_active: self.is_active.into_required("is_active")?,
        })
    }
}

/// Replace payload: `null` or absent values are dropped and never overwrite.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemReplace {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl ItemReplace {
    pub fn validate(self) -> Result<ItemChanges, ValidationError> {
        let name = match self.name {
            Some(name) => Some(Name::new("name", &name)?),
            None => None,
        };

        Ok(ItemChanges {
            name,
            description: self.description.map(Some),
            is_active: None,
        })
    }
}

/// Validated column changes for one item. `None` leaves a column untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemChanges {
    pub name: Option<Name>,
    pub description: Option<Option<String>>,
    pub is_active: Option<bool>,
}

impl ItemChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.is_active.is_none()
    }
}
