//! Request records and payloads

use serde::{Deserialize, Serialize};

use super::{Name, TrainingSummary, ValidationError};
use crate::patch::Patch;

/// Stored request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub group: Option<String>,
}

/// Minimal projection used when listing the requests of a training
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestSummary {
    pub id: i64,
    pub name: String,
}

/// A request with the trainings it requires, loaded in one round trip
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestWithTrainings {
    pub id: i64,
    pub name: String,
    pub trainings: Vec<TrainingSummary>,
}

/// Create payload
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub group: Option<String>,
}

/// Validated insert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRequest {
    pub name: Name,
    pub description: Option<String>,
    pub group: Option<String>,
}

impl CreateRequest {
    pub fn validate(self) -> Result<NewRequest, ValidationError> {
        Ok(NewRequest {
            name: Name::new("name", &self.name)?,
            description: self.description,
            group: self.group,
        })
    }
}

/// Partial update payload
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequestPatch {
    #[serde(default)]
    pub name: Patch<String>,
    #[serde(default)]
    pub description: Patch<String>,
    #[serde(default)]
    pub group: Patch<String>,
}

impl RequestPatch {
    pub fn validate(self) -> Result<RequestChanges, ValidationError> {
        let name = match self.name.into_required("name")? {
            Some(name) => Some(Name::new("name", &name)?),
            None => None,
        };

        Ok(RequestChanges {
            name,
            description: self.description.into_nullable(),
            group: self.group.into_nullable(),
        })
    }
}

/// Validated column changes for one request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestChanges {
    pub name: Option<Name>,
    pub description: Option<Option<String>>,
    pub group: Option<Option<String>>,
}

impl RequestChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.group.is_none()
    }
}
