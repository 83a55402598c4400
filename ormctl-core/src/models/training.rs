//! Training records and payloads

use serde::{Deserialize, Serialize};

use super::{Name, ValidationError};
use crate::patch::Patch;

/// Stored training
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Training {
    pub id: i64,
    pub title: String,
    pub duration: Option<i64>,
}

/// Minimal projection nested under a request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingSummary {
    pub id: i64,
    pub title: String,
}

/// Create payload
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTraining {
    pub title: String,
    #[serde(default)]
    pub duration: Option<i64>,
}

/// Validated insert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTraining {
    pub title: Name,
    pub duration: Option<i64>,
}

impl CreateTraining {
    pub fn validate(self) -> Result<NewTraining, ValidationError> {
        Ok(NewTraining {
            title: Name::new("title", &self.title)?,
            duration: self.duration.map(check_duration).transpose()?,
        })
    }
}

/// Partial update payload
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrainingPatch {
    #[serde(default)]
    pub title: Patch<String>,
    #[serde(default)]
    pub duration: Patch<i64>,
}

impl TrainingPatch {
    pub fn validate(self) -> Result<TrainingChanges, ValidationError> {
        let title = match self.title.into_required("title")? {
            Some(title) => Some(Name::new("title", &title)?),
            None => None,
        };
        let duration = match self.duration.into_nullable() {
            Some(Some(d)) => Some(Some(check_duration(d)?)),
            other => other,
        };

        Ok(TrainingChanges { title, duration })
    }
}

/// Validated column changes for one training
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrainingChanges {
    pub title: Option<Name>,
    pub duration: Option<Option<i64>>,
}

impl TrainingChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.duration.is_none()
    }
}

fn check_duration(duration: i64) -> Result<i64, ValidationError> {
    if duration < 0 {
        return Err(ValidationError::OutOfRange {
            field: "duration",
            reason: "must not be negative",
        });
    }
    Ok(duration)
}
