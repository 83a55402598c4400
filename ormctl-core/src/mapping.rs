//! Row shapes shared by both storage backends.
//!
//! The async (sqlx) and blocking (rusqlite) sessions read the same columns
//! and hand them over as the plain row structs below, so timestamp parsing,
//! eager-load folding and UPDATE column lists live in one place.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::error::{MappingError, Result};
use crate::models::{
    Item, ItemChanges, RequestChanges, RequestWithTrainings, TrainingChanges, TrainingSummary,
};

/// Text layout SQLite uses for `CURRENT_TIMESTAMP`
pub const SQLITE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parse a stored timestamp. SQLite writes UTC without an offset; RFC 3339
/// is accepted too so rows written by other tools still load.
pub fn parse_timestamp(column: &'static str, value: &str) -> Result<DateTime<Utc>> {
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, SQLITE_TIMESTAMP_FORMAT) {
        return Ok(naive.and_utc());
    }
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| MappingError::invalid_timestamp(column, value))
}

pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format(SQLITE_TIMESTAMP_FORMAT).to_string()
}

/// Raw `items` row
#[derive(Debug, Clone)]
pub struct ItemRow {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: String,
}

impl TryFrom<ItemRow> for Item {
    type Error = MappingError;

    fn try_from(row: ItemRow) -> Result<Self> {
        Ok(Item {
            id: row.id,
            name: row.name,
            description: row.description,
            is_active: row.is_active,
            created_at: parse_timestamp("created_at", &row.created_at)?,
        })
    }
}

/// One row of `requests LEFT JOIN request_training LEFT JOIN trainings`.
/// Training columns are NULL for a request with no associations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTrainingRow {
    pub request_id: i64,
    pub request_name: String,
    pub training_id: Option<i64>,
    pub training_title: Option<String>,
}

/// Fold joined rows into one record per request.
///
/// Requests keep the order of their first row, trainings the order they
/// appear within a request. Repeated (request, training) pairs collapse.
pub fn fold_request_rows<I>(rows: I) -> Result<Vec<RequestWithTrainings>>
where
    I: IntoIterator<Item = RequestTrainingRow>,
{
    let mut out: Vec<RequestWithTrainings> = Vec::new();
    let mut index: HashMap<i64, usize> = HashMap::new();

    for row in rows {
        let slot = *index.entry(row.request_id).or_insert_with(|| {
            out.push(RequestWithTrainings {
                id: row.request_id,
                name: row.request_name.clone(),
                trainings: Vec::new(),
            });
            out.len() - 1
        });

        let training_id = match row.training_id {
            Some(id) => id,
            None => continue,
        };
        let title = row
            .training_title
            .ok_or(MappingError::UnexpectedNull { column: "title" })?;

        let trainings = &mut out[slot].trainings;
        if !trainings.iter().any(|t| t.id == training_id) {
            trainings.push(TrainingSummary {
                id: training_id,
                title,
            });
        }
    }

    Ok(out)
}

/// Bind value for a dynamically built UPDATE
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Bool(bool),
    Text(String),
}

impl From<Option<String>> for SqlValue {
    fn from(value: Option<String>) -> Self {
        value.map_or(SqlValue::Null, SqlValue::Text)
    }
}

impl From<Option<i64>> for SqlValue {
    fn from(value: Option<i64>) -> Self {
        value.map_or(SqlValue::Null, SqlValue::Integer)
    }
}

/// `SET column = ?` pairs for a change set, in a fixed column order.
/// Column names come back already quoted where SQL needs it.
pub trait Assignments {
    fn assignments(&self) -> Vec<(&'static str, SqlValue)>;
}

impl Assignments for ItemChanges {
    fn assignments(&self) -> Vec<(&'static str, SqlValue)> {
        let mut set = Vec::new();
        if let Some(name) = &self.name {
            set.push(("name", SqlValue::Text(name.as_str().to_owned())));
        }
        if let Some(description) = &self.description {
            set.push(("description", description.clone().into()));
        }
        if let Some(active) = self.is_active {
            set.push(("is_active", SqlValue::Bool(active)));
        }
        set
    }
}

impl Assignments for RequestChanges {
    fn assignments(&self) -> Vec<(&'static str, SqlValue)> {
        let mut set = Vec::new();
        if let Some(name) = &self.name {
            set.push(("name", SqlValue::Text(name.as_str().to_owned())));
        }
        if let Some(description) = &self.description {
            set.push(("description", description.clone().into()));
        }
        // reserved word
        if let Some(group) = &self.group {
            set.push(("\"group\"", group.clone().into()));
        }
        set
    }
}

impl Assignments for TrainingChanges {
    fn assignments(&self) -> Vec<(&'static str, SqlValue)> {
        let mut set = Vec::new();
        if let Some(title) = &self.title {
            set.push(("title", SqlValue::Text(title.as_str().to_owned())));
        }
        if let Some(duration) = self.duration {
            set.push(("duration", duration.into()));
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Name;
    use chrono::{Datelike, Timelike};

    fn row(request_id: i64, training: Option<(i64, &str)>) -> RequestTrainingRow {
        RequestTrainingRow {
            request_id,
            request_name: format!("request {request_id}"),
            training_id: training.map(|(id, _)| id),
            training_title: training.map(|(_, t)| t.to_string()),
        }
    }

    #[test]
    fn parses_sqlite_timestamp() {
        let ts = parse_timestamp("created_at", "2024-03-01 12:30:05").unwrap();
        assert_eq!((ts.year(), ts.month(), ts.day()), (2024, 3, 1));
        assert_eq!((ts.hour(), ts.minute(), ts.second()), (12, 30, 5));
        assert_eq!(format_timestamp(&ts), "2024-03-01 12:30:05");
    }

    #[test]
    fn parses_rfc3339_timestamp() {
        let ts = parse_timestamp("created_at", "2024-03-01T14:30:05+02:00").unwrap();
        assert_eq!(ts.hour(), 12);
    }

    #[test]
    fn rejects_garbage_timestamp() {
        let err = parse_timestamp("created_at", "not a date").unwrap_err();
        assert_eq!(
            err,
            MappingError::InvalidTimestamp {
                column: "created_at",
                value: "not a date".into()
            }
        );
    }

    #[test]
    fn item_row_maps() {
        let item = Item::try_from(ItemRow {
            id: 7,
            name: "lamp".into(),
            description: None,
            is_active: true,
            created_at: "2024-01-02 03:04:05".into(),
        })
        .unwrap();
        assert_eq!(item.id, 7);
        assert!(item.is_active);
        assert_eq!(
            serde_json::to_value(&item).unwrap()["created_at"],
            "2024-01-02T03:04:05Z"
        );
    }

    #[test]
    fn fold_groups_trainings() {
        let rows = vec![
            row(1, Some((10, "Safety"))),
            row(1, Some((11, "Forklift"))),
            row(2, None),
            row(3, Some((10, "Safety"))),
        ];
        let folded = fold_request_rows(rows).unwrap();

        assert_eq!(folded.len(), 3);
        assert_eq!(folded[0].trainings.len(), 2);
        assert_eq!(folded[0].trainings[1].title, "Forklift");
        assert!(folded[1].trainings.is_empty());
        assert_eq!(folded[2].trainings[0].id, 10);
    }

    #[test]
    fn fold_rejects_missing_title() {
        let rows = vec![RequestTrainingRow {
            request_id: 1,
            request_name: "r".into(),
            training_id: Some(4),
            training_title: None,
        }];
        assert!(fold_request_rows(rows).is_err());
    }

    #[test]
    fn assignments_follow_changes() {
        let changes = RequestChanges {
            name: Some(Name::new("name", "new").unwrap()),
            description: None,
            group: Some(None),
        };
        assert_eq!(
            changes.assignments(),
            vec![
                ("name", SqlValue::Text("new".into())),
                ("\"group\"", SqlValue::Null),
            ]
        );

        assert!(ItemChanges::default().assignments().is_empty());

        let changes = TrainingChanges {
            title: None,
            duration: Some(Some(90)),
        };
        assert_eq!(
            changes.assignments(),
            vec![("duration", SqlValue::Integer(90))]
        );
    }
}
