//! Search query parameters
//!
//! `query` may repeat (`?query=a&query=b`); one occurrence stays a string,
//! several become a list.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterType {
    Category,
    Tag,
    Location,
}

impl FromStr for FilterType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "category" => Ok(Self::Category),
            "tag" => Ok(Self::Tag),
            "location" => Ok(Self::Location),
            _ => Err(ValidationError::Invalid {
                field: "filter_type",
                reason: "must be one of 'category', 'tag', 'location'",
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SearchTerms {
    One(String),
    Many(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchParams {
    pub query: SearchTerms,
    pub filter_type: Option<FilterType>,
    pub page: u32,
}

impl SearchParams {
    /// Build from decoded query-string pairs. Unknown keys are ignored; for
    /// `filter_type` and `page` the last occurrence wins.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut terms = Vec::new();
        let mut filter_type = None;
        let mut page = None;

        for (key, value) in pairs {
            let value = value.as_ref();
            match key.as_ref() {
                "query" => terms.push(value.to_owned()),
                "filter_type" => filter_type = Some(value.parse::<FilterType>()?),
                "page" => page = Some(parse_page(value)?),
                _ => {}
            }
        }

        let query = match terms.len() {
            0 => {
                return Err(ValidationError::Malformed {
                    location: "query",
                    reason: "missing field `query`".into(),
                })
            }
            1 => SearchTerms::One(terms.remove(0)),
            _ => SearchTerms::Many(terms),
        };

        Ok(Self {
            query,
            filter_type,
            page: page.unwrap_or(1),
        })
    }
}

fn parse_page(raw: &str) -> Result<u32, ValidationError> {
    let page: i64 = raw.parse().map_err(|_| ValidationError::Malformed {
        location: "query",
        reason: format!("page: `{raw}` is not an integer"),
    })?;
    if page < 1 {
        return Err(ValidationError::OutOfRange {
            field: "page",
            reason: "must be at least 1",
        });
    }
    u32::try_from(page).map_err(|_| ValidationError::OutOfRange {
        field: "page",
        reason: "too large",
    })
}
