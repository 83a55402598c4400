//! Sign-up form fields: email, username and an optional website

use serde::{Deserialize, Serialize};
use url::Url;

use super::ValidationError;

const USERNAME_MIN: usize = 3;
const USERNAME_MAX: usize = 50;
const URL_MAX: usize = 2083;

/// Email address; the domain part is lowercased
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// # Rules
    /// - Exactly one `@`, no whitespace
    /// - Non-empty local part
    /// - Domain of at least two non-empty dot-separated labels
    ///
    /// # Example
    /// ```
    /// use ormctl_core::models::Email;
    ///
    /// assert_eq!(Email::new("ada@Example.COM").unwrap().as_str(), "ada@example.com");
    /// assert!(Email::new("ada@localhost").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let invalid = ValidationError::Invalid {
            field: "email",
            reason: "value is not a valid email address",
        };

        let s = s.trim();
        if s.is_empty() {
            return Err(ValidationError::Empty { field: "email" });
        }
        if s.chars().any(char::is_whitespace) {
            return Err(invalid);
        }

        let (local, domain) = s.split_once('@').ok_or_else(|| invalid.clone())?;
        if local.is_empty() || domain.contains('@') {
            return Err(invalid);
        }

        let labels: Vec<&str> = domain.split('.').collect();
        if labels.len() < 2 || labels.iter().any(|label| label.is_empty()) {
            return Err(invalid);
        }

        Ok(Self(format!("{}@{}", local, domain.to_lowercase())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Alphanumeric username, 3 to 50 characters
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let len = s.chars().count();
        if len == 0 {
            return Err(ValidationError::Empty { field: "username" });
        }
        if len < USERNAME_MIN {
            return Err(ValidationError::Invalid {
                field: "username",
                reason: "must be at least 3 characters",
            });
        }
        if len > USERNAME_MAX {
            return Err(ValidationError::TooLong {
                field: "username",
                max: USERNAME_MAX,
            });
        }
        if !s.chars().all(char::is_alphanumeric) {
            return Err(ValidationError::Invalid {
                field: "username",
                reason: "must be alphanumeric",
            });
        }
        Ok(Self(s.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Parse an absolute http(s) URL; the result is normalized (`https://a.io`
/// becomes `https://a.io/`).
pub fn parse_website(s: &str) -> Result<Url, ValidationError> {
    if s.chars().count() > URL_MAX {
        return Err(ValidationError::TooLong {
            field: "website",
            max: URL_MAX,
        });
    }

    let url = Url::parse(s.trim()).map_err(|_| ValidationError::Invalid {
        field: "website",
        reason: "input should be a valid URL",
    })?;

    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(ValidationError::Invalid {
            field: "website",
            reason: "URL scheme should be 'http' or 'https'",
        });
    }
    Ok(url)
}

/// How a form submission is echoed back
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    #[default]
    Json,
    Text,
    File,
}

/// Form payload as posted
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitForm {
    pub email: String,
    pub username: String,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub response_type: ResponseFormat,
}

/// Validated form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub email: Email,
    pub username: Username,
    pub website: Option<Url>,
}

impl SubmitForm {
    /// An empty `website` field counts as absent.
    pub fn validate(self) -> Result<(User, ResponseFormat), ValidationError> {
        let website = match self.website.as_deref() {
            None | Some("") => None,
            Some(raw) => Some(parse_website(raw)?),
        };

        let user = User {
            email: Email::new(&self.email)?,
            username: Username::new(&self.username)?,
            website,
        };
        Ok((user, self.response_type))
    }
}
