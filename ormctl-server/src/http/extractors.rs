//! Custom Axum extractors
//!
//! Wrap axum's `Json`, `Form`, `Path` and `Query` so that every parse
//! failure is a 422 with the same JSON error body as the rest of the API.

use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::request::Parts;
use axum::{Form, Json};
use ormctl_core::ValidationError;
use serde::de::DeserializeOwned;

use super::error::ApiError;

fn malformed(location: &'static str, reason: String) -> ApiError {
    ApiError::Validation(ValidationError::Malformed { location, reason })
}

/// JSON body
pub struct ValidJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| malformed("body", rejection.body_text()))?;
        Ok(Self(value))
    }
}

/// `application/x-www-form-urlencoded` body
pub struct ValidForm<T>(pub T);

impl<T, S> FromRequest<S> for ValidForm<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Form(value) = Form::<T>::from_request(req, state)
            .await
            .map_err(|rejection| malformed("form", rejection.body_text()))?;
        Ok(Self(value))
    }
}

/// Path parameters
pub struct ValidPath<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| malformed("path", rejection.body_text()))?;
        Ok(Self(value))
    }
}

/// Query string
pub struct ValidQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| malformed("query", rejection.body_text()))?;
        Ok(Self(value))
    }
}
