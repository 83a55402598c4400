//! Endpoints without a database behind them: query and form validation,
//! and hand-built error responses.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use ormctl_core::models::{ResponseFormat, SearchParams, SubmitForm};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::route_both;
use crate::http::error::ApiError;
use crate::http::extractors::{ValidForm, ValidQuery};
use crate::http::state::AppState;

/// Success envelope
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub data: Option<T>,
    pub message: String,
    pub status: bool,
}

/// GET /search?query=..&query=..&filter_type=..&page=..
async fn search(
    ValidQuery(pairs): ValidQuery<Vec<(String, String)>>,
) -> Result<Json<Envelope<Vec<SearchParams>>>, ApiError> {
    let params = SearchParams::from_pairs(pairs)?;
    Ok(Json(Envelope {
        data: Some(vec![params]),
        message: "Search results".into(),
        status: true,
    }))
}

/// POST /submit (form-encoded)
async fn submit(ValidForm(form): ValidForm<SubmitForm>) -> Result<Response, ApiError> {
    let (user, format) = form.validate()?;
    tracing::info!(username = user.username.as_str(), ?format, "form submitted");

    let content = json!({ "user": user });
    let response = match format {
        ResponseFormat::Json => (StatusCode::CREATED, Json(content)).into_response(),
        ResponseFormat::Text => (
            StatusCode::CREATED,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            format!("{content:#}"),
        )
            .into_response(),
        ResponseFormat::File => (
            [
                (header::CONTENT_TYPE, "text/plain; charset=utf-8"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"response.txt\"",
                ),
            ],
            format!("{content:#}"),
        )
            .into_response(),
    };
    Ok(response)
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    Client,
    Server,
    Custom,
}

#[derive(Debug, Deserialize)]
pub struct ErrorDemoParams {
    pub error_type: ErrorKind,
}

/// GET /error-demo?error_type=client|server|custom
async fn error_demo(ValidQuery(params): ValidQuery<ErrorDemoParams>) -> Response {
    tracing::debug!(kind = ?params.error_type, "error demo");
    match params.error_type {
        ErrorKind::Client => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "detail": { "message": "Item not found", "status": false } })),
        )
            .into_response(),
        ErrorKind::Server => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "detail": { "message": "Server error demonstration", "status": false }
            })),
        )
            .into_response(),
        ErrorKind::Custom => (
            StatusCode::IM_A_TEAPOT,
            Json(json!({ "message": "I'm a teapot!" })),
        )
            .into_response(),
    }
}

/// Demo routes
pub fn router() -> Router<AppState> {
    let router = Router::new();
    let router = route_both(router, "/search", get(search));
    let router = route_both(router, "/submit", post(submit));
    route_both(router, "/error-demo", get(error_demo))
}
