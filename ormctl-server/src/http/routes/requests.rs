//! Request endpoints and request ↔ training links

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use ormctl_core::models::{CreateRequest, Request, RequestPatch, RequestWithTrainings};

use super::items::MessageResponse;
use super::route_both;
use crate::db::DbError;
use crate::http::error::ApiError;
use crate::http::extractors::{ValidJson, ValidPath};
use crate::http::state::AppState;

/// Ids unlinked by `GET /sample`
const SAMPLE_LINK: (i64, i64) = (1, 3);

/// GET /requests - every request with its trainings, one query
async fn list_requests(
    State(state): State<AppState>,
) -> Result<Json<Vec<RequestWithTrainings>>, ApiError> {
    let mut session = state.relations().begin_read().await?;
    let requests = session.list_requests_with_trainings().await?;
    session.commit().await?;
    Ok(Json(requests))
}

/// POST /requests
async fn create_request(
    State(state): State<AppState>,
    ValidJson(body): ValidJson<CreateRequest>,
) -> Result<Json<Request>, ApiError> {
    let new = body.validate()?;

    let mut session = state.relations().begin().await?;
    let request = session.insert_request(&new).await?;
    session.commit().await?;

    tracing::info!(id = request.id, "request created");
    Ok(Json(request))
}

/// GET /requests/{request_id}
async fn get_request(
    State(state): State<AppState>,
    ValidPath(request_id): ValidPath<i64>,
) -> Result<Json<RequestWithTrainings>, ApiError> {
    let mut session = state.relations().begin_read().await?;
    let request = session
        .get_request_with_trainings(request_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Request", request_id))?;
    session.commit().await?;
    Ok(Json(request))
}

/// PUT /requests/{request_id}
async fn update_request(
    State(state): State<AppState>,
    ValidPath(request_id): ValidPath<i64>,
    ValidJson(body): ValidJson<RequestPatch>,
) -> Result<Json<Request>, ApiError> {
    let changes = body.validate()?;

    let mut session = state.relations().begin().await?;
    if !session.update_request(request_id, &changes).await? {
        return Err(ApiError::not_found("Request", request_id));
    }
    let request = session
        .get_request(request_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Request", request_id))?;
    session.commit().await?;
    Ok(Json(request))
}

/// DELETE /requests/{request_id}
async fn delete_request(
    State(state): State<AppState>,
    ValidPath(request_id): ValidPath<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    let mut session = state.relations().begin().await?;
    if !session.delete_request(request_id).await? {
        return Err(ApiError::not_found("Request", request_id));
    }
    session.commit().await?;

    Ok(Json(MessageResponse {
        message: format!("Request {request_id} deleted successfully"),
    }))
}

/// POST /requests/{request_id}/trainings/{training_id}
async fn associate(
    State(state): State<AppState>,
    ValidPath((request_id, training_id)): ValidPath<(i64, i64)>,
) -> Result<Json<MessageResponse>, ApiError> {
    let mut session = state.relations().begin().await?;
    if session.get_request(request_id).await?.is_none() {
        return Err(ApiError::not_found("Request", request_id));
    }
    if session.get_training(training_id).await?.is_none() {
        return Err(ApiError::not_found("Training", training_id));
    }

    session
        .associate(request_id, training_id)
        .await
        .map_err(|e| match e {
            DbError::Conflict(_) => ApiError::Conflict {
                message: format!(
                    "Request {request_id} is already linked to training {training_id}"
                ),
            },
            other => other.into(),
        })?;
    session.commit().await?;

    tracing::info!(request_id, training_id, "association created");
    Ok(Json(MessageResponse {
        message: "Association created successfully".into(),
    }))
}

/// Drop one link and return what the request still requires. An unknown
/// training or a pair that was never linked changes nothing.
async fn unlink(
    state: &AppState,
    request_id: i64,
    training_id: i64,
) -> Result<Json<RequestWithTrainings>, ApiError> {
    let mut session = state.relations().begin().await?;
    if session.get_request(request_id).await?.is_none() {
        return Err(ApiError::not_found("Request", request_id));
    }

    if session.disassociate(request_id, training_id).await? {
        tracing::info!(request_id, training_id, "association removed");
    }

    let request = session
        .get_request_with_trainings(request_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Request", request_id))?;
    session.commit().await?;
    Ok(Json(request))
}

/// DELETE /requests/{request_id}/trainings/{training_id}
async fn disassociate(
    State(state): State<AppState>,
    ValidPath((request_id, training_id)): ValidPath<(i64, i64)>,
) -> Result<Json<RequestWithTrainings>, ApiError> {
    unlink(&state, request_id, training_id).await
}

/// GET /sample - unlink the fixed demo pair
async fn sample(State(state): State<AppState>) -> Result<Json<RequestWithTrainings>, ApiError> {
    let (request_id, training_id) = SAMPLE_LINK;
    unlink(&state, request_id, training_id).await
}

/// Request routes
pub fn router() -> Router<AppState> {
    let router = Router::new();
    let router = route_both(router, "/requests", get(list_requests).post(create_request));
    let router = route_both(
        router,
        "/requests/{request_id}",
        get(get_request).put(update_request).delete(delete_request),
    );
    let router = route_both(
        router,
        "/requests/{request_id}/trainings/{training_id}",
        post(associate).delete(disassociate),
    );
    route_both(router, "/sample", get(sample))
}
