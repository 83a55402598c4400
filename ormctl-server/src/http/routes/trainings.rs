//! Training endpoints

use axum::{extract::State, routing::get, Json, Router};
use ormctl_core::models::{CreateTraining, RequestSummary, Training, TrainingPatch};

use super::items::MessageResponse;
use super::route_both;
use crate::http::error::ApiError;
use crate::http::extractors::{ValidJson, ValidPath};
use crate::http::state::AppState;

/// GET /trainings
async fn list_trainings(State(state): State<AppState>) -> Result<Json<Vec<Training>>, ApiError> {
    let mut session = state.relations().begin_read().await?;
    let trainings = session.list_trainings().await?;
    session.commit().await?;
    Ok(Json(trainings))
}

/// POST /trainings
async fn create_training(
    State(state): State<AppState>,
    ValidJson(body): ValidJson<CreateTraining>,
) -> Result<Json<Training>, ApiError> {
    let new = body.validate()?;

    let mut session = state.relations().begin().await?;
    let training = session.insert_training(&new).await?;
    session.commit().await?;

    tracing::info!(id = training.id, "training created");
    Ok(Json(training))
}

/// GET /trainings/{training_id}
async fn get_training(
    State(state): State<AppState>,
    ValidPath(training_id): ValidPath<i64>,
) -> Result<Json<Training>, ApiError> {
    let mut session = state.relations().begin_read().await?;
    let training = session
        .get_training(training_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Training", training_id))?;
    session.commit().await?;
    Ok(Json(training))
}

/// PUT /trainings/{training_id}
async fn update_training(
    State(state): State<AppState>,
    ValidPath(training_id): ValidPath<i64>,
    ValidJson(body): ValidJson<TrainingPatch>,
) -> Result<Json<Training>, ApiError> {
    let changes = body.validate()?;

    let mut session = state.relations().begin().await?;
    if !session.update_training(training_id, &changes).await? {
        return Err(ApiError::not_found("Training", training_id));
    }
    let training = session
        .get_training(training_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Training", training_id))?;
    session.commit().await?;
    Ok(Json(training))
}

/// DELETE /trainings/{training_id} - links to requests go with it
async fn delete_training(
    State(state): State<AppState>,
    ValidPath(training_id): ValidPath<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    let mut session = state.relations().begin().await?;
    if !session.delete_training(training_id).await? {
        return Err(ApiError::not_found("Training", training_id));
    }
    session.commit().await?;

    Ok(Json(MessageResponse {
        message: format!("Training {training_id} deleted successfully"),
    }))
}

/// GET /trainings/{training_id}/requests
async fn training_requests(
    State(state): State<AppState>,
    ValidPath(training_id): ValidPath<i64>,
) -> Result<Json<Vec<RequestSummary>>, ApiError> {
    let mut session = state.relations().begin_read().await?;
    if session.get_training(training_id).await?.is_none() {
        return Err(ApiError::not_found("Training", training_id));
    }
    let requests = session.list_training_requests(training_id).await?;
    session.commit().await?;
    Ok(Json(requests))
}

/// Training routes
pub fn router() -> Router<AppState> {
    let router = Router::new();
    let router = route_both(router, "/trainings", get(list_trainings).post(create_training));
    let router = route_both(
        router,
        "/trainings/{training_id}",
        get(get_training).put(update_training).delete(delete_training),
    );
    route_both(router, "/trainings/{training_id}/requests", get(training_requests))
}
