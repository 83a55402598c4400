//! Item endpoints

use std::collections::BTreeMap;

use axum::{
    extract::State,
    routing::{get, patch, post, put},
    Json, Router,
};
use ormctl_core::models::{CreateItem, Item, ItemChanges, ItemPatch, ItemReplace};
use ormctl_core::ValidationError;
use serde::Serialize;

use super::route_both;
use crate::http::error::ApiError;
use crate::http::extractors::{ValidJson, ValidPath};
use crate::http::state::AppState;

/// Confirmation body for deletes
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Bulk update summary
#[derive(Debug, Serialize)]
pub struct BulkUpdateResponse {
    pub message: String,
    pub updated_items: Vec<Item>,
}

/// GET /items - all items, oldest first
async fn list_items(State(state): State<AppState>) -> Result<Json<Vec<Item>>, ApiError> {
    let mut session = state.items().begin_read().await?;
    let items = session.list_items().await?;
    session.commit().await?;
    Ok(Json(items))
}

/// GET /items/{item_id}
async fn get_item(
    State(state): State<AppState>,
    ValidPath(item_id): ValidPath<i64>,
) -> Result<Json<Item>, ApiError> {
    let mut session = state.items().begin_read().await?;
    let item = session
        .get_item(item_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Item", item_id))?;
    session.commit().await?;
    Ok(Json(item))
}

/// POST /itemscreate (and POST /items)
async fn create_item(
    State(state): State<AppState>,
    ValidJson(body): ValidJson<CreateItem>,
) -> Result<Json<Item>, ApiError> {
    let new = body.validate()?;

    let mut session = state.items().begin().await?;
    let item = session.insert_item(&new).await?;
    session.commit().await?;

    tracing::info!(id = item.id, "item created");
    Ok(Json(item))
}

/// Apply one change set and return the re-read row
async fn apply_changes(
    state: &AppState,
    item_id: i64,
    changes: ItemChanges,
) -> Result<Json<Item>, ApiError> {
    let mut session = state.items().begin().await?;
    if !session.update_item(item_id, &changes).await? {
        return Err(ApiError::not_found("Item", item_id));
    }
    let item = session
        .get_item(item_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Item", item_id))?;
    session.commit().await?;
    Ok(Json(item))
}

/// PUT /items/{item_id} - only keys present in the body change
async fn update_item(
    State(state): State<AppState>,
    ValidPath(item_id): ValidPath<i64>,
    ValidJson(body): ValidJson<ItemPatch>,
) -> Result<Json<Item>, ApiError> {
    apply_changes(&state, item_id, body.validate()?).await
}

/// PUT /items/{item_id}/replace - null or absent values are dropped
async fn replace_item(
    State(state): State<AppState>,
    ValidPath(item_id): ValidPath<i64>,
    ValidJson(body): ValidJson<ItemReplace>,
) -> Result<Json<Item>, ApiError> {
    apply_changes(&state, item_id, body.validate()?).await
}

/// PATCH /items/bulk-update - all ids or nothing
async fn bulk_update(
    State(state): State<AppState>,
    ValidJson(body): ValidJson<BTreeMap<i64, ItemPatch>>,
) -> Result<Json<BulkUpdateResponse>, ApiError> {
    let changes = body
        .into_iter()
        .map(|(id, patch)| Ok((id, patch.validate()?)))
        .collect::<Result<Vec<_>, ValidationError>>()?;

    let mut session = state.items().begin().await?;
    let mut missing = Vec::new();
    let mut updated = Vec::with_capacity(changes.len());

    for (id, change) in &changes {
        if !session.update_item(*id, change).await? {
            missing.push(*id);
            continue;
        }
        if let Some(item) = session.get_item(*id).await? {
            updated.push(item);
        }
    }

    if !missing.is_empty() {
        session.rollback().await?;
        tracing::debug!(?missing, "bulk update rolled back");
        return Err(ApiError::MissingIds {
            resource: "Items",
            ids: missing,
        });
    }
    session.commit().await?;

    Ok(Json(BulkUpdateResponse {
        message: format!("Successfully updated {} items", updated.len()),
        updated_items: updated,
    }))
}

/// DELETE /items/{item_id}
async fn delete_item(
    State(state): State<AppState>,
    ValidPath(item_id): ValidPath<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    let mut session = state.items().begin().await?;
    if !session.delete_item(item_id).await? {
        return Err(ApiError::not_found("Item", item_id));
    }
    session.commit().await?;

    Ok(Json(MessageResponse {
        message: format!("Item {item_id} deleted successfully"),
    }))
}

/// Item routes
pub fn router() -> Router<AppState> {
    let router = Router::new();
    let router = route_both(router, "/items", get(list_items).post(create_item));
    let router = route_both(router, "/itemscreate", post(create_item));
    let router = route_both(router, "/items/bulk-update", patch(bulk_update));
    let router = route_both(
        router,
        "/items/{item_id}",
        get(get_item).put(update_item).delete(delete_item),
    );
    route_both(router, "/items/{item_id}/replace", put(replace_item))
}
