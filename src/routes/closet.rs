use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    middleware::{RequestId, UserId},
    routes::AppState,
};

#[derive(Debug, Deserialize)]
pub struct ClosetItemRequest {
    pub item: String,
}

#[derive(Debug, Serialize)]
pub struct ClosetResponse {
    pub items: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ClosetItemResponse {
    pub message: String,
    pub item: String,
}

fn clean_item(request: &ClosetItemRequest) -> AppResult<String> {
    let item = request.item.trim();
    if item.is_empty() {
        return Err(AppError::InvalidInput("Item must not be empty".to_string()));
    }
    Ok(item.to_string())
}

/// Handler for listing the caller's closet
pub async fn get_closet(
    State(state): State<Arc<AppState>>,
    user: UserId,
) -> AppResult<Json<ClosetResponse>> {
    let items = state.closets.get(user.as_str()).await?;
    Ok(Json(ClosetResponse { items }))
}

/// Handler for adding one item to the caller's closet
pub async fn add_item(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    user: UserId,
    Json(request): Json<ClosetItemRequest>,
) -> AppResult<Json<ClosetItemResponse>> {
    let item = clean_item(&request)?;
    state.closets.add_item(user.as_str(), &item).await?;

    tracing::info!(request_id = %request_id, user = %user.as_str(), item = %item, "Closet item added");

    Ok(Json(ClosetItemResponse {
        message: "Item added to closet".to_string(),
        item,
    }))
}

/// Handler for removing one item from the caller's closet
pub async fn remove_item(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    user: UserId,
    Json(request): Json<ClosetItemRequest>,
) -> AppResult<Json<ClosetItemResponse>> {
    let item = clean_item(&request)?;

    if !state.closets.remove_item(user.as_str(), &item).await? {
        return Err(AppError::NotFound(format!("Item not found in closet: {}", item)));
    }

    tracing::info!(request_id = %request_id, user = %user.as_str(), item = %item, "Closet item removed");

    Ok(Json(ClosetItemResponse {
        message: "Item removed from closet".to_string(),
        item,
    }))
}
