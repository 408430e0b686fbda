use axum::{extract::State, Json};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    error::AppResult,
    middleware::UserId,
    models::{PreferenceRecord, PreferenceUpdate},
    routes::AppState,
};

#[derive(Debug, Deserialize)]
pub struct UpdatePreferencesRequest {
    pub preferences: PreferenceUpdate,
}

/// Handler for reading the caller's preferences
pub async fn get_preferences(
    State(state): State<Arc<AppState>>,
    user: UserId,
) -> AppResult<Json<PreferenceRecord>> {
    let record = state.preferences.get(user.as_str()).await?;
    Ok(Json(record))
}

/// Handler for merging a partial preference update
pub async fn update_preferences(
    State(state): State<Arc<AppState>>,
    user: UserId,
    Json(request): Json<UpdatePreferencesRequest>,
) -> AppResult<Json<PreferenceRecord>> {
    let record = state
        .preferences
        .set(user.as_str(), request.preferences)
        .await?;

    tracing::info!(user = %user.as_str(), "Preferences updated");

    Ok(Json(record))
}
