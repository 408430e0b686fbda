use axum::{extract::State, Json};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::ProductSearchResult,
    routes::AppState,
};

#[derive(Debug, Deserialize)]
pub struct SearchProductsRequest {
    pub outfit: String,
}

/// Handler for shopping links of an outfit description
pub async fn search_products(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SearchProductsRequest>,
) -> AppResult<Json<ProductSearchResult>> {
    let outfit = request.outfit.trim();
    if outfit.is_empty() {
        return Err(AppError::InvalidInput("Outfit description must not be empty".to_string()));
    }

    let result = state.recommendations.product_lookup().search_result(outfit).await?;
    Ok(Json(result))
}
