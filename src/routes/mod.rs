use std::sync::Arc;

use axum::{
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{make_span_with_request_id, request_id_middleware};

pub mod closet;
pub mod outfits;
pub mod preferences;
pub mod products;
pub mod state;
pub mod trends;

pub use state::AppState;

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/closet", get(closet::get_closet))
        .route(
            "/closet/items",
            post(closet::add_item).delete(closet::remove_item),
        )
        .route(
            "/preferences",
            get(preferences::get_preferences).post(preferences::update_preferences),
        )
        .route("/generate-outfit", post(outfits::generate_outfit))
        .route("/recommend-outfits", post(outfits::recommend_outfits))
        .route("/analyze-trends", post(trends::analyze_trends))
        .route("/search-products", post(products::search_products))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
