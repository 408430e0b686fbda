use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    error::AppResult,
    middleware::{RequestId, UserId},
    models::{OutfitRecommendation, RecommendationMode, RecommendationRequest},
    routes::AppState,
    services::trends::MAX_TRENDS,
};

#[derive(Debug, Deserialize)]
pub struct AlternativesRequest {
    #[serde(flatten)]
    pub request: RecommendationRequest,
    pub base_outfit: String,
    #[serde(default)]
    pub insights: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AlternativesResponse {
    pub base_outfit: String,
    pub extra_recommendations: String,
    pub trends_used: Vec<String>,
}

/// Handler for the full recommendation pipeline
pub async fn generate_outfit(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    user: UserId,
    Json(request): Json<RecommendationRequest>,
) -> AppResult<Json<OutfitRecommendation>> {
    tracing::info!(
        request_id = %request_id,
        user = %user.as_str(),
        occasion = %request.occasion,
        mode = ?request.mode,
        "Processing outfit request"
    );

    let closet = state.closets.get(user.as_str()).await?;
    let preferences = state.preferences.get(user.as_str()).await?;

    let recommendation = state
        .recommendations
        .recommend(&closet, &request, &preferences)
        .await?;

    tracing::info!(
        request_id = %request_id,
        is_fallback = recommendation.is_fallback,
        "Outfit generated"
    );

    Ok(Json(recommendation))
}

/// Handler for alternatives to an already suggested outfit
pub async fn recommend_outfits(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    user: UserId,
    Json(body): Json<AlternativesRequest>,
) -> AppResult<Json<AlternativesResponse>> {
    let AlternativesRequest {
        request,
        base_outfit,
        insights,
    } = body;

    let closet = match request.mode {
        RecommendationMode::Closet => state.closets.get(user.as_str()).await?,
        RecommendationMode::General => Vec::new(),
    };

    let (mut trends, insights) = match (request.trends.clone(), insights) {
        (Some(trends), insights) => (trends, insights.unwrap_or_default()),
        (None, insights) => {
            let query = format!("{} {} fashion trends", request.occasion, request.style);
            match state.recommendations.trend_lookup().report(query.trim()).await {
                Ok(report) => (
                    report.current_trends,
                    insights.unwrap_or(report.insights),
                ),
                Err(e) => {
                    tracing::warn!(request_id = %request_id, error = %e, "Trend lookup failed, continuing without trends");
                    (Vec::new(), insights.unwrap_or_default())
                }
            }
        }
    };

    trends.truncate(MAX_TRENDS);

    let extra_recommendations = state
        .recommendations
        .suggest_alternatives(&closet, &request, &base_outfit, &trends, &insights)
        .await;

    tracing::info!(request_id = %request_id, trends = trends.len(), "Alternatives suggested");

    Ok(Json(AlternativesResponse {
        base_outfit,
        extra_recommendations,
        trends_used: trends,
    }))
}
