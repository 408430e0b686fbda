use axum::{extract::State, Extension, Json};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    middleware::RequestId,
    models::TrendReport,
    routes::AppState,
};

pub const DEFAULT_TREND_QUERY: &str = "current fashion trends";

#[derive(Debug, Default, Deserialize)]
pub struct AnalyzeTrendsRequest {
    #[serde(default)]
    pub query: Option<String>,
}

/// Handler for a filtered trend report
pub async fn analyze_trends(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    body: Option<Json<AnalyzeTrendsRequest>>,
) -> AppResult<Json<TrendReport>> {
    let query = body
        .and_then(|Json(request)| request.query)
        .map(|query| query.trim().to_string())
        .filter(|query| !query.is_empty())
        .unwrap_or_else(|| DEFAULT_TREND_QUERY.to_string());

    tracing::info!(request_id = %request_id, query = %query, "Analyzing trends");

    let report = state
        .recommendations
        .trend_lookup()
        .report(&query)
        .await
        .map_err(|e| match e {
            AppError::ExternalApi(_) => e,
            other => AppError::ExternalApi(other.to_string()),
        })?;

    Ok(Json(report))
}
