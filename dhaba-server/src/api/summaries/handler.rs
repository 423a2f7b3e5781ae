use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Deserialize;

use shared::models::DailySummary;

use crate::core::ServerState;
use crate::summary::{Period, SummaryHistory};
use crate::utils::{AppError, AppResult};
use crate::utils::time::parse_date;

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    /// Business date, YYYY-MM-DD
    pub date: String,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    #[serde(default)]
    pub period: Period,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    30
}

/// POST /api/summaries/{restaurant_id}/generate
pub async fn generate(
    State(state): State<ServerState>,
    Path(restaurant_id): Path<String>,
    Json(payload): Json<GenerateRequest>,
) -> AppResult<Json<DailySummary>> {
    let date = parse_date(&payload.date)?;
    Ok(Json(state.aggregator.generate_daily(&restaurant_id, date)?))
}

/// GET /api/summaries/{restaurant_id}/history?period=daily|weekly|monthly&limit=30
pub async fn history(
    State(state): State<ServerState>,
    Path(restaurant_id): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> AppResult<Json<SummaryHistory>> {
    let limit = query.limit.clamp(1, 366);
    Ok(Json(state.aggregator.history(&restaurant_id, query.period, limit)?))
}

/// GET /api/summaries/{restaurant_id}/{date}
pub async fn get_by_date(
    State(state): State<ServerState>,
    Path((restaurant_id, date)): Path<(String, String)>,
) -> AppResult<Json<DailySummary>> {
    // Reject garbage keys before hitting storage
    parse_date(&date)?;
    let summary = state
        .storage
        .get_summary(&restaurant_id, &date)?
        .ok_or_else(|| {
            AppError::not_found(format!(
                "no summary for restaurant {} on {}",
                restaurant_id, date
            ))
        })?;
    Ok(Json(summary))
}
