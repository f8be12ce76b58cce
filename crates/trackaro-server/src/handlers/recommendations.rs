//! Recommendation handlers

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    Json,
};
use chrono::Utc;

use crate::{get_owner, AppError, AppState};
use trackaro_core::analysis::{
    goals_for_owner, recommend_for_owner, GoalsReport, RecommendationReport,
};

/// GET /api/recommendations - Savings scenarios and SIP projections
pub async fn get_recommendations(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<RecommendationReport>, AppError> {
    let owner = get_owner(request.headers());

    let report = recommend_for_owner(&state.db, &owner, Utc::now(), &state.config.analysis)?;

    Ok(Json(report))
}

/// GET /api/recommendations/goals - Savings goal sizing
pub async fn get_goals(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<GoalsReport>, AppError> {
    let owner = get_owner(request.headers());

    let report = goals_for_owner(&state.db, &owner, Utc::now(), &state.config.analysis)?;

    Ok(Json(report))
}
