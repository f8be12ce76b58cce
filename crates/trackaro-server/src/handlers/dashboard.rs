//! Dashboard handler

use std::sync::Arc;

use axum::{
    extract::{Query, Request, State},
    Json,
};
use chrono::Utc;
use serde::Deserialize;

use crate::{get_owner, AppError, AppState};
use trackaro_core::models::DashboardSummary;

#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    /// Window length; the configured analysis window when absent
    pub days: Option<u32>,
}

/// GET /api/dashboard - Spending summary for the trailing window
pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DashboardQuery>,
    request: Request,
) -> Result<Json<DashboardSummary>, AppError> {
    let owner = get_owner(request.headers());
    let days = params.days.unwrap_or(state.config.analysis.window_days);

    let dashboard = state.db.get_dashboard(&owner, Utc::now(), days)?;

    Ok(Json(dashboard))
}
