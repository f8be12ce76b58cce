//! Health check handler

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub ai_configured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_backend: Option<&'static str>,
}

/// GET /api/health - Liveness and AI configuration
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        ai_configured: state.ai.is_some(),
        ai_backend: state.ai.as_ref().map(|ai| ai.backend_name()),
    })
}
