//! Chat and classification handlers

use std::sync::Arc;

use axum::{
    extract::{Query, Request, State},
    Json,
};
use chrono::Utc;
use serde::Deserialize;

use crate::{get_owner, parse_json_body, AppError, AppState, MAX_PAGE_LIMIT};
use trackaro_core::ai::{AIBackend, AIClient, MessageClassification};
use trackaro_core::chat::{ChatReply, ChatService};
use trackaro_core::models::ChatLogEntry;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    #[serde(default = "default_history_limit")]
    pub limit: i64,
}

fn default_history_limit() -> i64 {
    20
}

fn require_ai(state: &AppState) -> Result<&AIClient, AppError> {
    state
        .ai
        .as_ref()
        .ok_or_else(|| AppError::service_unavailable("AI backend not configured"))
}

/// POST /api/chat - Record an expense or answer a spending question
pub async fn chat(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<ChatReply>, AppError> {
    let owner = get_owner(request.headers());
    let req: ChatRequest = parse_json_body(request.into_body()).await?;
    let ai = require_ai(&state)?;

    let service = ChatService::new(&state.db, ai, &state.config.analysis);
    let reply = service.handle_message(&owner, &req.message, Utc::now()).await?;

    Ok(Json(reply))
}

/// POST /api/classify - Classify a message without acting on it
pub async fn classify(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<MessageClassification>, AppError> {
    let req: ChatRequest = parse_json_body(request.into_body()).await?;
    if req.message.trim().is_empty() {
        return Err(AppError::bad_request("message must not be empty"));
    }
    let ai = require_ai(&state)?;

    let classification = ai.classify_message(req.message.trim()).await?;

    Ok(Json(classification))
}

/// GET /api/chat/history - Recent chat messages
pub async fn chat_history(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HistoryQuery>,
    request: Request,
) -> Result<Json<Vec<ChatLogEntry>>, AppError> {
    let owner = get_owner(request.headers());
    let limit = params.limit.clamp(1, MAX_PAGE_LIMIT);

    let history = state.db.list_chat_messages(&owner, limit)?;

    Ok(Json(history))
}
