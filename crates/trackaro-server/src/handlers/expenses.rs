//! Expense handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, Request, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{get_owner, parse_json_body, AppError, AppState, SuccessResponse, MAX_PAGE_LIMIT};
use trackaro_core::models::{ExpenseRecord, NewExpense};

/// Query parameters for listing expenses
#[derive(Debug, Deserialize)]
pub struct ExpenseQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

#[derive(Serialize)]
pub struct ExpenseListResponse {
    pub expenses: Vec<ExpenseRecord>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

/// GET /api/expenses - List expenses, newest first
pub async fn list_expenses(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ExpenseQuery>,
    request: Request,
) -> Result<Json<ExpenseListResponse>, AppError> {
    let owner = get_owner(request.headers());

    // Input validation: clamp pagination parameters
    let limit = params.limit.clamp(1, MAX_PAGE_LIMIT);
    let offset = params.offset.max(0);

    let expenses = state.db.list_expenses(&owner, limit, offset)?;
    let total = state.db.count_expenses(&owner)?;

    Ok(Json(ExpenseListResponse {
        expenses,
        total,
        limit,
        offset,
    }))
}

/// POST /api/expenses - Record an expense
pub async fn create_expense(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<ExpenseRecord>, AppError> {
    let owner = get_owner(request.headers());
    let new_expense: NewExpense = parse_json_body(request.into_body()).await?;

    let id = state.db.insert_expense(&owner, &new_expense)?;
    info!(id, owner = %owner, "Created expense");

    let expense = state
        .db
        .get_expense(&owner, id)?
        .ok_or_else(|| AppError::internal("Expense disappeared after insert"))?;

    Ok(Json(expense))
}

/// GET /api/expenses/:id - Get a single expense
pub async fn get_expense(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<ExpenseRecord>, AppError> {
    let owner = get_owner(request.headers());

    let expense = state
        .db
        .get_expense(&owner, id)?
        .ok_or_else(|| AppError::not_found("Expense not found"))?;

    Ok(Json(expense))
}

/// DELETE /api/expenses/:id - Delete an expense
pub async fn delete_expense(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<SuccessResponse>, AppError> {
    let owner = get_owner(request.headers());

    if !state.db.delete_expense(&owner, id)? {
        return Err(AppError::not_found("Expense not found"));
    }
    info!(id, owner = %owner, "Deleted expense");

    Ok(Json(SuccessResponse { success: true }))
}
