/*
 * Responsibility
 * - /expenses 系 CRUD handler
 * - AuthCtx (middleware で注入済み) から caller を受け取り、services::expenses に渡す
 * - update は body の検証 → id の解決 → 所有者チェックの順
 */
use axum::{
    Json,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
};
use chrono::Utc;

use crate::{
    api::{
        dto::expenses::{ExpensePayload, ExpenseResponse, ListExpensesQuery, MessageResponse},
        extractors::{AuthCtxExtractor, ExpenseId},
    },
    error::AppError,
    services::expenses,
    state::AppState,
};

pub async fn list_expenses(
    State(state): State<AppState>,
    AuthCtxExtractor(auth): AuthCtxExtractor,
    query: Result<Query<ListExpensesQuery>, QueryRejection>,
) -> Result<Json<Vec<ExpenseResponse>>, AppError> {
    let Query(query) = query.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let filter = query.into_filter(auth.user_id)?;

    let rows = expenses::list(state.expenses.as_ref(), &filter).await?;

    Ok(Json(rows.into_iter().map(ExpenseResponse::from).collect()))
}

pub async fn create_expense(
    State(state): State<AppState>,
    AuthCtxExtractor(auth): AuthCtxExtractor,
    body: Result<Json<ExpensePayload>, JsonRejection>,
) -> Result<Json<ExpenseResponse>, AppError> {
    let Json(req) = body?;
    let new = req.into_new_expense(auth.user_id, Utc::now())?;

    let row = expenses::create(state.expenses.as_ref(), new).await?;

    Ok(Json(row.into()))
}

pub async fn update_expense(
    State(state): State<AppState>,
    AuthCtxExtractor(auth): AuthCtxExtractor,
    expense_id: Result<ExpenseId, AppError>,
    body: Result<Json<ExpensePayload>, JsonRejection>,
) -> Result<Json<ExpenseResponse>, AppError> {
    let Json(req) = body?;
    let patch = req.into_patch()?;
    let expense_id = expense_id?;

    let row = expenses::update(state.expenses.as_ref(), expense_id.id, auth.user_id, &patch).await?;

    Ok(Json(row.into()))
}

pub async fn delete_expense(
    State(state): State<AppState>,
    AuthCtxExtractor(auth): AuthCtxExtractor,
    expense_id: ExpenseId,
) -> Result<Json<MessageResponse>, AppError> {
    expenses::delete(state.expenses.as_ref(), expense_id.id, auth.user_id).await?;

    Ok(Json(MessageResponse {
        msg: "Expense removed",
    }))
}
