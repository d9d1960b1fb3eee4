/*
 * Responsibility
 * - API の URL 構造を定義
 * - /expenses 系は全て認証必須 (auth gate を route_layer で適用)
 */
use axum::{
    Router,
    routing::{get, put},
};

use crate::middleware;
use crate::state::AppState;

use crate::api::handlers::expenses::{
    create_expense, delete_expense, list_expenses, update_expense,
};

pub fn routes(state: AppState) -> Router<AppState> {
    let expenses = Router::new()
        .route("/expenses", get(list_expenses).post(create_expense))
        .route("/expenses/{id}", put(update_expense).delete(delete_expense));

    middleware::auth::apply(expenses, state)
}
