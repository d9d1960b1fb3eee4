/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - expenses: 永続化 (Postgres or in-memory)
 *   - auth: 起動時に固定された secret を持つ TokenVerifier
 * - Clone 前提で持つ (内部は Arc)
 */
use std::sync::Arc;

use crate::repos::ExpenseRepo;
use crate::services::auth::TokenVerifier;

#[derive(Clone)]
pub struct AppState {
    pub expenses: Arc<dyn ExpenseRepo>,
    pub auth: Arc<TokenVerifier>,
}

impl AppState {
    pub fn new(expenses: Arc<dyn ExpenseRepo>, auth: Arc<TokenVerifier>) -> Self {
        Self { expenses, auth }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("expenses", &self.expenses.backend_name())
            .field("auth", &self.auth)
            .finish()
    }
}
