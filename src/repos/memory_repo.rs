//! In-process expense store.
//!
//! Backs local development when no `DATABASE_URL` is configured, and the HTTP
//! test suite. Contents are lost on restart.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{Expense, ExpenseFilter, ExpensePatch, NewExpense};
use crate::repos::{error::RepoError, expense_repo::ExpenseRepo};

#[derive(Clone, Debug, Default)]
pub struct MemoryExpenseRepo {
    rows: Arc<RwLock<Vec<Expense>>>,
}

impl MemoryExpenseRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ExpenseRepo for MemoryExpenseRepo {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn list(&self, filter: &ExpenseFilter) -> Result<Vec<Expense>, RepoError> {
        let rows = self.rows.read().await;
        let mut out: Vec<Expense> = rows.iter().filter(|e| filter.matches(e)).cloned().collect();
        // stable: equal dates keep insertion order
        out.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(out)
    }

    async fn create(&self, new: NewExpense) -> Result<Expense, RepoError> {
        let expense = new.into_expense(Uuid::new_v4());
        self.rows.write().await.push(expense.clone());
        Ok(expense)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Expense>, RepoError> {
        let rows = self.rows.read().await;
        Ok(rows.iter().find(|e| e.id == id).cloned())
    }

    async fn update(&self, id: Uuid, patch: &ExpensePatch) -> Result<Option<Expense>, RepoError> {
        let mut rows = self.rows.write().await;
        let Some(expense) = rows.iter_mut().find(|e| e.id == id) else {
            return Ok(None);
        };
        patch.apply(expense);
        Ok(Some(expense.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, RepoError> {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|e| e.id != id);
        Ok(rows.len() < before)
    }
}
