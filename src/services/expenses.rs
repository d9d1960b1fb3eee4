/*
 * Responsibility
 * - expenses のユースケース (list / create / update / delete)
 * - 所有者チェック (fetch_authorized) を一か所に集約する
 *
 * Notes
 * - update/delete は fetch → owner check → write の順。ロックは取らない
 *   (同一レコードへの同時書き込みは last-write-wins)
 */
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Expense, ExpenseFilter, ExpensePatch, NewExpense};
use crate::repos::{ExpenseRepo, RepoError};

/// Result of looking up a record on behalf of a caller.
#[derive(Debug, Clone, PartialEq)]
pub enum Access {
    Found(Expense),
    NotFound,
    Forbidden,
}

impl Access {
    pub fn into_owned(self) -> Result<Expense, AppError> {
        match self {
            Access::Found(expense) => Ok(expense),
            Access::NotFound => Err(AppError::NotFound),
            Access::Forbidden => Err(AppError::Forbidden),
        }
    }
}

pub async fn fetch_authorized(
    repo: &dyn ExpenseRepo,
    id: Uuid,
    caller: Uuid,
) -> Result<Access, RepoError> {
    let access = match repo.get(id).await? {
        None => Access::NotFound,
        Some(expense) if expense.user != caller => Access::Forbidden,
        Some(expense) => Access::Found(expense),
    };
    Ok(access)
}

pub async fn list(repo: &dyn ExpenseRepo, filter: &ExpenseFilter) -> Result<Vec<Expense>, AppError> {
    Ok(repo.list(filter).await?)
}

pub async fn create(repo: &dyn ExpenseRepo, new: NewExpense) -> Result<Expense, AppError> {
    let expense = repo.create(new).await?;
    tracing::debug!(expense_id = %expense.id, user_id = %expense.user, "expense created");
    Ok(expense)
}

pub async fn update(
    repo: &dyn ExpenseRepo,
    id: Uuid,
    caller: Uuid,
    patch: &ExpensePatch,
) -> Result<Expense, AppError> {
    let current = fetch_authorized(repo, id, caller).await?.into_owned().inspect_err(|e| {
        tracing::info!(expense_id = %id, user_id = %caller, error = %e, "update refused");
    })?;

    if patch.is_empty() {
        return Ok(current);
    }

    // The record can vanish between the check and the write.
    repo.update(id, patch).await?.ok_or(AppError::NotFound)
}

pub async fn delete(repo: &dyn ExpenseRepo, id: Uuid, caller: Uuid) -> Result<(), AppError> {
    fetch_authorized(repo, id, caller).await?.into_owned().inspect_err(|e| {
        tracing::info!(expense_id = %id, user_id = %caller, error = %e, "delete refused");
    })?;

    if !repo.delete(id).await? {
        return Err(AppError::NotFound);
    }
    tracing::debug!(expense_id = %id, user_id = %caller, "expense removed");
    Ok(())
}
