/*
 * Responsibility
 * - expenses の永続化インターフェース (ExpenseRepo)
 * - PostgreSQL 実装 (PgExpenseRepo)
 *
 * Table (migrations are managed outside this crate):
 *
 *   CREATE TABLE expenses (
 *       "expenseId"  UUID PRIMARY KEY DEFAULT gen_random_uuid(),
 *       "userId"     UUID NOT NULL,
 *       amount       DOUBLE PRECISION NOT NULL,
 *       category     TEXT NOT NULL,
 *       date         TIMESTAMPTZ NOT NULL DEFAULT now(),
 *       description  TEXT
 *   );
 *
 * - 所有者チェックはここでは行わない (services::expenses の責務)
 */
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::models::{Expense, ExpenseFilter, ExpensePatch, NewExpense};
use crate::repos::error::RepoError;

/// Storage for expense records.
///
/// Implementations must be cheap to share (`Arc<dyn ExpenseRepo>` in `AppState`).
#[async_trait]
pub trait ExpenseRepo: Send + Sync {
    // Returns the backend name (for logging).
    fn backend_name(&self) -> &'static str;

    // All records matching `filter`, newest first.
    async fn list(&self, filter: &ExpenseFilter) -> Result<Vec<Expense>, RepoError>;

    async fn create(&self, new: NewExpense) -> Result<Expense, RepoError>;

    async fn get(&self, id: Uuid) -> Result<Option<Expense>, RepoError>;

    // Returns `None` when the record no longer exists.
    async fn update(&self, id: Uuid, patch: &ExpensePatch) -> Result<Option<Expense>, RepoError>;

    // Returns whether a record was removed.
    async fn delete(&self, id: Uuid) -> Result<bool, RepoError>;
}

const COLUMNS: &str = r#""expenseId", "userId", amount, category, date, description"#;

#[derive(Debug, FromRow)]
struct ExpenseRow {
    #[sqlx(rename = "expenseId")]
    id: Uuid,
    #[sqlx(rename = "userId")]
    user: Uuid,
    amount: f64,
    category: String,
    date: DateTime<Utc>,
    description: Option<String>,
}

impl TryFrom<ExpenseRow> for Expense {
    type Error = RepoError;

    fn try_from(row: ExpenseRow) -> Result<Self, Self::Error> {
        let category = row
            .category
            .parse()
            .map_err(|e| RepoError::CorruptRow(format!("{} ({})", e, row.id)))?;

        Ok(Expense {
            id: row.id,
            user: row.user,
            amount: row.amount,
            category,
            date: row.date,
            description: row.description,
        })
    }
}

/// Escape LIKE wildcards so the needle is matched literally.
fn like_pattern(needle: &str) -> String {
    let mut out = String::with_capacity(needle.len() + 2);
    out.push('%');
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push('%');
    out
}

fn list_query(filter: &ExpenseFilter) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!(
        r#"SELECT {COLUMNS} FROM expenses WHERE "userId" = "#
    ));
    qb.push_bind(filter.owner);

    if let Some(category) = &filter.category {
        qb.push(" AND category = ").push_bind(category.clone());
    }
    if let Some(from) = filter.date_from {
        qb.push(" AND date >= ").push_bind(from);
    }
    if let Some(to) = filter.date_to {
        qb.push(" AND date <= ").push_bind(to);
    }
    if let Some(min) = filter.min_amount {
        qb.push(" AND amount >= ").push_bind(min);
    }
    if let Some(max) = filter.max_amount {
        qb.push(" AND amount <= ").push_bind(max);
    }
    if let Some(needle) = &filter.description {
        qb.push(" AND description ILIKE ")
            .push_bind(like_pattern(needle))
            .push(r" ESCAPE '\'");
    }

    qb.push(" ORDER BY date DESC");
    qb
}

#[derive(Clone, Debug)]
pub struct PgExpenseRepo {
    pool: PgPool,
}

impl PgExpenseRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ExpenseRepo for PgExpenseRepo {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn list(&self, filter: &ExpenseFilter) -> Result<Vec<Expense>, RepoError> {
        let mut qb = list_query(filter);
        let rows = qb
            .build_query_as::<ExpenseRow>()
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Expense::try_from).collect()
    }

    async fn create(&self, new: NewExpense) -> Result<Expense, RepoError> {
        let row = sqlx::query_as::<_, ExpenseRow>(&format!(
            r#"
            INSERT INTO expenses ("userId", amount, category, date, description)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(new.user)
        .bind(new.amount)
        .bind(new.category.as_str())
        .bind(new.date)
        .bind(new.description)
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    async fn get(&self, id: Uuid) -> Result<Option<Expense>, RepoError> {
        let row = sqlx::query_as::<_, ExpenseRow>(&format!(
            r#"
            SELECT {COLUMNS}
            FROM expenses
            WHERE "expenseId" = $1
            "#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Expense::try_from).transpose()
    }

    async fn update(&self, id: Uuid, patch: &ExpensePatch) -> Result<Option<Expense>, RepoError> {
        let row = sqlx::query_as::<_, ExpenseRow>(&format!(
            r#"
            UPDATE expenses
            SET
                amount = COALESCE($2, amount),
                category = COALESCE($3, category),
                date = COALESCE($4, date),
                description = COALESCE($5, description)
            WHERE "expenseId" = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(patch.amount)
        .bind(patch.category.map(|c| c.as_str()))
        .bind(patch.date)
        .bind(patch.description.as_deref())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Expense::try_from).transpose()
    }

    async fn delete(&self, id: Uuid) -> Result<bool, RepoError> {
        let result = sqlx::query(
            r#"
            DELETE FROM expenses
            WHERE "expenseId" = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
