/*
 * Responsibility
 * - Path の String をレコード ID (UUID) として受け取る
 * - 形式不正は NotFound として扱う (ID の形式を外部に漏らさない)
 *
 * 置くもの
 *  - RecordId<T> の定義（ジェネリック本体）
 *  - impl FromRequestParts<AppState> for RecordId<T>
 * 置かないもの
 *  - Expense といった具体リソース名 (types 側)
 */
use std::marker::PhantomData;

use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

pub struct RecordId<T> {
    pub id: Uuid,
    _marker: PhantomData<T>,
}

impl<T> RecordId<T> {
    fn new(id: Uuid) -> Self {
        Self {
            id,
            _marker: PhantomData,
        }
    }
}

fn parse_or_not_found(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| {
        tracing::debug!(raw_id = %raw, "malformed record id");
        AppError::NotFound
    })
}

impl<T> FromRequestParts<AppState> for RecordId<T>
where
    T: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::NotFound)?;
        let id = parse_or_not_found(&raw)?;
        Ok(Self::new(id))
    }
}

impl<T> std::fmt::Debug for RecordId<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordId").field("id", &self.id).finish()
    }
}
