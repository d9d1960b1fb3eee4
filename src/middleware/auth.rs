//! Auth gate: `x-auth-token` 検証 → AuthCtx を extensions に入れる
//!
//! - ヘッダが無い / 空 → 401 MissingToken
//! - 署名/形式不正 (ASCII でないヘッダ値を含む) → 401 InvalidToken
//! - 期限切れ → 401 SessionExpired
//! - それ以外の検証失敗 → 500 AuthInternal
//!
//! リトライ・refresh・失効リストは無い (1 リクエスト 1 回の検証のみ)

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{HeaderName, Request},
    middleware::{self, Next},
    response::Response,
};

use crate::api::extractors::AuthCtx;
use crate::error::AppError;
use crate::services::auth::TokenError;
use crate::state::AppState;

/// Custom header carrying the raw token (no `Bearer` scheme).
pub const AUTH_TOKEN_HEADER: HeaderName = HeaderName::from_static("x-auth-token");

/// Put the auth gate in front of every route of `router`.
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // route_layer: unmatched paths fall through to 404 without a token check
    router.route_layer(middleware::from_fn_with_state(state, auth_gate))
}

async fn auth_gate(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let raw = req
        .headers()
        .get(&AUTH_TOKEN_HEADER)
        .filter(|v| !v.as_bytes().trim_ascii().is_empty())
        .ok_or(AppError::MissingToken)?;

    // present but not visible ASCII: cannot be a JWT
    let token = raw.to_str().map(str::trim).map_err(|_| {
        tracing::warn!("token rejected: header is not visible ASCII");
        AppError::InvalidToken
    })?;

    let verified = match state.auth.verify(token) {
        Ok(verified) => verified,
        Err(err) => {
            match &err {
                TokenError::Internal(_) => {
                    tracing::error!(error = %err, "token verification error");
                }
                _ => tracing::warn!(error = %err, "token rejected"),
            }
            return Err(err.into());
        }
    };

    tracing::debug!(user_id = %verified.user_id, expires_at = verified.expires_at, "token accepted");

    // middleware → extractor への受け渡し
    req.extensions_mut().insert(AuthCtx::new(verified.user_id));

    Ok(next.run(req).await)
}
