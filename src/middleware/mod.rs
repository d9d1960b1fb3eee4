/*
 * Responsibility
 * - middleware の公開インターフェース
 *   - auth: x-auth-token の検証 (expenses ルートのみ)
 *   - http: request-id / trace / limit / timeout / CORS (全ルート)
 */
pub mod auth;
pub mod http;
