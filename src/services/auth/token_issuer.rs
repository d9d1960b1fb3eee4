use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::Serialize;
use tracing::error;
use uuid::Uuid;

use super::claims::{TokenClaims, UserClaim};
use super::token_verifier::TokenError;

/// Signs HS256 access tokens with the shared secret.
///
/// Tokens are normally minted by the identity service; this is used by the
/// `issue-token` tool and by tests.
#[derive(Clone)]
pub struct TokenIssuer {
    ttl_seconds: u64,
    encoding_key: EncodingKey,
}

impl TokenIssuer {
    pub fn new(secret: &str, ttl_seconds: u64) -> Result<Self, TokenError> {
        if secret.is_empty() {
            return Err(TokenError::Internal("empty signing secret".into()));
        }

        Ok(Self {
            ttl_seconds,
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
        })
    }

    pub fn ttl_seconds(&self) -> u64 {
        self.ttl_seconds
    }

    pub fn issue(&self, user_id: Uuid) -> Result<String, TokenError> {
        let now = chrono::Utc::now().timestamp().max(0) as u64;
        let claims = TokenClaims {
            user: UserClaim {
                id: user_id.to_string(),
            },
            iat: Some(now),
            exp: now + self.ttl_seconds,
            nbf: None,
        };
        self.sign(&claims)
    }

    pub fn sign<T: Serialize>(&self, claims: &T) -> Result<String, TokenError> {
        let mut header = Header::new(Algorithm::HS256);
        header.typ = Some("JWT".to_string());
        jsonwebtoken::encode(&header, claims, &self.encoding_key).map_err(|e| {
            error!(error = %e, "failed to sign JWT");
            TokenError::Internal(e.to_string())
        })
    }
}
