use jsonwebtoken::{Algorithm, DecodingKey, Validation, errors::ErrorKind};
use uuid::Uuid;

use super::claims::TokenClaims;

/// Outcome classes of token verification.
///
/// The gate maps these 1:1 onto `SessionExpired` / `InvalidToken` /
/// `AuthInternal`.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("token expired")]
    Expired,
    #[error("invalid token: {0}")]
    Invalid(String),
    #[error("token verification failed: {0}")]
    Internal(String),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::ExpiredSignature => Self::Expired,
            ErrorKind::InvalidToken
            | ErrorKind::InvalidSignature
            | ErrorKind::InvalidAlgorithm
            | ErrorKind::InvalidAlgorithmName
            | ErrorKind::MissingRequiredClaim(_)
            | ErrorKind::Base64(_)
            | ErrorKind::Json(_)
            | ErrorKind::Utf8(_) => Self::Invalid(e.to_string()),
            // not-before violations, key and backend failures
            _ => Self::Internal(e.to_string()),
        }
    }
}

/// Result of a successful verification, in application terms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedToken {
    pub user_id: Uuid,
    pub expires_at: u64,
}

/// HS256 access-token verifier.
///
/// Holds the process-wide secret, fixed at construction. Key material is not
/// printable via Debug.
#[derive(Clone)]
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenVerifier")
            .field("algorithms", &self.validation.algorithms)
            .field("leeway", &self.validation.leeway)
            .finish()
    }
}

impl TokenVerifier {
    pub fn new(secret: &str, leeway_seconds: u64) -> Result<Self, TokenError> {
        if secret.is_empty() {
            return Err(TokenError::Internal("empty signing secret".into()));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = leeway_seconds;
        validation.validate_nbf = true;
        // Tokens may carry an audience; this service does not pin one.
        validation.validate_aud = false;

        Ok(Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        })
    }

    /// Check signature and expiry, then lift `user.id` into a `Uuid`.
    pub fn verify(&self, token: &str) -> Result<VerifiedToken, TokenError> {
        let data = jsonwebtoken::decode::<TokenClaims>(token, &self.decoding_key, &self.validation)?;

        let user_id = Uuid::parse_str(data.claims.user.id.trim())
            .map_err(|_| TokenError::Invalid("user.id is not a UUID".into()))?;

        Ok(VerifiedToken {
            user_id,
            expires_at: data.claims.exp,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::auth::{TokenIssuer, claims::UserClaim};

    const SECRET: &str = "unit-test-secret";

    fn now() -> u64 {
        chrono::Utc::now().timestamp() as u64
    }

    fn claims(id: &str, exp: u64) -> TokenClaims {
        TokenClaims {
            user: UserClaim { id: id.into() },
            iat: Some(now()),
            exp,
            nbf: None,
        }
    }

    #[test]
    fn accepts_a_fresh_token() {
        let user = Uuid::new_v4();
        let token = TokenIssuer::new(SECRET, 60).unwrap().issue(user).unwrap();

        let verified = TokenVerifier::new(SECRET, 0).unwrap().verify(&token).unwrap();
        assert_eq!(verified.user_id, user);
    }

    #[test]
    fn expired_token_is_classified_as_expired() {
        let issuer = TokenIssuer::new(SECRET, 60).unwrap();
        let token = issuer
            .sign(&claims(&Uuid::new_v4().to_string(), now() - 3600))
            .unwrap();

        let err = TokenVerifier::new(SECRET, 0).unwrap().verify(&token).unwrap_err();
        assert!(matches!(err, TokenError::Expired), "{err:?}");
    }

    #[test]
    fn wrong_secret_and_garbage_are_invalid() {
        let token = TokenIssuer::new("another-secret", 60)
            .unwrap()
            .issue(Uuid::new_v4())
            .unwrap();
        let verifier = TokenVerifier::new(SECRET, 0).unwrap();

        assert!(matches!(verifier.verify(&token), Err(TokenError::Invalid(_))));
        assert!(matches!(verifier.verify("not-a-jwt"), Err(TokenError::Invalid(_))));
        assert!(matches!(verifier.verify("a.b.c"), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn non_uuid_identity_is_invalid() {
        let token = TokenIssuer::new(SECRET, 60)
            .unwrap()
            .sign(&claims("65a1f0c2e4b0a1b2c3d4e5f6", now() + 600))
            .unwrap();

        let err = TokenVerifier::new(SECRET, 0).unwrap().verify(&token).unwrap_err();
        assert!(matches!(err, TokenError::Invalid(_)));
    }

    #[test]
    fn not_yet_valid_token_is_an_internal_failure() {
        let mut c = claims(&Uuid::new_v4().to_string(), now() + 7200);
        c.nbf = Some(now() + 3600);
        let token = TokenIssuer::new(SECRET, 60).unwrap().sign(&c).unwrap();

        let err = TokenVerifier::new(SECRET, 0).unwrap().verify(&token).unwrap_err();
        assert!(matches!(err, TokenError::Internal(_)), "{err:?}");
    }

    #[test]
    fn token_without_exp_is_invalid() {
        let token = TokenIssuer::new(SECRET, 60)
            .unwrap()
            .sign(&serde_json::json!({ "user": { "id": Uuid::new_v4() }, "iat": now() }))
            .unwrap();

        let err = TokenVerifier::new(SECRET, 0).unwrap().verify(&token).unwrap_err();
        assert!(matches!(err, TokenError::Invalid(_)), "{err:?}");
    }

    #[test]
    fn empty_secret_is_rejected() {
        assert!(TokenVerifier::new("", 0).is_err());
    }
}
