pub mod claims;
pub mod token_issuer;
pub mod token_verifier;

pub use claims::{TokenClaims, UserClaim};
pub use token_issuer::TokenIssuer;
pub use token_verifier::{TokenError, TokenVerifier, VerifiedToken};
