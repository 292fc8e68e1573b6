//! Bearer token verification.
//!
//! Google ID tokens are RS256 JWTs signed with keys Google publishes as a
//! JWK set. [`google::GoogleTokenVerifier`] checks signature and claims,
//! [`jwks`] provides the keys.

pub mod google;
pub mod jwks;

use jsonwebtoken::errors::{Error as JwtError, ErrorKind};
use thiserror::Error;

pub use google::GoogleTokenVerifier;
pub use jwks::{KeySource, RemoteJwks, StaticKeys};

/// Token verification errors.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Token header has no key id")]
    MissingKeyId,

    #[error("Unsupported token algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("No signing key with id '{0}'")]
    UnknownKey(String),

    #[error("Token expired")]
    Expired,

    #[error("Token audience does not match")]
    InvalidAudience,

    #[error("Token issuer is not Google")]
    InvalidIssuer,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Signing keys unavailable: {0}")]
    KeyFetch(String),
}

impl AuthError {
    /// Whether the failure is on the provider side rather than the token's.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, AuthError::KeyFetch(_))
    }
}

impl From<JwtError> for AuthError {
    fn from(e: JwtError) -> Self {
        match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::Expired,
            ErrorKind::InvalidAudience => AuthError::InvalidAudience,
            ErrorKind::InvalidIssuer => AuthError::InvalidIssuer,
            ErrorKind::InvalidAlgorithm => AuthError::UnsupportedAlgorithm(e.to_string()),
            _ => AuthError::InvalidToken(e.to_string()),
        }
    }
}
