/**
 * Token Verification
 *
 * Bearer tokens are checked by a `TokenVerifier`. Production deployments
 * verify Firebase ID tokens; local development and tests use an HS256
 * shared-secret verifier. Handlers never see the token itself, only the
 * `VerifiedIdentity` it resolves to.
 */

use async_trait::async_trait;
use thiserror::Error;

/// Identity extracted from a successfully verified token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedIdentity {
    /// Identity-provider user id (`sub` claim)
    pub uid: String,
    pub email: Option<String>,
}

/// Errors raised while verifying a bearer token
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token signed with unknown key id: {0}")]
    UnknownKey(String),

    #[error("Failed to fetch signing keys: {0}")]
    KeyFetch(String),

    #[error("Token encoding failed: {0}")]
    Encoding(String),
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        Self::InvalidToken(err.to_string())
    }
}

/// Verifies a raw bearer token and resolves it to an identity
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<VerifiedIdentity, AuthError>;
}
