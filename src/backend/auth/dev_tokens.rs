/**
 * Development Tokens
 *
 * HS256 tokens signed with `DEV_AUTH_SECRET`. They carry the same `sub` and
 * `email` claims as a Firebase ID token, so the rest of the server cannot
 * tell them apart. Used when no Firebase project is configured.
 */

use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::backend::auth::verifier::{AuthError, TokenVerifier, VerifiedIdentity};

/// Development tokens are valid for 30 days
const DEV_TOKEN_TTL_SECS: i64 = 30 * 24 * 60 * 60;

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct DevClaims {
    /// Identity-provider user id
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at time (Unix timestamp)
    pub iat: i64,
}

/// Create a development token for a user
///
/// # Arguments
/// * `secret` - Shared HS256 secret
/// * `uid` - Value of the `sub` claim
/// * `email` - Optional email claim
///
/// # Returns
/// JWT token string
pub fn issue_dev_token(secret: &str, uid: &str, email: Option<&str>) -> Result<String, AuthError> {
    let now = Utc::now().timestamp();
    let claims = DevClaims {
        sub: uid.to_string(),
        email: email.map(str::to_string),
        exp: now + DEV_TOKEN_TTL_SECS,
        iat: now,
    };

    encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes()))
        .map_err(|e| AuthError::Encoding(e.to_string()))
}

/// Verifier for HS256 development tokens
pub struct DevTokenVerifier {
    secret: String,
}

impl DevTokenVerifier {
    pub fn new(secret: impl Into<String>) -> Self {
        Self { secret: secret.into() }
    }
}

#[async_trait]
impl TokenVerifier for DevTokenVerifier {
    async fn verify(&self, token: &str) -> Result<VerifiedIdentity, AuthError> {
        let key = DecodingKey::from_secret(self.secret.as_bytes());
        let data = decode::<DevClaims>(token, &key, &Validation::default())?;

        if data.claims.sub.trim().is_empty() {
            return Err(AuthError::InvalidToken("empty subject".to_string()));
        }

        Ok(VerifiedIdentity {
            uid: data.claims.sub,
            email: data.claims.email,
        })
    }
}
