/**
 * Authentication Extractor
 *
 * This module provides the extractor for routes that require user
 * authentication. It extracts and verifies the bearer token from the
 * Authorization header and provides the local user to handlers,
 * provisioning it on first sight.
 */

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::backend::auth::users::{provision_user, User};
use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;

/// Extract the bearer token from request headers
///
/// Returns `None` when the header is missing, is not valid UTF-8, does not
/// use the `Bearer` scheme or carries an empty token.
pub fn bearer_token(parts: &Parts) -> Option<&str> {
    let header = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = header.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Axum extractor for the authenticated user
///
/// This extractor:
/// 1. Extracts the token from the `Authorization: Bearer` header
/// 2. Verifies it with the configured `TokenVerifier`
/// 3. Gets or creates the local user for the verified uid
///
/// Returns 401 Unauthorized if the token is missing or invalid.
#[derive(Clone, Debug)]
pub struct CurrentUser(pub User);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = BackendError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or_else(|| {
            tracing::warn!("Missing or malformed Authorization header");
            BackendError::unauthorized("Missing bearer token")
        })?;

        let identity = state.verifier.verify(token).await.map_err(|e| {
            tracing::warn!("Invalid token: {}", e);
            BackendError::unauthorized("Invalid authentication token")
        })?;

        let user = provision_user(&state.pool, &identity).await?;
        tracing::debug!("Authenticated user {} ({})", user.id, user.firebase_uid);

        Ok(CurrentUser(user))
    }
}
