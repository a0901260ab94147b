/**
 * Internal Endpoint Guard
 *
 * Cron and admin endpoints are called by infrastructure rather than by app
 * users. They are protected by a shared secret, passed either as the
 * `internal_secret` query parameter or the `X-Internal-Secret` header.
 * When `INTERNAL_CRON_SECRET` is not configured the guard is open.
 */

use std::collections::HashMap;

use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
};

use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;

pub const INTERNAL_SECRET_HEADER: &str = "x-internal-secret";
pub const INTERNAL_SECRET_PARAM: &str = "internal_secret";

/// Marker extractor for requests allowed to call internal endpoints
#[derive(Debug, Clone, Copy)]
pub struct InternalAccess;

fn provided_secret(parts: &Parts) -> Option<String> {
    if let Some(value) = parts
        .headers
        .get(INTERNAL_SECRET_HEADER)
        .and_then(|v| v.to_str().ok())
    {
        return Some(value.to_string());
    }

    Query::<HashMap<String, String>>::try_from_uri(&parts.uri)
        .ok()
        .and_then(|Query(mut params)| params.remove(INTERNAL_SECRET_PARAM))
}

impl FromRequestParts<AppState> for InternalAccess {
    type Rejection = BackendError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(expected) = state.config.internal_secret.as_deref() else {
            return Ok(InternalAccess);
        };

        match provided_secret(parts) {
            Some(given) if given == expected => Ok(InternalAccess),
            _ => {
                tracing::warn!("Rejected internal call to {}", parts.uri.path());
                Err(BackendError::forbidden("Forbidden"))
            }
        }
    }
}
