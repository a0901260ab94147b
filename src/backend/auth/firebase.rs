/**
 * Firebase ID-Token Verification
 *
 * Firebase ID tokens are RS256 JWTs signed by one of Google's rotating
 * `securetoken` keys. The public keys are fetched as a JWK set and cached
 * until the `Cache-Control: max-age` of the response expires.
 *
 * # Checks
 *
 * - `alg` is RS256 and `kid` names a key in the current set
 * - signature and `exp` are valid
 * - `aud` equals the Firebase project id
 * - `iss` equals `https://securetoken.google.com/<project id>`
 * - `sub` is non-empty
 */

use std::time::{Duration, Instant};

use async_trait::async_trait;
use jsonwebtoken::{decode, decode_header, jwk::JwkSet, Algorithm, DecodingKey, Validation};
use reqwest::header::CACHE_CONTROL;
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::backend::auth::verifier::{AuthError, TokenVerifier, VerifiedIdentity};

pub const GOOGLE_JWKS_URL: &str =
    "https://www.googleapis.com/service_accounts/v1/jwk/securetoken@system.gserviceaccount.com";

const DEFAULT_KEY_TTL: Duration = Duration::from_secs(3600);

#[derive(Debug, Deserialize)]
struct FirebaseClaims {
    sub: String,
    #[serde(default)]
    email: Option<String>,
}

struct CachedKeys {
    keys: JwkSet,
    expires_at: Instant,
}

/// Verifier for Firebase ID tokens
pub struct FirebaseVerifier {
    project_id: String,
    jwks_url: String,
    http: reqwest::Client,
    cache: RwLock<Option<CachedKeys>>,
}

impl FirebaseVerifier {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self::with_jwks_url(project_id, GOOGLE_JWKS_URL)
    }

    /// Verifier that fetches signing keys from a custom URL
    pub fn with_jwks_url(project_id: impl Into<String>, jwks_url: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            jwks_url: jwks_url.into(),
            http: reqwest::Client::new(),
            cache: RwLock::new(None),
        }
    }

    fn issuer(&self) -> String {
        format!("https://securetoken.google.com/{}", self.project_id)
    }

    /// Current key set, served from cache unless expired or `refresh` is set
    async fn keys(&self, refresh: bool) -> Result<JwkSet, AuthError> {
        if !refresh {
            let cache = self.cache.read().await;
            if let Some(cached) = cache.as_ref() {
                if cached.expires_at > Instant::now() {
                    return Ok(cached.keys.clone());
                }
            }
        }

        tracing::debug!("Fetching Firebase signing keys from {}", self.jwks_url);

        let response = self
            .http
            .get(&self.jwks_url)
            .send()
            .await
            .map_err(|e| AuthError::KeyFetch(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AuthError::KeyFetch(format!(
                "key endpoint returned {}",
                response.status()
            )));
        }

        let ttl = response
            .headers()
            .get(CACHE_CONTROL)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_max_age)
            .unwrap_or(DEFAULT_KEY_TTL);

        let keys: JwkSet = response
            .json()
            .await
            .map_err(|e| AuthError::KeyFetch(e.to_string()))?;

        *self.cache.write().await = Some(CachedKeys {
            keys: keys.clone(),
            expires_at: Instant::now() + ttl,
        });

        Ok(keys)
    }
}

#[async_trait]
impl TokenVerifier for FirebaseVerifier {
    async fn verify(&self, token: &str) -> Result<VerifiedIdentity, AuthError> {
        let header = decode_header(token)?;
        if header.alg != Algorithm::RS256 {
            return Err(AuthError::InvalidToken(format!(
                "unexpected algorithm {:?}",
                header.alg
            )));
        }
        let kid = header
            .kid
            .ok_or_else(|| AuthError::InvalidToken("missing kid".to_string()))?;

        // Keys rotate; an unknown kid triggers one refetch before giving up.
        let mut keys = self.keys(false).await?;
        if keys.find(&kid).is_none() {
            keys = self.keys(true).await?;
        }
        let jwk = keys
            .find(&kid)
            .ok_or_else(|| AuthError::UnknownKey(kid.clone()))?;
        let key = DecodingKey::from_jwk(jwk)?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[self.project_id.as_str()]);
        validation.set_issuer(&[self.issuer()]);
        validation.set_required_spec_claims(&["exp", "sub", "aud", "iss"]);

        let data = decode::<FirebaseClaims>(token, &key, &validation)?;
        if data.claims.sub.trim().is_empty() {
            return Err(AuthError::InvalidToken("empty subject".to_string()));
        }

        Ok(VerifiedIdentity {
            uid: data.claims.sub,
            email: data.claims.email,
        })
    }
}

/// Extract `max-age` from a `Cache-Control` header value
pub fn parse_max_age(header: &str) -> Option<Duration> {
    header
        .split(',')
        .find_map(|directive| directive.trim().strip_prefix("max-age="))
        .and_then(|value| value.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}
