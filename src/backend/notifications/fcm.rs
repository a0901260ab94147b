/**
 * Firebase Cloud Messaging Sender
 *
 * Delivers notifications through the FCM HTTP v1 API:
 *
 * ```text
 * POST {base}/v1/projects/{project_id}/messages:send
 * Authorization: Bearer <OAuth2 access token>
 * {"message": {"token": "...", "notification": {"title", "body"}, "data": {...}}}
 * ```
 *
 * HTTP v1 has no multicast call, so one request per token is issued and the
 * requests run concurrently.
 *
 * # Authentication
 *
 * Access tokens come from the service account's JWT bearer grant: an RS256
 * assertion signed with the account's private key is exchanged at its
 * `token_uri`. Tokens are cached until a minute before they expire.
 *
 * # Error Classification
 *
 * `UNREGISTERED` error codes, `INVALID_ARGUMENT`/`NOT_FOUND` statuses and
 * HTTP 404 mean the token is dead. Everything else is treated as transient.
 */

use std::path::Path;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::Utc;
use futures_util::future::join_all;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::RwLock;

use crate::backend::notifications::push::{MulticastReport, PushError, PushMessage, PushOutcome, PushSender};

pub const FCM_BASE_URL: &str = "https://fcm.googleapis.com";
pub const FCM_SCOPE: &str = "https://www.googleapis.com/auth/firebase.messaging";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const TOKEN_REFRESH_MARGIN: Duration = Duration::from_secs(60);

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

/// The fields of a Google service account key file that FCM needs
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccount {
    pub project_id: String,
    pub client_email: String,
    pub private_key: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

impl ServiceAccount {
    pub fn from_json(raw: &str) -> Result<Self, PushError> {
        serde_json::from_str(raw).map_err(|e| PushError::Credentials(format!("invalid service account: {}", e)))
    }

    pub fn from_file(path: &Path) -> Result<Self, PushError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| PushError::Credentials(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_json(&raw)
    }
}

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

struct CachedToken {
    token: String,
    expires_at: Instant,
}

enum FcmAuth {
    ServiceAccount {
        account: ServiceAccount,
        cached: RwLock<Option<CachedToken>>,
    },
    Static(String),
}

/// FCM HTTP v1 sender
pub struct FcmSender {
    http: reqwest::Client,
    project_id: String,
    base_url: String,
    auth: FcmAuth,
}

impl FcmSender {
    pub fn from_service_account(account: ServiceAccount) -> Self {
        Self {
            http: reqwest::Client::new(),
            project_id: account.project_id.clone(),
            base_url: FCM_BASE_URL.to_string(),
            auth: FcmAuth::ServiceAccount {
                account,
                cached: RwLock::new(None),
            },
        }
    }

    /// Sender using a fixed, externally obtained access token
    pub fn with_static_token(project_id: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            project_id: project_id.into(),
            base_url: FCM_BASE_URL.to_string(),
            auth: FcmAuth::Static(access_token.into()),
        }
    }

    /// Override the FCM endpoint
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn send_url(&self) -> String {
        format!("{}/v1/projects/{}/messages:send", self.base_url, self.project_id)
    }

    async fn access_token(&self) -> Result<String, PushError> {
        let (account, cached) = match &self.auth {
            FcmAuth::Static(token) => return Ok(token.clone()),
            FcmAuth::ServiceAccount { account, cached } => (account, cached),
        };

        {
            let cached = cached.read().await;
            if let Some(token) = cached.as_ref() {
                if token.expires_at > Instant::now() + TOKEN_REFRESH_MARGIN {
                    return Ok(token.token.clone());
                }
            }
        }

        let now = Utc::now().timestamp();
        let claims = AssertionClaims {
            iss: &account.client_email,
            scope: FCM_SCOPE,
            aud: &account.token_uri,
            iat: now,
            exp: now + 3600,
        };
        let key = EncodingKey::from_rsa_pem(account.private_key.as_bytes())
            .map_err(|e| PushError::Credentials(format!("invalid private key: {}", e)))?;
        let assertion = encode(&Header::new(Algorithm::RS256), &claims, &key)
            .map_err(|e| PushError::Credentials(e.to_string()))?;

        let response = self
            .http
            .post(&account.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(|e| PushError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!("OAuth2 token exchange failed with {}: {}", status, body);
            return Err(PushError::Credentials(format!("token exchange returned {}", status)));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| PushError::Credentials(format!("invalid token response: {}", e)))?;

        let ttl = Duration::from_secs(token.expires_in.unwrap_or(3600));
        *cached.write().await = Some(CachedToken {
            token: token.access_token.clone(),
            expires_at: Instant::now() + ttl,
        });
        tracing::debug!("Obtained FCM access token valid for {:?}", ttl);

        Ok(token.access_token)
    }

    async fn send_one(&self, token: &str, message: &PushMessage, access_token: &str) -> PushOutcome {
        let body = serde_json::json!({
            "message": {
                "token": token,
                "notification": {
                    "title": message.title,
                    "body": message.body,
                },
                "data": message.data,
            }
        });

        let response = match self
            .http
            .post(self.send_url())
            .bearer_auth(access_token)
            .json(&body)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("FCM request failed: {}", e);
                return PushOutcome::Failed(e.to_string());
            }
        };

        let status = response.status();
        if status.is_success() {
            return PushOutcome::Delivered;
        }

        let text = response.text().await.unwrap_or_default();
        let outcome = classify_fcm_error(status.as_u16(), &text);
        tracing::warn!("FCM send returned {}: {:?}", status, outcome);
        outcome
    }
}

/// Classify a failed FCM response
pub fn classify_fcm_error(http_status: u16, body: &str) -> PushOutcome {
    let parsed: Value = serde_json::from_str(body).unwrap_or(Value::Null);
    let error = &parsed["error"];

    let status = error["status"].as_str().unwrap_or_default().to_string();
    let error_code = error["details"]
        .as_array()
        .into_iter()
        .flatten()
        .find_map(|detail| detail["errorCode"].as_str())
        .unwrap_or_default()
        .to_string();

    let reason = match (error_code.is_empty(), status.is_empty()) {
        (false, _) => error_code.clone(),
        (true, false) => status.clone(),
        (true, true) => format!("HTTP {}", http_status),
    };

    let invalid = error_code == "UNREGISTERED"
        || status == "INVALID_ARGUMENT"
        || status == "NOT_FOUND"
        || http_status == 404;

    if invalid {
        PushOutcome::InvalidToken(reason)
    } else {
        PushOutcome::Failed(reason)
    }
}

#[async_trait]
impl PushSender for FcmSender {
    async fn send_multicast(&self, tokens: &[String], message: &PushMessage) -> Result<MulticastReport, PushError> {
        if tokens.is_empty() {
            return Ok(MulticastReport::default());
        }

        let access_token = self.access_token().await?;
        let sends = tokens
            .iter()
            .map(|token| self.send_one(token, message, &access_token));
        let outcomes = join_all(sends).await;

        Ok(MulticastReport {
            outcomes: tokens.iter().cloned().zip(outcomes).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_unregistered() {
        let body = r#"{"error": {"code": 404, "status": "NOT_FOUND", "details": [
            {"@type": "type.googleapis.com/google.firebase.fcm.v1.FcmError", "errorCode": "UNREGISTERED"}]}}"#;
        assert_eq!(classify_fcm_error(404, body), PushOutcome::InvalidToken("UNREGISTERED".into()));
    }

    #[test]
    fn test_classify_invalid_argument() {
        let body = r#"{"error": {"code": 400, "status": "INVALID_ARGUMENT"}}"#;
        assert_eq!(classify_fcm_error(400, body), PushOutcome::InvalidToken("INVALID_ARGUMENT".into()));
    }

    #[test]
    fn test_classify_transient() {
        let body = r#"{"error": {"code": 503, "status": "UNAVAILABLE"}}"#;
        assert_eq!(classify_fcm_error(503, body), PushOutcome::Failed("UNAVAILABLE".into()));
        assert_eq!(classify_fcm_error(500, "oops"), PushOutcome::Failed("HTTP 500".into()));
    }

    #[test]
    fn test_service_account_default_token_uri() {
        let account = ServiceAccount::from_json(
            r#"{"project_id": "p", "client_email": "svc@p.iam.gserviceaccount.com", "private_key": "k"}"#,
        )
        .unwrap();
        assert_eq!(account.token_uri, DEFAULT_TOKEN_URI);
        assert!(ServiceAccount::from_json("{}").is_err());
    }
}
