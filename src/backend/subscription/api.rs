use axum::{extract::State, Json};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::backend::auth::users::get_user_by_uid;
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::middleware::{CurrentUser, InternalAccess};
use crate::backend::subscription::access::{resolve_access, set_subscription, today};
use crate::backend::subscription::tiers::{SubscriptionTier, TierLimits};

#[derive(Debug, Serialize)]
pub struct SubscriptionResponse {
    pub level: SubscriptionTier,
    pub expires_at: Option<NaiveDate>,
    pub limits: TierLimits,
    pub remaining_energy: i64,
    pub questions_answered: i64,
    pub challenge_count: i64,
    pub notifications_sent: i64,
}

/// GET /subscription/
pub async fn get_subscription(
    State(pool): State<SqlitePool>,
    CurrentUser(user): CurrentUser,
) -> BackendResult<Json<SubscriptionResponse>> {
    let access = resolve_access(&pool, user.id, today()).await?;

    Ok(Json(SubscriptionResponse {
        level: access.tier,
        expires_at: access.expires_at,
        limits: access.limits,
        remaining_energy: access.remaining_energy,
        questions_answered: access.questions_answered,
        challenge_count: access.challenge_count,
        notifications_sent: access.notifications_sent,
    }))
}

#[derive(Debug, Deserialize)]
pub struct GrantRequest {
    pub firebase_uid: String,
    pub level: String,
    #[serde(default)]
    pub expires_at: Option<NaiveDate>,
}

/// POST /subscription/grant (internal)
///
/// Sets a user's tier after an out-of-band purchase.
pub async fn grant_subscription(
    _guard: InternalAccess,
    State(pool): State<SqlitePool>,
    Json(request): Json<GrantRequest>,
) -> BackendResult<Json<serde_json::Value>> {
    let tier = SubscriptionTier::parse(&request.level)
        .ok_or_else(|| BackendError::bad_request(format!("Unknown subscription level: {}", request.level)))?;

    let user = get_user_by_uid(&pool, &request.firebase_uid)
        .await?
        .ok_or_else(|| BackendError::not_found("User not found"))?;

    set_subscription(&pool, user.id, tier, request.expires_at).await?;
    tracing::info!("Granted {} to user {} until {:?}", tier.as_str(), user.id, request.expires_at);

    Ok(Json(serde_json::json!({
        "firebase_uid": user.firebase_uid,
        "level": tier,
        "expires_at": request.expires_at,
    })))
}
