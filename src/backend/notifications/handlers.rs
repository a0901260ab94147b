use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::backend::auth::users::list_notifiable_users;
use crate::backend::content::info::pick_info_for_user;
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::middleware::{CurrentUser, InternalAccess};
use crate::backend::notifications::db::{self, NotificationMetric, Registration};
use crate::backend::notifications::dispatch::{send_info_to_user, SendResult};
use crate::backend::server::state::AppState;
use crate::backend::subscription::{resolve_access, today};

const DEFAULT_STALE_DAYS: i64 = 90;
const DEFAULT_METRIC_DAYS: i64 = 7;

#[derive(Debug, Deserialize)]
pub struct DeviceTokenRequest {
    pub token: String,
    pub platform: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DeviceTokenResponse {
    pub status: Registration,
}

#[derive(Debug, Deserialize)]
pub struct TokenQuery {
    pub token: String,
}

/// POST /user/device-token/
pub async fn register_device_token(
    State(pool): State<SqlitePool>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<DeviceTokenRequest>,
) -> BackendResult<Json<DeviceTokenResponse>> {
    let token = request.token.trim();
    if token.is_empty() {
        return Err(BackendError::bad_request("Token is required"));
    }
    let platform = request.platform.as_deref().map(str::trim).filter(|p| !p.is_empty());

    let status = db::register_token(&pool, user.id, token, platform, today()).await?;
    tracing::debug!("Device token for user {}: {:?}", user.id, status);

    Ok(Json(DeviceTokenResponse { status }))
}

/// DELETE /user/device-token/?token=
pub async fn unregister_device_token(
    State(pool): State<SqlitePool>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<TokenQuery>,
) -> BackendResult<Json<serde_json::Value>> {
    let removed = db::unregister_token(&pool, user.id, query.token.trim()).await?;
    Ok(Json(serde_json::json!({ "removed": removed })))
}

/// POST /notifications/send_for_user/{user_id}
///
/// Sends the caller an unseen info right away.
pub async fn send_for_user(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(user_id): Path<i64>,
) -> BackendResult<Json<SendResult>> {
    if user_id != user.id {
        return Err(BackendError::forbidden("Cannot send notifications for another user"));
    }

    let info = pick_info_for_user(&state.pool, user.id, None)
        .await?
        .ok_or_else(|| BackendError::not_found("No info available"))?;

    let result = send_info_to_user(&state.pool, state.push.as_deref(), &user, &info, today()).await?;
    Ok(Json(result))
}

#[derive(Debug, Serialize)]
pub struct ScanResponse {
    pub results_count: usize,
    pub results: Vec<SendResult>,
}

/// POST /notifications/run-scan/
///
/// Sends one unseen info to every user who has notifications enabled and
/// has not used up today's notification allowance.
/// Users with no matching info get a `no_info` result.
pub async fn run_scan(_guard: InternalAccess, State(state): State<AppState>) -> BackendResult<Json<ScanResponse>> {
    let day = today();
    let users = list_notifiable_users(&state.pool).await?;
    tracing::info!("Notification scan over {} users", users.len());

    let mut results = Vec::new();
    for user in users {
        let access = resolve_access(&state.pool, user.id, day).await?;
        if !access.can_receive_notification() {
            tracing::debug!(
                "User {} reached {} notifications today",
                user.id,
                access.limits.notifications_per_day
            );
            continue;
        }

        let Some(info) = pick_info_for_user(&state.pool, user.id, None).await? else {
            tracing::debug!("No info matches the topics of user {}", user.id);
            results.push(SendResult {
                user_id: user.id,
                note: Some("no_info".to_string()),
                ..SendResult::default()
            });
            continue;
        };

        match send_info_to_user(&state.pool, state.push.as_deref(), &user, &info, day).await {
            Ok(result) => results.push(result),
            Err(e) => {
                tracing::error!("Notification for user {} failed: {}", user.id, e);
                results.push(SendResult {
                    user_id: user.id,
                    info_id: Some(info.id),
                    error: Some(e.to_string()),
                    ..SendResult::default()
                });
            }
        }
    }

    tracing::info!("Notification scan finished with {} results", results.len());
    Ok(Json(ScanResponse {
        results_count: results.len(),
        results,
    }))
}

/// POST /notifications/cleanup/
pub async fn cleanup_tokens(
    _guard: InternalAccess,
    State(pool): State<SqlitePool>,
    Json(tokens): Json<Vec<String>>,
) -> BackendResult<Json<serde_json::Value>> {
    if tokens.is_empty() {
        return Err(BackendError::bad_request("No tokens provided"));
    }
    let removed = db::delete_tokens(&pool, &tokens).await?;
    tracing::info!("Removed {} device tokens on request", removed);
    Ok(Json(serde_json::json!({ "removed": removed })))
}

#[derive(Debug, Deserialize)]
pub struct DaysQuery {
    pub days: Option<i64>,
}

/// POST /notifications/cleanup-old/?days=90
pub async fn cleanup_old_tokens(
    _guard: InternalAccess,
    State(pool): State<SqlitePool>,
    Query(query): Query<DaysQuery>,
) -> BackendResult<Json<serde_json::Value>> {
    let days = query.days.unwrap_or(DEFAULT_STALE_DAYS);
    if days < 0 {
        return Err(BackendError::bad_request("days must not be negative"));
    }
    let cutoff = today() - Duration::days(days);
    let removed = db::delete_stale_tokens(&pool, cutoff).await?;
    tracing::info!("Removed {} device tokens unused since {}", removed, cutoff);
    Ok(Json(serde_json::json!({ "removed": removed, "cutoff": cutoff })))
}

/// GET /notifications/metrics/?days=7
pub async fn get_metrics(
    _guard: InternalAccess,
    State(pool): State<SqlitePool>,
    Query(query): Query<DaysQuery>,
) -> BackendResult<Json<Vec<NotificationMetric>>> {
    let days = query.days.unwrap_or(DEFAULT_METRIC_DAYS).max(0);
    let since = today() - Duration::days(days);
    Ok(Json(db::recent_metrics(&pool, since).await?))
}
