/**
 * Profile Handlers
 *
 * Public catalogue endpoints plus everything under `/user/` that reads or
 * edits the caller's own record.
 */

use std::collections::BTreeMap;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::backend::auth::users;
use crate::backend::content::topics::{get_topic_preferences, set_topic_preferences, TOPICS};
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::middleware::CurrentUser;
use crate::backend::progress::db::{self, CategoryStat};
use crate::backend::progress::scoring::rank_name;
use crate::backend::subscription::{resolve_access, today, SubscriptionTier};
use crate::shared::error::validate_username;
use crate::shared::is_supported_language;

/// GET /
pub async fn welcome() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": "Welcome to the SparkUp API" }))
}

/// GET /topics/
pub async fn list_topics() -> Json<BTreeMap<&'static str, &'static str>> {
    Json(TOPICS.iter().copied().collect())
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub firebase_uid: String,
    pub email: Option<String>,
    pub username: Option<String>,
    pub score: i64,
    pub rank_name: &'static str,
    pub current_streak: i64,
    pub subscription_level: SubscriptionTier,
    pub subscription_expires: Option<NaiveDate>,
    pub language_code: String,
    pub notifications_enabled: bool,
    pub topic_preferences: Vec<String>,
    /// `None` for unlimited tiers
    pub daily_quiz_limit: Option<i64>,
    pub daily_quiz_used: i64,
    pub remaining_quizzes: Option<i64>,
    pub remaining_energy: i64,
    pub session_seconds: i64,
    pub daily_points: i64,
}

/// GET /user/profile/
pub async fn get_profile(
    State(pool): State<SqlitePool>,
    CurrentUser(user): CurrentUser,
) -> BackendResult<Json<ProfileResponse>> {
    let day = today();
    let access = resolve_access(&pool, user.id, day).await?;
    let score = db::get_score(&pool, user.id).await?;

    Ok(Json(ProfileResponse {
        score,
        rank_name: rank_name(score),
        current_streak: db::get_streak(&pool, user.id).await?,
        subscription_level: access.tier,
        subscription_expires: access.expires_at,
        topic_preferences: get_topic_preferences(&pool, user.id).await?,
        daily_quiz_limit: access.limits.quiz_limit,
        daily_quiz_used: access.questions_answered,
        remaining_quizzes: access.remaining_quizzes(),
        remaining_energy: access.remaining_energy,
        session_seconds: access.limits.session_seconds,
        daily_points: db::daily_points(&pool, user.id, day).await?,
        firebase_uid: user.firebase_uid,
        email: user.email,
        username: user.username,
        language_code: user.language_code,
        notifications_enabled: user.notifications_enabled,
    }))
}

#[derive(Debug, Deserialize)]
pub struct LanguageQuery {
    pub language_code: String,
}

/// PUT /user/language/
pub async fn update_language(
    State(pool): State<SqlitePool>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<LanguageQuery>,
) -> BackendResult<Json<serde_json::Value>> {
    let code = query.language_code.trim().to_ascii_lowercase();
    if !is_supported_language(&code) {
        return Err(BackendError::bad_request(format!("Unsupported language: {}", query.language_code)));
    }
    users::update_language(&pool, user.id, &code).await?;
    Ok(Json(serde_json::json!({ "language_code": code })))
}

#[derive(Debug, Deserialize)]
pub struct NotificationsQuery {
    pub enabled: bool,
}

/// PUT /user/notifications/
pub async fn update_notifications(
    State(pool): State<SqlitePool>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<NotificationsQuery>,
) -> BackendResult<Json<serde_json::Value>> {
    users::update_notifications(&pool, user.id, query.enabled).await?;
    Ok(Json(serde_json::json!({ "notifications_enabled": query.enabled })))
}

/// GET /user/topics/
pub async fn get_topics(
    State(pool): State<SqlitePool>,
    CurrentUser(user): CurrentUser,
) -> BackendResult<Json<Vec<String>>> {
    Ok(Json(get_topic_preferences(&pool, user.id).await?))
}

/// PUT /user/topics/
pub async fn put_topics(
    State(pool): State<SqlitePool>,
    CurrentUser(user): CurrentUser,
    Json(topics): Json<Vec<String>>,
) -> BackendResult<Json<Vec<String>>> {
    Ok(Json(set_topic_preferences(&pool, user.id, &topics).await?))
}

#[derive(Debug, Deserialize)]
pub struct UsernameRequest {
    pub username: String,
}

/// PUT /user/username/
pub async fn update_username(
    State(pool): State<SqlitePool>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<UsernameRequest>,
) -> BackendResult<Json<serde_json::Value>> {
    let username = request.username.trim();
    validate_username(username)?;
    users::update_username(&pool, user.id, username).await?;
    Ok(Json(serde_json::json!({ "username": username })))
}

/// GET /user/analysis/
pub async fn get_analysis(
    State(pool): State<SqlitePool>,
    CurrentUser(user): CurrentUser,
) -> BackendResult<Json<Vec<CategoryStat>>> {
    Ok(Json(db::category_analysis(&pool, user.id).await?))
}

fn default_leaderboard_limit() -> i64 {
    100
}

#[derive(Debug, Deserialize)]
pub struct LeaderboardQuery {
    #[serde(default = "default_leaderboard_limit")]
    pub limit: i64,
}

#[derive(Debug, Serialize)]
pub struct LeaderboardEntry {
    pub rank: i64,
    pub email: Option<String>,
    pub username: String,
    pub score: i64,
}

/// Username to show publicly: the chosen one, else the email local part
pub fn display_username(username: Option<&str>, email: Option<&str>) -> String {
    username
        .filter(|u| !u.trim().is_empty())
        .map(str::to_string)
        .or_else(|| email.and_then(|e| e.split('@').next()).map(str::to_string))
        .unwrap_or_default()
}

/// GET /leaderboard/
pub async fn get_leaderboard(
    State(pool): State<SqlitePool>,
    Query(query): Query<LeaderboardQuery>,
) -> BackendResult<Json<Vec<LeaderboardEntry>>> {
    let limit = query.limit.clamp(1, 500);
    let rows = db::leaderboard(&pool, limit).await?;

    Ok(Json(
        rows.into_iter()
            .enumerate()
            .map(|(index, row)| LeaderboardEntry {
                rank: index as i64 + 1,
                username: display_username(row.username.as_deref(), row.email.as_deref()),
                email: row.email,
                score: row.score,
            })
            .collect(),
    ))
}

/// GET /user/rank/
pub async fn get_rank(
    State(pool): State<SqlitePool>,
    CurrentUser(user): CurrentUser,
) -> BackendResult<Json<serde_json::Value>> {
    let score = db::get_score(&pool, user.id).await?;
    let rank = db::user_rank(&pool, user.id).await?;
    Ok(Json(serde_json::json!({ "rank": rank, "score": score })))
}

/// DELETE /user/me/
///
/// Removes the local account and everything attached to it. The identity
/// provider account is left untouched; signing in again starts afresh.
pub async fn delete_me(
    State(pool): State<SqlitePool>,
    CurrentUser(user): CurrentUser,
) -> BackendResult<StatusCode> {
    users::delete_user(&pool, user.id).await?;
    tracing::info!("Deleted account {} ({})", user.id, user.firebase_uid);
    Ok(StatusCode::NO_CONTENT)
}
