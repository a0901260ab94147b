/**
 * Device Token and Metrics Database Operations
 *
 * A device token belongs to exactly one user. Registering a token that is
 * already stored under another user moves it, since the device has changed
 * hands (or accounts).
 */

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

/// Result of registering a device token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Registration {
    Created,
    /// Already registered to this user
    #[serde(rename = "ok")]
    Unchanged,
    /// Moved from another user
    Reassigned,
}

#[derive(Debug, Clone, sqlx::FromRow)]
struct TokenOwner {
    id: i64,
    user_id: i64,
}

/// Register `token` for `user_id`
///
/// # Arguments
/// * `pool` - Database connection pool
/// * `user_id` - Owner of the device
/// * `token` - FCM registration token
/// * `platform` - Optional platform label (`android`, `ios`, `web`)
/// * `today` - Registration date
pub async fn register_token(
    pool: &SqlitePool,
    user_id: i64,
    token: &str,
    platform: Option<&str>,
    today: NaiveDate,
) -> Result<Registration, sqlx::Error> {
    let existing = sqlx::query_as::<_, TokenOwner>("SELECT id, user_id FROM device_tokens WHERE token = ?")
        .bind(token)
        .fetch_optional(pool)
        .await?;

    match existing {
        Some(owner) if owner.user_id == user_id => Ok(Registration::Unchanged),
        Some(owner) => {
            sqlx::query("UPDATE device_tokens SET user_id = ?, platform = ? WHERE id = ?")
                .bind(user_id)
                .bind(platform)
                .bind(owner.id)
                .execute(pool)
                .await?;
            tracing::info!("Device token moved from user {} to user {}", owner.user_id, user_id);
            Ok(Registration::Reassigned)
        }
        None => {
            sqlx::query("INSERT INTO device_tokens (user_id, token, platform, created_at) VALUES (?, ?, ?, ?)")
                .bind(user_id)
                .bind(token)
                .bind(platform)
                .bind(today)
                .execute(pool)
                .await?;
            Ok(Registration::Created)
        }
    }
}

/// Delete the caller's own token
///
/// # Returns
/// `true` if a row was removed
pub async fn unregister_token(pool: &SqlitePool, user_id: i64, token: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM device_tokens WHERE user_id = ? AND token = ?")
        .bind(user_id)
        .bind(token)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn tokens_for_user(pool: &SqlitePool, user_id: i64) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar("SELECT token FROM device_tokens WHERE user_id = ? ORDER BY id")
        .bind(user_id)
        .fetch_all(pool)
        .await
}

/// Record a successful delivery
pub async fn touch_tokens(pool: &SqlitePool, tokens: &[String], today: NaiveDate) -> Result<u64, sqlx::Error> {
    if tokens.is_empty() {
        return Ok(0);
    }
    let mut builder = QueryBuilder::<Sqlite>::new("UPDATE device_tokens SET last_seen = ");
    builder.push_bind(today);
    builder.push(" WHERE token IN (");
    let mut separated = builder.separated(", ");
    for token in tokens {
        separated.push_bind(token.clone());
    }
    separated.push_unseparated(")");
    Ok(builder.build().execute(pool).await?.rows_affected())
}

/// Delete tokens regardless of owner
///
/// # Returns
/// Number of rows removed
pub async fn delete_tokens(pool: &SqlitePool, tokens: &[String]) -> Result<u64, sqlx::Error> {
    if tokens.is_empty() {
        return Ok(0);
    }
    let mut builder = QueryBuilder::<Sqlite>::new("DELETE FROM device_tokens WHERE token IN (");
    let mut separated = builder.separated(", ");
    for token in tokens {
        separated.push_bind(token.clone());
    }
    separated.push_unseparated(")");
    Ok(builder.build().execute(pool).await?.rows_affected())
}

/// Delete tokens last seen (or, if never seen, created) before `cutoff`
pub async fn delete_stale_tokens(pool: &SqlitePool, cutoff: NaiveDate) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM device_tokens WHERE COALESCE(last_seen, created_at) < ?")
        .bind(cutoff)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct NotificationMetric {
    pub id: i64,
    pub metric_date: NaiveDate,
    pub removed_tokens: i64,
    pub attempts: i64,
}

pub async fn record_metric(
    pool: &SqlitePool,
    day: NaiveDate,
    attempts: i64,
    removed_tokens: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO notification_metrics (metric_date, removed_tokens, attempts) VALUES (?, ?, ?)")
        .bind(day)
        .bind(removed_tokens)
        .bind(attempts)
        .execute(pool)
        .await?;
    Ok(())
}

/// Metric rows dated on or after `since`, newest first
pub async fn recent_metrics(pool: &SqlitePool, since: NaiveDate) -> Result<Vec<NotificationMetric>, sqlx::Error> {
    sqlx::query_as::<_, NotificationMetric>(
        "SELECT id, metric_date, removed_tokens, attempts FROM notification_metrics \
         WHERE metric_date >= ? ORDER BY metric_date DESC, id DESC",
    )
    .bind(since)
    .fetch_all(pool)
    .await
}
