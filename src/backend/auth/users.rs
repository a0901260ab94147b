/**
 * User Model and Database Operations
 *
 * This module handles user data and database operations. Users are never
 * created explicitly: the first authenticated request for an unknown
 * identity-provider uid provisions the local record together with its
 * score, streak and subscription rows.
 */

use serde::Serialize;
use sqlx::SqlitePool;

use crate::backend::auth::verifier::VerifiedIdentity;

/// User struct representing a user in the database
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
    /// Local user id
    pub id: i64,
    /// Identity-provider uid (unique)
    pub firebase_uid: String,
    pub email: Option<String>,
    /// Display name (3-30 chars, alphanumeric + underscore) once chosen
    pub username: Option<String>,
    /// Preferred content language, one of the supported language codes
    pub language_code: String,
    pub notifications_enabled: bool,
}

const USER_COLUMNS: &str =
    "id, firebase_uid, email, username, language_code, notifications_enabled";

/// Get user by local id
///
/// # Arguments
/// * `pool` - Database connection pool
/// * `user_id` - Local user id
///
/// # Returns
/// User or None if not found
pub async fn get_user_by_id(pool: &SqlitePool, user_id: i64) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

/// Get user by identity-provider uid
pub async fn get_user_by_uid(pool: &SqlitePool, firebase_uid: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE firebase_uid = ?"))
        .bind(firebase_uid)
        .fetch_optional(pool)
        .await
}

/// Get or create the local user for a verified identity
///
/// Creation inserts the user row plus zeroed score and streak rows and a
/// free subscription, all in one transaction. A concurrent request that
/// provisions the same uid first makes the insert a no-op; the existing row
/// is then re-read.
///
/// # Errors
///
/// Returns `sqlx::Error::RowNotFound` if the user still cannot be read back.
pub async fn provision_user(pool: &SqlitePool, identity: &VerifiedIdentity) -> Result<User, sqlx::Error> {
    if let Some(user) = get_user_by_uid(pool, &identity.uid).await? {
        return Ok(user);
    }

    let mut tx = pool.begin().await?;

    let inserted = sqlx::query(
        "INSERT INTO users (firebase_uid, email) VALUES (?, ?) ON CONFLICT (firebase_uid) DO NOTHING",
    )
    .bind(&identity.uid)
    .bind(&identity.email)
    .execute(&mut *tx)
    .await?;

    let user_id: i64 = sqlx::query_scalar("SELECT id FROM users WHERE firebase_uid = ?")
        .bind(&identity.uid)
        .fetch_one(&mut *tx)
        .await?;

    for table in ["user_scores", "user_streaks", "user_subscriptions"] {
        sqlx::query(&format!("INSERT OR IGNORE INTO {table} (user_id) VALUES (?)"))
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;

    if inserted.rows_affected() > 0 {
        tracing::info!("Provisioned user {} for uid {}", user_id, identity.uid);
    }

    get_user_by_id(pool, user_id).await?.ok_or_else(|| {
        tracing::error!("User {} vanished after provisioning", identity.uid);
        sqlx::Error::RowNotFound
    })
}

/// Users who opted in to push notifications, ordered by id
pub async fn list_notifiable_users(pool: &SqlitePool) -> Result<Vec<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE notifications_enabled = 1 ORDER BY id"
    ))
    .fetch_all(pool)
    .await
}

pub async fn update_language(pool: &SqlitePool, user_id: i64, language_code: &str) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET language_code = ? WHERE id = ?")
        .bind(language_code)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn update_notifications(pool: &SqlitePool, user_id: i64, enabled: bool) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET notifications_enabled = ? WHERE id = ?")
        .bind(enabled)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn update_username(pool: &SqlitePool, user_id: i64, username: &str) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET username = ? WHERE id = ?")
        .bind(username)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Delete a user; every per-user row cascades
///
/// # Returns
/// `true` if a row was deleted
pub async fn delete_user(pool: &SqlitePool, user_id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::server::config::load_database;

    fn identity(uid: &str) -> VerifiedIdentity {
        VerifiedIdentity {
            uid: uid.to_string(),
            email: Some(format!("{uid}@example.com")),
        }
    }

    #[tokio::test]
    async fn test_provision_creates_companion_rows() {
        let pool = load_database("sqlite::memory:").await.unwrap();
        let user = provision_user(&pool, &identity("alice")).await.unwrap();

        assert_eq!(user.firebase_uid, "alice");
        assert_eq!(user.language_code, "en");
        assert!(user.notifications_enabled);

        let score: i64 = sqlx::query_scalar("SELECT score FROM user_scores WHERE user_id = ?")
            .bind(user.id)
            .fetch_one(&pool)
            .await
            .unwrap();
        let level: String = sqlx::query_scalar("SELECT level FROM user_subscriptions WHERE user_id = ?")
            .bind(user.id)
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(score, 0);
        assert_eq!(level, "free");
    }

    #[tokio::test]
    async fn test_provision_is_idempotent() {
        let pool = load_database("sqlite::memory:").await.unwrap();
        let first = provision_user(&pool, &identity("bob")).await.unwrap();
        let second = provision_user(&pool, &identity("bob")).await.unwrap();
        assert_eq!(first.id, second.id);

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_delete_cascades() {
        let pool = load_database("sqlite::memory:").await.unwrap();
        let user = provision_user(&pool, &identity("carol")).await.unwrap();
        assert!(delete_user(&pool, user.id).await.unwrap());

        let scores: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM user_scores")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(scores, 0);
        assert!(!delete_user(&pool, user.id).await.unwrap());
    }
}
