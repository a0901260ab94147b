/**
 * Access Resolution
 *
 * Every gated request starts by resolving the caller's access level for the
 * current day. Resolution is idempotent and lazily performs the daily
 * bookkeeping:
 *
 * 1. Ensure a subscription row exists; an expired paid subscription is
 *    downgraded to free and its expiry cleared.
 * 2. Ensure the energy row exists; on the first request of a new day it is
 *    refilled to the tier's `energy_per_day`.
 * 3. Ensure the daily usage row exists; on the first request of a new day
 *    all counters are zeroed.
 *
 * Dates are stored as `YYYY-MM-DD` text, so `<` compares chronologically.
 */

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::backend::error::BackendError;
use crate::backend::subscription::tiers::{SubscriptionTier, TierLimits};

/// Current UTC calendar day
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Resolved subscription state and today's usage for one user
#[derive(Debug, Clone, Serialize)]
pub struct AccessLevel {
    pub tier: SubscriptionTier,
    pub limits: TierLimits,
    pub expires_at: Option<NaiveDate>,
    pub remaining_energy: i64,
    pub questions_answered: i64,
    pub challenge_count: i64,
    pub notifications_sent: i64,
}

impl AccessLevel {
    /// Quiz questions still available today; `None` is unlimited
    pub fn remaining_quizzes(&self) -> Option<i64> {
        self.limits
            .quiz_limit
            .map(|limit| (limit - self.questions_answered).max(0))
    }

    /// Challenges still available today; `None` is unlimited
    pub fn remaining_challenges(&self) -> Option<i64> {
        self.limits
            .challenge_limit
            .map(|limit| (limit - self.challenge_count).max(0))
    }

    pub fn can_receive_notification(&self) -> bool {
        self.notifications_sent < self.limits.notifications_per_day
    }
}

/// Daily usage counters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageCounter {
    QuestionsAnswered,
    Challenges,
    NotificationsSent,
}

impl UsageCounter {
    fn column(&self) -> &'static str {
        match self {
            Self::QuestionsAnswered => "questions_answered",
            Self::Challenges => "challenge_count",
            Self::NotificationsSent => "notifications_sent",
        }
    }
}

#[derive(sqlx::FromRow)]
struct SubscriptionRow {
    level: String,
    expires_at: Option<NaiveDate>,
}

#[derive(sqlx::FromRow)]
struct UsageRow {
    questions_answered: i64,
    challenge_count: i64,
    notifications_sent: i64,
}

/// Resolve a user's access level for `today`, performing daily resets
///
/// # Arguments
/// * `pool` - Database connection pool
/// * `user_id` - Local user id
/// * `today` - The current calendar day
pub async fn resolve_access(
    pool: &SqlitePool,
    user_id: i64,
    today: NaiveDate,
) -> Result<AccessLevel, sqlx::Error> {
    sqlx::query("INSERT OR IGNORE INTO user_subscriptions (user_id) VALUES (?)")
        .bind(user_id)
        .execute(pool)
        .await?;

    let downgraded = sqlx::query(
        "UPDATE user_subscriptions SET level = 'free', expires_at = NULL \
         WHERE user_id = ? AND expires_at IS NOT NULL AND expires_at < ?",
    )
    .bind(user_id)
    .bind(today)
    .execute(pool)
    .await?;
    if downgraded.rows_affected() > 0 {
        tracing::info!("Subscription of user {} expired, downgraded to free", user_id);
    }

    let subscription = sqlx::query_as::<_, SubscriptionRow>(
        "SELECT level, expires_at FROM user_subscriptions WHERE user_id = ?",
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    let tier = SubscriptionTier::from_stored(&subscription.level);
    let limits = tier.limits();

    sqlx::query("INSERT OR IGNORE INTO user_energy (user_id, remaining_energy, last_reset) VALUES (?, ?, ?)")
        .bind(user_id)
        .bind(limits.energy_per_day)
        .bind(today)
        .execute(pool)
        .await?;
    sqlx::query("UPDATE user_energy SET remaining_energy = ?, last_reset = ? WHERE user_id = ? AND last_reset < ?")
        .bind(limits.energy_per_day)
        .bind(today)
        .bind(user_id)
        .bind(today)
        .execute(pool)
        .await?;

    sqlx::query("INSERT OR IGNORE INTO daily_usage (user_id, last_reset) VALUES (?, ?)")
        .bind(user_id)
        .bind(today)
        .execute(pool)
        .await?;
    sqlx::query(
        "UPDATE daily_usage SET questions_answered = 0, challenge_count = 0, notifications_sent = 0, last_reset = ? \
         WHERE user_id = ? AND last_reset < ?",
    )
    .bind(today)
    .bind(user_id)
    .bind(today)
    .execute(pool)
    .await?;

    let remaining_energy: i64 = sqlx::query_scalar("SELECT remaining_energy FROM user_energy WHERE user_id = ?")
        .bind(user_id)
        .fetch_one(pool)
        .await?;

    let usage = sqlx::query_as::<_, UsageRow>(
        "SELECT questions_answered, challenge_count, notifications_sent FROM daily_usage WHERE user_id = ?",
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(AccessLevel {
        tier,
        limits,
        expires_at: subscription.expires_at,
        remaining_energy,
        questions_answered: usage.questions_answered,
        challenge_count: usage.challenge_count,
        notifications_sent: usage.notifications_sent,
    })
}

/// Spend one unit of energy
///
/// The decrement is a single conditional update, so two concurrent sessions
/// can never drive energy below zero.
///
/// # Returns
/// Remaining energy after the decrement
///
/// # Errors
/// `403 Insufficient energy` when none is left.
pub async fn consume_energy(pool: &SqlitePool, user_id: i64) -> Result<i64, BackendError> {
    let remaining: Option<i64> = sqlx::query_scalar(
        "UPDATE user_energy SET remaining_energy = remaining_energy - 1 \
         WHERE user_id = ? AND remaining_energy > 0 RETURNING remaining_energy",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    remaining.ok_or_else(|| BackendError::forbidden("Insufficient energy"))
}

/// Add `amount` to one of today's usage counters
pub async fn increment_usage(
    pool: &SqlitePool,
    user_id: i64,
    counter: UsageCounter,
    amount: i64,
) -> Result<(), sqlx::Error> {
    let column = counter.column();
    sqlx::query(&format!(
        "UPDATE daily_usage SET {column} = {column} + ? WHERE user_id = ?"
    ))
    .bind(amount)
    .bind(user_id)
    .execute(pool)
    .await?;
    Ok(())
}

/// Insert or replace a user's subscription
pub async fn set_subscription(
    pool: &SqlitePool,
    user_id: i64,
    tier: SubscriptionTier,
    expires_at: Option<NaiveDate>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO user_subscriptions (user_id, level, expires_at) VALUES (?, ?, ?) \
         ON CONFLICT (user_id) DO UPDATE SET level = excluded.level, expires_at = excluded.expires_at",
    )
    .bind(user_id)
    .bind(tier.as_str())
    .bind(expires_at)
    .execute(pool)
    .await?;
    Ok(())
}
