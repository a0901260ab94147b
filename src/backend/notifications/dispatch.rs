/**
 * Notification Dispatch
 *
 * Sends one daily info to every device of a user.
 *
 * # Flow
 *
 * 1. Load the user's device tokens
 * 2. Multicast the info (title = topic name, body = text in the user's language)
 * 3. Delivered tokens get `last_seen = today`; invalid tokens are deleted
 * 4. Tokens that failed transiently are retried exactly once
 * 5. A metrics row records attempts (one per token send, retries included)
 *    and removed tokens
 *
 * Whatever the delivery result, the info is marked seen and the user's
 * `notifications_sent` counter is incremented, so a broken device does not
 * make the scan resend the same fact forever.
 */

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::SqlitePool;

use crate::backend::auth::User;
use crate::backend::content::db::{mark_info_seen, InfoRow};
use crate::backend::content::topic_display_name;
use crate::backend::notifications::db;
use crate::backend::notifications::push::{MulticastReport, PushMessage, PushSender};
use crate::backend::subscription::{increment_usage, UsageCounter};

/// Summary of a send to one user
#[derive(Debug, Clone, Default, Serialize)]
pub struct SendResult {
    pub user_id: i64,
    /// `None` when no info matched the user
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info_id: Option<i64>,
    /// At least one device received the notification
    pub sent: bool,
    pub tokens_targeted: usize,
    pub success_count: usize,
    pub failure_count: usize,
    pub removed_tokens: usize,
    /// A retry pass was made for transient failures
    pub retried: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Build the push message for an info in `lang`
pub fn info_message(info: &InfoRow, lang: &str) -> PushMessage {
    let mut data = BTreeMap::new();
    data.insert("type".to_string(), "info".to_string());
    data.insert("info_id".to_string(), info.id.to_string());

    PushMessage {
        title: topic_display_name(&info.category).to_string(),
        body: info.text(lang),
        data,
    }
}

/// Apply a report's token bookkeeping
///
/// # Returns
/// Number of tokens deleted
async fn apply_report(pool: &SqlitePool, report: &MulticastReport, today: NaiveDate) -> Result<usize, sqlx::Error> {
    db::touch_tokens(pool, &report.delivered_tokens(), today).await?;
    let removed = db::delete_tokens(pool, &report.invalid_tokens()).await?;
    Ok(removed as usize)
}

/// Send `info` to every registered device of `user`
///
/// # Arguments
/// * `pool` - Database connection pool
/// * `push` - Delivery backend; `None` records an error without sending
/// * `user` - Recipient
/// * `info` - The fact to send
/// * `today` - Date used for token and metric bookkeeping
pub async fn send_info_to_user(
    pool: &SqlitePool,
    push: Option<&dyn PushSender>,
    user: &User,
    info: &InfoRow,
    today: NaiveDate,
) -> Result<SendResult, sqlx::Error> {
    let mut result = SendResult {
        user_id: user.id,
        info_id: Some(info.id),
        ..SendResult::default()
    };

    let tokens = db::tokens_for_user(pool, user.id).await?;
    result.tokens_targeted = tokens.len();

    if tokens.is_empty() {
        result.note = Some("no_device_tokens".to_string());
    } else if let Some(sender) = push {
        let message = info_message(info, &user.language_code);
        match sender.send_multicast(&tokens, &message).await {
            Ok(report) => {
                let mut attempts = tokens.len() as i64;
                let mut removed = apply_report(pool, &report, today).await?;
                let mut success = report.success_count();
                let mut failures = report.failure_count();

                let retry_tokens = report.failed_tokens();
                if !retry_tokens.is_empty() {
                    attempts += retry_tokens.len() as i64;
                    result.retried = true;
                    tracing::info!("Retrying {} failed tokens for user {}", retry_tokens.len(), user.id);
                    match sender.send_multicast(&retry_tokens, &message).await {
                        Ok(retry) => {
                            removed += apply_report(pool, &retry, today).await?;
                            success += retry.success_count();
                            failures = failures - retry_tokens.len() + retry.failure_count();
                        }
                        Err(e) => {
                            tracing::error!("Retry send failed for user {}: {}", user.id, e);
                            result.error = Some(e.to_string());
                        }
                    }
                }

                if removed > 0 {
                    tracing::info!("Removed {} invalid tokens of user {}", removed, user.id);
                }
                db::record_metric(pool, today, attempts, removed as i64).await?;

                result.sent = success > 0;
                result.success_count = success;
                result.failure_count = failures;
                result.removed_tokens = removed;
            }
            Err(e) => {
                tracing::error!("Push send failed for user {}: {}", user.id, e);
                result.error = Some(e.to_string());
                result.failure_count = tokens.len();
            }
        }
    } else {
        tracing::warn!("Push delivery is not configured; skipping user {}", user.id);
        result.error = Some("push delivery not configured".to_string());
    }

    mark_info_seen(pool, user.id, info.id, today).await?;
    increment_usage(pool, user.id, UsageCounter::NotificationsSent, 1).await?;

    Ok(result)
}
