//! Daily info selection shared by `GET /info/random/` and push notifications.

use sqlx::SqlitePool;

use crate::backend::content::db::{clear_seen, list_infos, seen_ids, ContentKind, InfoRow};
use crate::backend::content::selection::pick_unseen;
use crate::backend::content::topics::get_topic_preferences;

/// Pick an info the user has not seen yet
///
/// With a `category` only that category is considered. Otherwise the user's
/// topic preferences apply, widening to every info when they match nothing.
/// When every candidate has been seen the user's info history is cleared and
/// the pick is made from all candidates.
///
/// The caller is responsible for marking the returned info as seen.
///
/// # Returns
/// `None` when no info matches
pub async fn pick_info_for_user(
    pool: &SqlitePool,
    user_id: i64,
    category: Option<&str>,
) -> Result<Option<InfoRow>, sqlx::Error> {
    let categories = match category {
        Some(category) => vec![category.to_string()],
        None => get_topic_preferences(pool, user_id).await?,
    };

    let mut candidates = list_infos(pool, &categories).await?;
    if candidates.is_empty() && category.is_none() && !categories.is_empty() {
        candidates = list_infos(pool, &[]).await?;
    }
    if candidates.is_empty() {
        return Ok(None);
    }

    let seen = seen_ids(pool, ContentKind::Info, user_id).await?;
    let Some(selection) = pick_unseen(&candidates, &seen, |info| info.id, 1) else {
        return Ok(None);
    };

    if selection.cycled {
        let cleared = clear_seen(pool, ContentKind::Info, user_id).await?;
        tracing::debug!("User {} has seen every info, cleared {} rows", user_id, cleared);
    }

    Ok(selection.items.into_iter().next())
}
