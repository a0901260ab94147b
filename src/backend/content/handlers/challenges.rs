use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::backend::content::db::{self, ChallengeRow, ContentKind};
use crate::backend::content::selection::pick_unseen;
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::middleware::CurrentUser;
use crate::backend::subscription::{increment_usage, resolve_access, today, UsageCounter};
use crate::shared::{resolve_language, LimitMessage, LocalizedText};

#[derive(Debug, Serialize)]
pub struct ChallengeResponse {
    pub id: i64,
    pub challenge_text: String,
    pub category: String,
}

impl ChallengeResponse {
    fn from_row(row: &ChallengeRow, lang: &str) -> Self {
        Self {
            id: row.id,
            challenge_text: LocalizedText::parse(&row.challenge_texts).text(lang),
            category: row.category.clone(),
        }
    }
}

/// GET /challenges/random/
///
/// Hands out an uncompleted challenge, marks it completed and counts it
/// against the daily challenge allowance.
pub async fn get_random_challenge(
    State(pool): State<SqlitePool>,
    CurrentUser(user): CurrentUser,
) -> BackendResult<Json<ChallengeResponse>> {
    let access = resolve_access(&pool, user.id, today()).await?;
    let lang = resolve_language(None, &user.language_code);

    if let (Some(limit), Some(0)) = (access.limits.challenge_limit, access.remaining_challenges()) {
        return Err(BackendError::forbidden(
            LimitMessage::DailyChallengeLimitReached.render(&lang, limit),
        ));
    }

    let candidates = db::list_challenges(&pool).await?;
    let completed = db::seen_ids(&pool, ContentKind::Challenge, user.id).await?;
    let selection = pick_unseen(&candidates, &completed, |c| c.id, 1)
        .ok_or_else(|| BackendError::not_found("No challenges available."))?;

    if selection.cycled {
        db::clear_seen(&pool, ContentKind::Challenge, user.id).await?;
    }
    let challenge = selection
        .items
        .into_iter()
        .next()
        .ok_or_else(|| BackendError::not_found("No challenges available."))?;

    db::mark_challenge_completed(&pool, user.id, challenge.id).await?;
    increment_usage(&pool, user.id, UsageCounter::Challenges, 1).await?;

    Ok(Json(ChallengeResponse::from_row(&challenge, &lang)))
}

#[derive(Debug, Deserialize)]
pub struct LocalizeChallengeQuery {
    pub lang: Option<String>,
}

/// GET /challenges/{id}/localize/
pub async fn localize_challenge(
    State(pool): State<SqlitePool>,
    Path(challenge_id): Path<i64>,
    Query(query): Query<LocalizeChallengeQuery>,
) -> BackendResult<Json<ChallengeResponse>> {
    let challenge = db::get_challenge(&pool, challenge_id)
        .await?
        .ok_or_else(|| BackendError::not_found("Challenge not found"))?;
    let lang = resolve_language(query.lang.as_deref(), "en");
    Ok(Json(ChallengeResponse::from_row(&challenge, &lang)))
}
