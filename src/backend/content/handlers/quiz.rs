/**
 * Quiz Handlers
 *
 * - `GET /quiz/` - draw a quiz session for the caller
 * - `GET /quiz/localize/` - re-render known questions in another language
 */

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::backend::content::db::{self, ContentKind, QuizQuestionRow};
use crate::backend::content::selection::pick_unseen;
use crate::backend::content::topics::get_topic_preferences;
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::middleware::CurrentUser;
use crate::backend::subscription::{consume_energy, resolve_access, today};
use crate::shared::{resolve_language, LimitMessage};

fn default_quiz_limit() -> i64 {
    3
}

#[derive(Debug, Deserialize)]
pub struct QuizQuery {
    #[serde(default = "default_quiz_limit")]
    pub limit: i64,
    pub lang: Option<String>,
    #[serde(default)]
    pub preview: bool,
}

#[derive(Debug, Serialize)]
pub struct QuizItem {
    pub id: i64,
    pub question_text: String,
    pub options: Vec<String>,
    pub correct_answer_index: i64,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_seconds: Option<i64>,
}

impl QuizItem {
    fn from_row(row: &QuizQuestionRow, lang: &str, session_seconds: Option<i64>) -> Self {
        Self {
            id: row.id,
            question_text: row.question().text(lang),
            options: row.options().options(lang),
            correct_answer_index: row.correct_answer_index,
            category: row.category.clone(),
            session_seconds,
        }
    }
}

/// GET /quiz/
///
/// # Flow
///
/// 1. Resolve today's access; clamp the request to the remaining daily quota
///    (403 with a localized message once it is used up)
/// 2. Draw unseen questions from the caller's topics, cycling when exhausted
/// 3. For real sessions, spend one energy and apply the cycle
///
/// Preview requests cost nothing and never clear answer history.
pub async fn get_quiz(
    State(pool): State<SqlitePool>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<QuizQuery>,
) -> BackendResult<Json<Vec<QuizItem>>> {
    let access = resolve_access(&pool, user.id, today()).await?;
    let lang = resolve_language(query.lang.as_deref(), &user.language_code);

    let mut requested = query.limit.max(0);
    if let (Some(limit), Some(remaining)) = (access.limits.quiz_limit, access.remaining_quizzes()) {
        if remaining == 0 {
            return Err(BackendError::forbidden(
                LimitMessage::DailyQuizLimitReached.render(&lang, limit),
            ));
        }
        requested = requested.min(remaining);
    }

    let topics = get_topic_preferences(&pool, user.id).await?;
    let candidates = db::list_quiz_questions(&pool, &topics).await?;
    let answered = db::seen_ids(&pool, ContentKind::Quiz, user.id).await?;

    let selection = pick_unseen(&candidates, &answered, |q| q.id, requested as usize).ok_or_else(|| {
        BackendError::not_found(if query.preview {
            "Not enough questions for preview."
        } else {
            "Not enough new questions."
        })
    })?;

    if !query.preview && !selection.items.is_empty() {
        consume_energy(&pool, user.id).await?;
        if selection.cycled {
            let cleared = db::clear_seen(&pool, ContentKind::Quiz, user.id).await?;
            tracing::info!("User {} exhausted quiz pool, cleared {} answered rows", user.id, cleared);
        }
    }

    let session_seconds = Some(access.limits.session_seconds);
    Ok(Json(
        selection
            .items
            .iter()
            .map(|row| QuizItem::from_row(row, &lang, session_seconds))
            .collect(),
    ))
}

#[derive(Debug, Deserialize)]
pub struct LocalizeQuery {
    pub ids: Option<String>,
    pub lang: Option<String>,
}

/// Parse a comma-separated id list such as `"1, 2,3"`
pub fn parse_id_list(raw: &str) -> Option<Vec<i64>> {
    let ids: Vec<i64> = raw
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| part.parse::<i64>().ok())
        .collect::<Option<_>>()?;
    (!ids.is_empty()).then_some(ids)
}

/// GET /quiz/localize/
pub async fn localize_quiz(
    State(pool): State<SqlitePool>,
    Query(query): Query<LocalizeQuery>,
) -> BackendResult<Json<Vec<QuizItem>>> {
    let ids = query
        .ids
        .as_deref()
        .and_then(parse_id_list)
        .ok_or_else(|| BackendError::bad_request("Invalid ids parameter"))?;
    let lang = resolve_language(query.lang.as_deref(), "en");

    let rows = db::get_quiz_questions_by_ids(&pool, &ids).await?;
    Ok(Json(rows.iter().map(|row| QuizItem::from_row(row, &lang, None)).collect()))
}
