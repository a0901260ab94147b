use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::backend::content::db::{self, ContentKind, TrueFalseRow};
use crate::backend::content::selection::pick_unseen;
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::middleware::CurrentUser;
use crate::backend::subscription::{consume_energy, resolve_access, today};
use crate::shared::{resolve_language, LocalizedText};

fn default_true_false_limit() -> i64 {
    10
}

#[derive(Debug, Deserialize)]
pub struct TrueFalseQuery {
    #[serde(default = "default_true_false_limit")]
    pub limit: i64,
    pub lang: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TrueFalseItem {
    pub id: i64,
    pub question_text: String,
    pub correct_answer: bool,
    pub category: String,
    pub session_seconds: i64,
}

impl TrueFalseItem {
    fn from_row(row: &TrueFalseRow, lang: &str, session_seconds: i64) -> Self {
        Self {
            id: row.id,
            question_text: LocalizedText::parse(&row.question_texts).text(lang),
            correct_answer: row.correct_answer,
            category: row.category.clone(),
            session_seconds,
        }
    }
}

/// GET /truefalse/
///
/// Every call is a real session and costs one energy. The request size is
/// clamped to the number of questions available.
pub async fn get_true_false(
    State(pool): State<SqlitePool>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<TrueFalseQuery>,
) -> BackendResult<Json<Vec<TrueFalseItem>>> {
    let candidates = db::list_true_false(&pool).await?;
    if candidates.is_empty() {
        return Err(BackendError::not_found("No true/false questions available."));
    }

    let access = resolve_access(&pool, user.id, today()).await?;
    let lang = resolve_language(query.lang.as_deref(), &user.language_code);

    let count = (query.limit.max(1) as usize).min(candidates.len());
    let answered = db::seen_ids(&pool, ContentKind::TrueFalse, user.id).await?;
    let selection = pick_unseen(&candidates, &answered, |q| q.id, count)
        .ok_or_else(|| BackendError::not_found("No true/false questions available."))?;

    consume_energy(&pool, user.id).await?;
    if selection.cycled {
        let cleared = db::clear_seen(&pool, ContentKind::TrueFalse, user.id).await?;
        tracing::info!("User {} exhausted true/false pool, cleared {} rows", user.id, cleared);
    }

    let session_seconds = access.limits.session_seconds;
    Ok(Json(
        selection
            .items
            .iter()
            .map(|row| TrueFalseItem::from_row(row, &lang, session_seconds))
            .collect(),
    ))
}
