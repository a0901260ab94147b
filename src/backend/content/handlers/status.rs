use axum::{extract::State, Json};
use serde::Serialize;
use serde_json::Value;
use sqlx::SqlitePool;

use crate::backend::content::db::{self, ContentKind};
use crate::backend::error::BackendResult;
use crate::shared::LocalizedText;

#[derive(Debug, Serialize)]
pub struct ContentStatus {
    /// Whether any true/false questions are loaded
    pub loaded: bool,
    /// Number of true/false questions
    pub count: i64,
    /// First true/false question, if any
    pub sample: Option<Value>,
    pub quiz_count: i64,
    pub info_count: i64,
    pub challenge_count: i64,
}

/// GET /debug/content-status/
pub async fn content_status(State(pool): State<SqlitePool>) -> BackendResult<Json<ContentStatus>> {
    let true_false = db::list_true_false(&pool).await?;
    let sample = true_false.first().map(|row| {
        serde_json::json!({
            "id": row.id,
            "question_texts": LocalizedText::parse(&row.question_texts),
            "correct_answer": row.correct_answer,
            "category": row.category,
        })
    });

    Ok(Json(ContentStatus {
        loaded: !true_false.is_empty(),
        count: true_false.len() as i64,
        sample,
        quiz_count: db::count_content(&pool, ContentKind::Quiz).await?,
        info_count: db::count_content(&pool, ContentKind::Info).await?,
        challenge_count: db::count_content(&pool, ContentKind::Challenge).await?,
    }))
}
