//! Content inserts used by the importer and the generator.
//!
//! Localized columns are written as JSON objects keyed by language code.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::backend::content::db::ContentKind;
use crate::seeding::error::SeedError;

fn default_challenge_category() -> String {
    "fun".to_string()
}

/// A daily info as stored in `manual_info.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfoRecord {
    pub info_texts: BTreeMap<String, String>,
    pub category: String,
    #[serde(default)]
    pub source: Option<String>,
}

/// A quiz question as stored in `manual_quiz.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizRecord {
    pub question_texts: BTreeMap<String, String>,
    pub options_texts: BTreeMap<String, Vec<String>>,
    pub correct_answer_index: i64,
    pub category: String,
}

/// A true/false question as stored in `manual_truefalse.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrueFalseRecord {
    pub question_texts: BTreeMap<String, String>,
    pub correct_answer: bool,
    pub category: String,
}

/// A challenge as stored in `manual_challenges.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChallengeRecord {
    pub challenge_texts: BTreeMap<String, String>,
    #[serde(default = "default_challenge_category")]
    pub category: String,
}

pub async fn insert_info(pool: &SqlitePool, record: &InfoRecord) -> Result<i64, SeedError> {
    let id = sqlx::query("INSERT INTO daily_infos (info_texts, category, source) VALUES (?, ?, ?)")
        .bind(serde_json::to_string(&record.info_texts)?)
        .bind(&record.category)
        .bind(&record.source)
        .execute(pool)
        .await?
        .last_insert_rowid();
    Ok(id)
}

pub async fn insert_quiz(pool: &SqlitePool, record: &QuizRecord) -> Result<i64, SeedError> {
    let id = sqlx::query(
        "INSERT INTO quiz_questions (question_texts, options_texts, correct_answer_index, category) \
         VALUES (?, ?, ?, ?)",
    )
    .bind(serde_json::to_string(&record.question_texts)?)
    .bind(serde_json::to_string(&record.options_texts)?)
    .bind(record.correct_answer_index)
    .bind(&record.category)
    .execute(pool)
    .await?
    .last_insert_rowid();
    Ok(id)
}

pub async fn insert_true_false(pool: &SqlitePool, record: &TrueFalseRecord) -> Result<i64, SeedError> {
    let id = sqlx::query("INSERT INTO true_false_questions (question_texts, correct_answer, category) VALUES (?, ?, ?)")
        .bind(serde_json::to_string(&record.question_texts)?)
        .bind(record.correct_answer)
        .bind(&record.category)
        .execute(pool)
        .await?
        .last_insert_rowid();
    Ok(id)
}

pub async fn insert_challenge(pool: &SqlitePool, record: &ChallengeRecord) -> Result<i64, SeedError> {
    let id = sqlx::query("INSERT INTO challenges (challenge_texts, category) VALUES (?, ?)")
        .bind(serde_json::to_string(&record.challenge_texts)?)
        .bind(&record.category)
        .execute(pool)
        .await?
        .last_insert_rowid();
    Ok(id)
}

/// Whether a row of `kind` already has `english` as its English text
pub async fn english_text_exists(pool: &SqlitePool, kind: ContentKind, english: &str) -> Result<bool, SeedError> {
    let column = match kind {
        ContentKind::Quiz | ContentKind::TrueFalse => "question_texts",
        ContentKind::Info => "info_texts",
        ContentKind::Challenge => "challenge_texts",
    };
    let sql = format!(
        "SELECT EXISTS (SELECT 1 FROM {} WHERE json_extract({}, '$.en') = ?)",
        kind.table(),
        column
    );
    let exists: bool = sqlx::query_scalar(&sql).bind(english).fetch_one(pool).await?;
    Ok(exists)
}
