/**
 * Content Database Operations
 *
 * Row types for quiz questions, true/false questions, daily infos and
 * challenges, together with the per-user seen/answered bookkeeping used by
 * unseen selection.
 *
 * Text columns hold language-keyed JSON and are decoded with
 * `LocalizedText`.
 */

use std::collections::HashSet;

use chrono::NaiveDate;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::shared::LocalizedText;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct QuizQuestionRow {
    pub id: i64,
    pub question_texts: String,
    pub options_texts: String,
    pub correct_answer_index: i64,
    pub category: String,
}

impl QuizQuestionRow {
    pub fn question(&self) -> LocalizedText {
        LocalizedText::parse(&self.question_texts)
    }

    pub fn options(&self) -> LocalizedText {
        LocalizedText::parse(&self.options_texts)
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TrueFalseRow {
    pub id: i64,
    pub question_texts: String,
    pub correct_answer: bool,
    pub category: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct InfoRow {
    pub id: i64,
    pub info_texts: String,
    pub category: String,
    pub source: Option<String>,
}

impl InfoRow {
    pub fn text(&self, lang: &str) -> String {
        LocalizedText::parse(&self.info_texts).text(lang)
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ChallengeRow {
    pub id: i64,
    pub challenge_texts: String,
    pub category: String,
}

/// Content tables; each has a per-user "seen" join table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Quiz,
    TrueFalse,
    Info,
    Challenge,
}

impl ContentKind {
    pub fn table(&self) -> &'static str {
        match self {
            Self::Quiz => "quiz_questions",
            Self::TrueFalse => "true_false_questions",
            Self::Info => "daily_infos",
            Self::Challenge => "challenges",
        }
    }

    fn seen_table(&self) -> (&'static str, &'static str) {
        match self {
            Self::Quiz => ("user_answered_questions", "question_id"),
            Self::TrueFalse => ("user_answered_true_false", "question_id"),
            Self::Info => ("user_seen_infos", "info_id"),
            Self::Challenge => ("user_completed_challenges", "challenge_id"),
        }
    }
}

fn push_category_filter(builder: &mut QueryBuilder<'_, Sqlite>, categories: &[String]) {
    if categories.is_empty() {
        return;
    }
    builder.push(" WHERE category IN (");
    let mut separated = builder.separated(", ");
    for category in categories {
        separated.push_bind(category.clone());
    }
    separated.push_unseparated(")");
}

/// Quiz questions in any of `categories` (all when empty)
pub async fn list_quiz_questions(pool: &SqlitePool, categories: &[String]) -> Result<Vec<QuizQuestionRow>, sqlx::Error> {
    let mut builder = QueryBuilder::<Sqlite>::new(
        "SELECT id, question_texts, options_texts, correct_answer_index, category FROM quiz_questions",
    );
    push_category_filter(&mut builder, categories);
    builder.push(" ORDER BY id");
    builder.build_query_as::<QuizQuestionRow>().fetch_all(pool).await
}

pub async fn get_quiz_question(pool: &SqlitePool, id: i64) -> Result<Option<QuizQuestionRow>, sqlx::Error> {
    sqlx::query_as::<_, QuizQuestionRow>(
        "SELECT id, question_texts, options_texts, correct_answer_index, category FROM quiz_questions WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Quiz questions with the given ids, in id order; unknown ids are skipped
pub async fn get_quiz_questions_by_ids(pool: &SqlitePool, ids: &[i64]) -> Result<Vec<QuizQuestionRow>, sqlx::Error> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let mut builder = QueryBuilder::<Sqlite>::new(
        "SELECT id, question_texts, options_texts, correct_answer_index, category FROM quiz_questions WHERE id IN (",
    );
    let mut separated = builder.separated(", ");
    for id in ids {
        separated.push_bind(*id);
    }
    separated.push_unseparated(") ORDER BY id");
    builder.build_query_as::<QuizQuestionRow>().fetch_all(pool).await
}

pub async fn list_true_false(pool: &SqlitePool) -> Result<Vec<TrueFalseRow>, sqlx::Error> {
    sqlx::query_as::<_, TrueFalseRow>(
        "SELECT id, question_texts, correct_answer, category FROM true_false_questions ORDER BY id",
    )
    .fetch_all(pool)
    .await
}

pub async fn get_true_false(pool: &SqlitePool, id: i64) -> Result<Option<TrueFalseRow>, sqlx::Error> {
    sqlx::query_as::<_, TrueFalseRow>(
        "SELECT id, question_texts, correct_answer, category FROM true_false_questions WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Daily infos in any of `categories` (all when empty)
pub async fn list_infos(pool: &SqlitePool, categories: &[String]) -> Result<Vec<InfoRow>, sqlx::Error> {
    let mut builder = QueryBuilder::<Sqlite>::new("SELECT id, info_texts, category, source FROM daily_infos");
    push_category_filter(&mut builder, categories);
    builder.push(" ORDER BY id");
    builder.build_query_as::<InfoRow>().fetch_all(pool).await
}

pub async fn list_challenges(pool: &SqlitePool) -> Result<Vec<ChallengeRow>, sqlx::Error> {
    sqlx::query_as::<_, ChallengeRow>("SELECT id, challenge_texts, category FROM challenges ORDER BY id")
        .fetch_all(pool)
        .await
}

pub async fn get_challenge(pool: &SqlitePool, id: i64) -> Result<Option<ChallengeRow>, sqlx::Error> {
    sqlx::query_as::<_, ChallengeRow>("SELECT id, challenge_texts, category FROM challenges WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Number of rows in a content table
pub async fn count_content(pool: &SqlitePool, kind: ContentKind) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", kind.table()))
        .fetch_one(pool)
        .await
}

/// Ids of `kind` content the user has already seen or answered
pub async fn seen_ids(pool: &SqlitePool, kind: ContentKind, user_id: i64) -> Result<HashSet<i64>, sqlx::Error> {
    let (table, column) = kind.seen_table();
    let ids: Vec<i64> = sqlx::query_scalar(&format!("SELECT {column} FROM {table} WHERE user_id = ?"))
        .bind(user_id)
        .fetch_all(pool)
        .await?;
    Ok(ids.into_iter().collect())
}

/// Forget everything the user has seen of `kind`
///
/// # Returns
/// Number of rows removed
pub async fn clear_seen(pool: &SqlitePool, kind: ContentKind, user_id: i64) -> Result<u64, sqlx::Error> {
    let (table, _) = kind.seen_table();
    let result = sqlx::query(&format!("DELETE FROM {table} WHERE user_id = ?"))
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

/// Mark an info as shown to the user today
pub async fn mark_info_seen(pool: &SqlitePool, user_id: i64, info_id: i64, shown_at: NaiveDate) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO user_seen_infos (user_id, info_id, shown_at) VALUES (?, ?, ?) \
         ON CONFLICT (user_id, info_id) DO UPDATE SET shown_at = excluded.shown_at",
    )
    .bind(user_id)
    .bind(info_id)
    .bind(shown_at)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn mark_challenge_completed(pool: &SqlitePool, user_id: i64, challenge_id: i64) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT OR IGNORE INTO user_completed_challenges (user_id, challenge_id) VALUES (?, ?)")
        .bind(user_id)
        .bind(challenge_id)
        .execute(pool)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::server::config::load_database;

    #[tokio::test]
    async fn test_category_filter_and_id_lookup() {
        let pool = load_database("sqlite::memory:").await.unwrap();
        let mut ids = Vec::new();
        for category in ["history", "science"] {
            let id: i64 = sqlx::query_scalar(
                "INSERT INTO quiz_questions (question_texts, options_texts, correct_answer_index, category) \
                 VALUES ('{\"en\": \"Q?\"}', '{\"en\": [\"a\", \"b\", \"c\", \"d\"]}', 0, ?) RETURNING id",
            )
            .bind(category)
            .fetch_one(&pool)
            .await
            .unwrap();
            ids.push(id);
        }
        let (history, science) = (ids[0], ids[1]);

        let all = list_quiz_questions(&pool, &[]).await.unwrap();
        assert_eq!(all.len(), 2);

        let only_science = list_quiz_questions(&pool, &["science".to_string()]).await.unwrap();
        assert_eq!(only_science.len(), 1);
        assert_eq!(only_science[0].id, science);

        let by_ids = get_quiz_questions_by_ids(&pool, &[history, 999]).await.unwrap();
        assert_eq!(by_ids.len(), 1);
        assert_eq!(by_ids[0].options().options("en").len(), 4);
    }
}
