/**
 * Progress Database Operations
 *
 * Score, streak and answer history.
 *
 * # Answer Rules
 *
 * Each question can earn points once per answer cycle. A first answer:
 * - correct: adds the tier's points (with streak bonus) to the score,
 *   increments the streak and writes a score-history row
 * - wrong: resets the streak to zero
 *
 * and is then recorded as answered. Repeat answers change nothing.
 */

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::SqlitePool;

use crate::backend::progress::scoring::{points_for_correct_answer, QuestionKind};
use crate::backend::subscription::SubscriptionTier;

/// Effect of submitting an answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub score_awarded: i64,
    pub new_score: i64,
    /// The question had already been answered; nothing changed
    pub repeated: bool,
}

fn answered_table(kind: QuestionKind) -> &'static str {
    match kind {
        QuestionKind::Quiz => "user_answered_questions",
        QuestionKind::TrueFalse => "user_answered_true_false",
    }
}

/// Apply an answer to the user's score and streak
///
/// Runs in a single transaction. For quiz questions an answer record is
/// written for per-category analysis and today's `questions_answered`
/// counter is incremented; the daily usage row must already exist.
///
/// # Arguments
/// * `pool` - Database connection pool
/// * `user_id` - Local user id
/// * `question_id` - Id of the answered question
/// * `kind` - Quiz or true/false
/// * `correct` - Whether the answer was right
/// * `tier` - The user's current tier, for base points
/// * `today` - Date stamped on history rows
pub async fn apply_answer(
    pool: &SqlitePool,
    user_id: i64,
    question_id: i64,
    kind: QuestionKind,
    correct: bool,
    tier: SubscriptionTier,
    today: NaiveDate,
) -> Result<AnswerOutcome, sqlx::Error> {
    let table = answered_table(kind);
    let mut tx = pool.begin().await?;

    sqlx::query("INSERT OR IGNORE INTO user_scores (user_id) VALUES (?)")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("INSERT OR IGNORE INTO user_streaks (user_id) VALUES (?)")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    let already: Option<i64> = sqlx::query_scalar(&format!(
        "SELECT 1 FROM {table} WHERE user_id = ? AND question_id = ?"
    ))
    .bind(user_id)
    .bind(question_id)
    .fetch_optional(&mut *tx)
    .await?;

    if already.is_some() {
        let score: i64 = sqlx::query_scalar("SELECT score FROM user_scores WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;
        return Ok(AnswerOutcome { score_awarded: 0, new_score: score, repeated: true });
    }

    let streak: i64 = sqlx::query_scalar("SELECT streak_count FROM user_streaks WHERE user_id = ?")
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

    let mut awarded = 0;
    if correct {
        awarded = points_for_correct_answer(tier, streak, kind);
        sqlx::query("UPDATE user_scores SET score = score + ? WHERE user_id = ?")
            .bind(awarded)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("UPDATE user_streaks SET streak_count = streak_count + 1 WHERE user_id = ?")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("INSERT INTO score_history (user_id, points, awarded_on) VALUES (?, ?, ?)")
            .bind(user_id)
            .bind(awarded)
            .bind(today)
            .execute(&mut *tx)
            .await?;
    } else {
        sqlx::query("UPDATE user_streaks SET streak_count = 0 WHERE user_id = ?")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
    }

    sqlx::query(&format!("INSERT INTO {table} (user_id, question_id) VALUES (?, ?)"))
        .bind(user_id)
        .bind(question_id)
        .execute(&mut *tx)
        .await?;

    if kind == QuestionKind::Quiz {
        sqlx::query("INSERT INTO user_answer_records (user_id, question_id, correct, answered_on) VALUES (?, ?, ?, ?)")
            .bind(user_id)
            .bind(question_id)
            .bind(correct)
            .bind(today)
            .execute(&mut *tx)
            .await?;
        sqlx::query("UPDATE daily_usage SET questions_answered = questions_answered + 1 WHERE user_id = ?")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
    }

    let new_score: i64 = sqlx::query_scalar("SELECT score FROM user_scores WHERE user_id = ?")
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

    tx.commit().await?;

    tracing::debug!(
        "User {} answered {:?} {} ({}), awarded {}",
        user_id,
        kind,
        question_id,
        if correct { "correct" } else { "wrong" },
        awarded
    );

    Ok(AnswerOutcome { score_awarded: awarded, new_score, repeated: false })
}

pub async fn get_score(pool: &SqlitePool, user_id: i64) -> Result<i64, sqlx::Error> {
    let score: Option<i64> = sqlx::query_scalar("SELECT score FROM user_scores WHERE user_id = ?")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
    Ok(score.unwrap_or(0))
}

pub async fn get_streak(pool: &SqlitePool, user_id: i64) -> Result<i64, sqlx::Error> {
    let streak: Option<i64> = sqlx::query_scalar("SELECT streak_count FROM user_streaks WHERE user_id = ?")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
    Ok(streak.unwrap_or(0))
}

/// Points earned on `day`
pub async fn daily_points(pool: &SqlitePool, user_id: i64, day: NaiveDate) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COALESCE(SUM(points), 0) FROM score_history WHERE user_id = ? AND awarded_on = ?")
        .bind(user_id)
        .bind(day)
        .fetch_one(pool)
        .await
}

/// Quiz accuracy in one category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryStat {
    pub category: String,
    pub correct: i64,
    pub total: i64,
    /// Percentage correct, rounded to one decimal
    pub percent: f64,
}

#[derive(sqlx::FromRow)]
struct CategoryCounts {
    category: String,
    correct: i64,
    total: i64,
}

/// Per-category quiz accuracy, best category first
pub async fn category_analysis(pool: &SqlitePool, user_id: i64) -> Result<Vec<CategoryStat>, sqlx::Error> {
    let rows = sqlx::query_as::<_, CategoryCounts>(
        "SELECT q.category AS category, \
                CAST(SUM(CASE WHEN r.correct THEN 1 ELSE 0 END) AS INTEGER) AS correct, \
                COUNT(*) AS total \
         FROM user_answer_records r JOIN quiz_questions q ON q.id = r.question_id \
         WHERE r.user_id = ? GROUP BY q.category",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    let mut stats: Vec<CategoryStat> = rows
        .into_iter()
        .map(|row| {
            let percent = if row.total > 0 {
                (row.correct as f64 * 1000.0 / row.total as f64).round() / 10.0
            } else {
                0.0
            };
            CategoryStat {
                category: row.category,
                correct: row.correct,
                total: row.total,
                percent,
            }
        })
        .collect();

    stats.sort_by(|a, b| {
        b.percent
            .total_cmp(&a.percent)
            .then_with(|| a.category.cmp(&b.category))
    });
    Ok(stats)
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct LeaderboardRow {
    pub user_id: i64,
    pub email: Option<String>,
    pub username: Option<String>,
    pub score: i64,
}

/// Highest scores first; ties keep registration order
pub async fn leaderboard(pool: &SqlitePool, limit: i64) -> Result<Vec<LeaderboardRow>, sqlx::Error> {
    sqlx::query_as::<_, LeaderboardRow>(
        "SELECT u.id AS user_id, u.email AS email, u.username AS username, COALESCE(s.score, 0) AS score \
         FROM users u LEFT JOIN user_scores s ON s.user_id = u.id \
         ORDER BY score DESC, u.id ASC LIMIT ?",
    )
    .bind(limit)
    .fetch_all(pool)
    .await
}

/// 1 + the number of users with a strictly higher score
pub async fn user_rank(pool: &SqlitePool, user_id: i64) -> Result<i64, sqlx::Error> {
    let score = get_score(pool, user_id).await?;
    let higher: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM users u LEFT JOIN user_scores s ON s.user_id = u.id \
         WHERE COALESCE(s.score, 0) > ?",
    )
    .bind(score)
    .fetch_one(pool)
    .await?;
    Ok(higher + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::auth::{users::provision_user, VerifiedIdentity};
    use crate::backend::server::config::load_database;
    use crate::backend::subscription::resolve_access;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 5, 1).unwrap_or_default()
    }

    async fn setup() -> (SqlitePool, i64, Vec<i64>) {
        let pool = load_database("sqlite::memory:").await.unwrap();
        let user = provision_user(&pool, &VerifiedIdentity { uid: "p1".into(), email: None })
            .await
            .unwrap();
        resolve_access(&pool, user.id, day()).await.unwrap();
        let mut ids = Vec::new();
        for category in ["history", "history", "science"] {
            let id: i64 = sqlx::query_scalar(
                "INSERT INTO quiz_questions (question_texts, options_texts, correct_answer_index, category) \
                 VALUES ('{}', '{}', 0, ?) RETURNING id",
            )
            .bind(category)
            .fetch_one(&pool)
            .await
            .unwrap();
            ids.push(id);
        }
        (pool, user.id, ids)
    }

    #[tokio::test]
    async fn test_streak_bonus_and_reset() {
        let (pool, user_id, ids) = setup().await;

        let first = apply_answer(&pool, user_id, ids[0], QuestionKind::Quiz, true, SubscriptionTier::Free, day())
            .await
            .unwrap();
        assert_eq!(first.score_awarded, 20);

        let second = apply_answer(&pool, user_id, ids[1], QuestionKind::Quiz, true, SubscriptionTier::Free, day())
            .await
            .unwrap();
        assert_eq!(second.score_awarded, 24);
        assert_eq!(second.new_score, 44);
        assert_eq!(get_streak(&pool, user_id).await.unwrap(), 2);

        let wrong = apply_answer(&pool, user_id, ids[2], QuestionKind::Quiz, false, SubscriptionTier::Free, day())
            .await
            .unwrap();
        assert_eq!(wrong.score_awarded, 0);
        assert_eq!(get_streak(&pool, user_id).await.unwrap(), 0);
        assert_eq!(daily_points(&pool, user_id, day()).await.unwrap(), 44);
    }

    #[tokio::test]
    async fn test_repeat_answer_changes_nothing() {
        let (pool, user_id, ids) = setup().await;
        apply_answer(&pool, user_id, ids[0], QuestionKind::Quiz, true, SubscriptionTier::Free, day())
            .await
            .unwrap();
        let repeat = apply_answer(&pool, user_id, ids[0], QuestionKind::Quiz, true, SubscriptionTier::Free, day())
            .await
            .unwrap();
        assert!(repeat.repeated);
        assert_eq!(repeat.score_awarded, 0);
        assert_eq!(repeat.new_score, 20);

        let answered: i64 = sqlx::query_scalar("SELECT questions_answered FROM daily_usage WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(answered, 1);
    }

    #[tokio::test]
    async fn test_category_analysis_order() {
        let (pool, user_id, ids) = setup().await;
        apply_answer(&pool, user_id, ids[0], QuestionKind::Quiz, true, SubscriptionTier::Free, day()).await.unwrap();
        apply_answer(&pool, user_id, ids[1], QuestionKind::Quiz, false, SubscriptionTier::Free, day()).await.unwrap();
        apply_answer(&pool, user_id, ids[2], QuestionKind::Quiz, true, SubscriptionTier::Free, day()).await.unwrap();

        let stats = category_analysis(&pool, user_id).await.unwrap();
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].category, "science");
        assert_eq!(stats[0].percent, 100.0);
        assert_eq!(stats[1].category, "history");
        assert_eq!((stats[1].correct, stats[1].total), (1, 2));
        assert_eq!(stats[1].percent, 50.0);
    }
}
