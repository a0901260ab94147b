/**
 * Answer Handlers
 *
 * - `POST /quiz/answer/` - multiple choice, double points
 * - `POST /truefalse/answer/` - true/false, single points
 */

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::backend::content::db::{get_quiz_question, get_true_false};
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::middleware::CurrentUser;
use crate::backend::progress::db::apply_answer;
use crate::backend::progress::scoring::QuestionKind;
use crate::backend::subscription::{resolve_access, today};

#[derive(Debug, Deserialize)]
pub struct QuizAnswerRequest {
    pub question_id: i64,
    pub answer_index: i64,
}

#[derive(Debug, Serialize)]
pub struct QuizAnswerResponse {
    pub correct: bool,
    pub correct_index: i64,
    pub score_awarded: i64,
    pub new_score: i64,
}

/// POST /quiz/answer/
pub async fn answer_quiz(
    State(pool): State<SqlitePool>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<QuizAnswerRequest>,
) -> BackendResult<Json<QuizAnswerResponse>> {
    let question = get_quiz_question(&pool, request.question_id)
        .await?
        .ok_or_else(|| BackendError::not_found("Question not found"))?;

    let day = today();
    let access = resolve_access(&pool, user.id, day).await?;
    let correct = request.answer_index == question.correct_answer_index;

    let outcome = apply_answer(&pool, user.id, question.id, QuestionKind::Quiz, correct, access.tier, day).await?;

    Ok(Json(QuizAnswerResponse {
        correct,
        correct_index: question.correct_answer_index,
        score_awarded: outcome.score_awarded,
        new_score: outcome.new_score,
    }))
}

#[derive(Debug, Deserialize)]
pub struct TrueFalseAnswerRequest {
    pub question_id: i64,
    pub answer: bool,
}

#[derive(Debug, Serialize)]
pub struct TrueFalseAnswerResponse {
    pub correct: bool,
    pub correct_answer: bool,
    pub score_awarded: i64,
    pub new_score: i64,
}

/// POST /truefalse/answer/
pub async fn answer_true_false(
    State(pool): State<SqlitePool>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<TrueFalseAnswerRequest>,
) -> BackendResult<Json<TrueFalseAnswerResponse>> {
    let question = get_true_false(&pool, request.question_id)
        .await?
        .ok_or_else(|| BackendError::not_found("Question not found"))?;

    let day = today();
    let access = resolve_access(&pool, user.id, day).await?;
    let correct = request.answer == question.correct_answer;

    let outcome =
        apply_answer(&pool, user.id, question.id, QuestionKind::TrueFalse, correct, access.tier, day).await?;

    Ok(Json(TrueFalseAnswerResponse {
        correct,
        correct_answer: question.correct_answer,
        score_awarded: outcome.score_awarded,
        new_score: outcome.new_score,
    }))
}
