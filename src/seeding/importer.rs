/**
 * Curated Content Import
 *
 * Loads the hand-written content files from a data directory:
 *
 * | File                     | Table                  |
 * |--------------------------|------------------------|
 * | `manual_info.json`       | `daily_infos`          |
 * | `manual_quiz.json`       | `quiz_questions`       |
 * | `manual_truefalse.json`  | `true_false_questions` |
 * | `manual_challenges.json` | `challenges`           |
 *
 * Each file is a JSON array of records. A table that already has rows is
 * left alone, so the import can run on every server start. Missing files are
 * skipped. Quiz records whose English options are not four entries long, or
 * whose answer index is out of range, are skipped with a warning.
 */

use std::fmt;
use std::path::Path;

use serde::de::DeserializeOwned;
use sqlx::SqlitePool;

use crate::backend::content::db::{count_content, ContentKind};
use crate::seeding::error::SeedError;
use crate::seeding::store::{
    insert_challenge, insert_info, insert_quiz, insert_true_false, ChallengeRecord, InfoRecord, QuizRecord,
    TrueFalseRecord,
};

pub const INFO_FILE: &str = "manual_info.json";
pub const QUIZ_FILE: &str = "manual_quiz.json";
pub const TRUE_FALSE_FILE: &str = "manual_truefalse.json";
pub const CHALLENGE_FILE: &str = "manual_challenges.json";

/// Number of quiz options every question must have
pub const QUIZ_OPTION_COUNT: usize = 4;

/// Rows inserted per table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub infos: usize,
    pub quiz_questions: usize,
    pub true_false: usize,
    pub challenges: usize,
}

impl fmt::Display for ImportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} infos, {} quiz questions, {} true/false questions, {} challenges",
            self.infos, self.quiz_questions, self.true_false, self.challenges
        )
    }
}

/// Check that a quiz record has four English options and an in-range answer
pub fn validate_quiz(record: &QuizRecord) -> Result<(), SeedError> {
    let options = record
        .options_texts
        .get("en")
        .ok_or_else(|| SeedError::InvalidContent("quiz question has no English options".into()))?;
    if options.len() != QUIZ_OPTION_COUNT {
        return Err(SeedError::InvalidContent(format!(
            "expected {} options, found {}",
            QUIZ_OPTION_COUNT,
            options.len()
        )));
    }
    if record.correct_answer_index < 0 || record.correct_answer_index as usize >= options.len() {
        return Err(SeedError::InvalidContent(format!(
            "answer index {} out of range",
            record.correct_answer_index
        )));
    }
    if record.question_texts.get("en").map_or(true, |q| q.trim().is_empty()) {
        return Err(SeedError::InvalidContent("quiz question has no English text".into()));
    }
    Ok(())
}

/// Read a JSON array of records, or `None` if the file does not exist
pub fn read_records<T: DeserializeOwned>(path: &Path) -> Result<Option<Vec<T>>, SeedError> {
    if !path.exists() {
        tracing::debug!("{} not found, skipping", path.display());
        return Ok(None);
    }
    let raw = std::fs::read_to_string(path).map_err(|e| SeedError::io(path, e))?;
    Ok(Some(serde_json::from_str(&raw)?))
}

/// Records to import into `kind`'s table, or `None` when the table is
/// already populated or the file is missing or empty
async fn pending_records<T: DeserializeOwned>(
    pool: &SqlitePool,
    kind: ContentKind,
    path: &Path,
) -> Result<Option<Vec<T>>, SeedError> {
    if count_content(pool, kind).await? > 0 {
        tracing::debug!("{} already populated, skipping {}", kind.table(), path.display());
        return Ok(None);
    }
    Ok(read_records(path)?.filter(|records| !records.is_empty()))
}

/// Import every curated file found in `dir` into its empty table
///
/// # Errors
///
/// Fails on unreadable or malformed files and on database errors. Tables
/// imported before the failure keep their rows.
pub async fn import_directory(pool: &SqlitePool, dir: &Path) -> Result<ImportSummary, SeedError> {
    let mut summary = ImportSummary::default();

    if let Some(records) = pending_records::<InfoRecord>(pool, ContentKind::Info, &dir.join(INFO_FILE)).await? {
        for record in &records {
            insert_info(pool, record).await?;
        }
        summary.infos = records.len();
    }

    if let Some(records) = pending_records::<QuizRecord>(pool, ContentKind::Quiz, &dir.join(QUIZ_FILE)).await? {
        for record in &records {
            match validate_quiz(record) {
                Ok(()) => {
                    insert_quiz(pool, record).await?;
                    summary.quiz_questions += 1;
                }
                Err(e) => tracing::warn!("Skipping quiz question: {}", e),
            }
        }
    }

    if let Some(records) =
        pending_records::<TrueFalseRecord>(pool, ContentKind::TrueFalse, &dir.join(TRUE_FALSE_FILE)).await?
    {
        for record in &records {
            insert_true_false(pool, record).await?;
        }
        summary.true_false = records.len();
    }

    if let Some(records) =
        pending_records::<ChallengeRecord>(pool, ContentKind::Challenge, &dir.join(CHALLENGE_FILE)).await?
    {
        for record in &records {
            insert_challenge(pool, record).await?;
        }
        summary.challenges = records.len();
    }

    Ok(summary)
}
