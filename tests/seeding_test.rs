//! Content import and translation tests

use std::collections::VecDeque;
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use sparkup_backend::backend::server::config::load_database;
use sparkup_backend::seeding::{
    import_directory, translate_file, ContentModel, ImportSummary, SeedError, TranslateReport,
};

/// Model that answers from a fixed script, then fails
struct ScriptedModel {
    answers: Mutex<VecDeque<String>>,
}

impl ScriptedModel {
    fn new(answers: &[&str]) -> Self {
        Self {
            answers: Mutex::new(answers.iter().map(|a| a.to_string()).collect()),
        }
    }
}

#[async_trait]
impl ContentModel for ScriptedModel {
    async fn complete(&self, _prompt: &str) -> Result<String, SeedError> {
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| SeedError::Model("quota exceeded".into()))
    }
}

fn write_json(dir: &Path, name: &str, value: Value) {
    std::fs::write(dir.join(name), value.to_string()).unwrap();
}

fn curated_files(dir: &Path) {
    write_json(
        dir,
        "manual_info.json",
        json!([
            {"info_texts": {"en": "Bananas are berries.", "tr": "Muz bir meyvedir."}, "category": "science", "source": "Botany 101"},
            {"info_texts": {"en": "Venice has no cars."}, "category": "geography"}
        ]),
    );
    write_json(
        dir,
        "manual_quiz.json",
        json!([
            {"question_texts": {"en": "Largest planet?"}, "options_texts": {"en": ["Mars", "Jupiter", "Venus", "Earth"]},
             "correct_answer_index": 1, "category": "space"},
            {"question_texts": {"en": "Smallest planet?"}, "options_texts": {"en": ["Mercury", "Jupiter", "Venus", "Earth"]},
             "correct_answer_index": 0, "category": "space"},
            {"question_texts": {"en": "Broken?"}, "options_texts": {"en": ["Only", "Three", "Options"]},
             "correct_answer_index": 0, "category": "space"}
        ]),
    );
    write_json(
        dir,
        "manual_truefalse.json",
        json!([
            {"question_texts": {"en": "The Sun is a star."}, "correct_answer": true, "category": "space"}
        ]),
    );
}

#[tokio::test]
async fn test_import_directory_fills_empty_tables_once() {
    let dir = tempfile::tempdir().unwrap();
    curated_files(dir.path());
    let pool = load_database("sqlite::memory:").await.unwrap();

    let summary = import_directory(&pool, dir.path()).await.unwrap();
    assert_eq!(
        summary,
        ImportSummary {
            infos: 2,
            quiz_questions: 2,
            true_false: 1,
            challenges: 0,
        }
    );

    let source: Option<String> =
        sqlx::query_scalar("SELECT source FROM daily_infos WHERE json_extract(info_texts, '$.en') = 'Bananas are berries.'")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(source.as_deref(), Some("Botany 101"));

    // Populated tables are left alone; the new challenge file still loads
    write_json(
        dir.path(),
        "manual_challenges.json",
        json!([{"challenge_texts": {"en": "Drink a glass of water."}}]),
    );
    let summary = import_directory(&pool, dir.path()).await.unwrap();
    assert_eq!(
        summary,
        ImportSummary {
            challenges: 1,
            ..ImportSummary::default()
        }
    );

    let quizzes: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM quiz_questions")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(quizzes, 2);
}

#[tokio::test]
async fn test_import_rejects_malformed_file() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("manual_info.json"), "[{\"info_texts\": ").unwrap();
    let pool = load_database("sqlite::memory:").await.unwrap();

    let result = import_directory(&pool, dir.path()).await;
    assert!(matches!(result, Err(SeedError::Json(_))));
}

#[tokio::test]
async fn test_import_of_empty_directory() {
    let dir = tempfile::tempdir().unwrap();
    let pool = load_database("sqlite::memory:").await.unwrap();
    assert_eq!(import_directory(&pool, dir.path()).await.unwrap(), ImportSummary::default());
}

#[tokio::test]
async fn test_translate_file_fills_texts_and_lists() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("quiz.json");
    let output = dir.path().join("quiz_fr.json");
    write_json(
        dir.path(),
        "quiz.json",
        json!([{
            "question_texts": {"en": "Largest planet?"},
            "options_texts": {"en": ["Mars", "Jupiter"]},
            "correct_answer_index": 1
        }]),
    );

    // Pointers are visited in key order: options before question
    let model = ScriptedModel::new(&["Mars", "\"Jupiter\"", "```\nPlus grande planète ?\n```"]);
    let report = translate_file(&model, &input, &output, "fr").await.unwrap();
    assert_eq!(report, TranslateReport { texts: 1, lists: 1 });

    let written: Value = serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(written[0]["question_texts"]["fr"], "Plus grande planète ?");
    assert_eq!(written[0]["options_texts"]["fr"], json!(["Mars", "Jupiter"]));
    assert_eq!(written[0]["correct_answer_index"], 1);
}

#[tokio::test]
async fn test_translate_file_keeps_partial_progress() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("infos.json");
    let output = dir.path().join("infos_de.json");
    write_json(
        dir.path(),
        "infos.json",
        json!([
            {"info_texts": {"en": "Honey never spoils."}},
            {"info_texts": {"en": "Sharks predate trees."}}
        ]),
    );

    let model = ScriptedModel::new(&["Honig verdirbt nie."]);
    let result = translate_file(&model, &input, &output, "de").await;
    assert!(matches!(result, Err(SeedError::Model(_))));

    let written: Value = serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(written[0]["info_texts"]["de"], "Honig verdirbt nie.");
    assert!(written[1]["info_texts"].get("de").is_none());
}

#[tokio::test]
async fn test_translate_file_rejects_target_language() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.json");
    let output = dir.path().join("out.json");
    write_json(dir.path(), "in.json", json!([]));
    let model = ScriptedModel::new(&[]);

    for lang in ["en", "xx"] {
        let result = translate_file(&model, &input, &output, lang).await;
        assert!(matches!(result, Err(SeedError::InvalidContent(_))));
    }
    assert!(!output.exists());
}
