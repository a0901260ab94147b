//! Content fixtures inserted through the seeding store.

use std::collections::BTreeMap;

use sqlx::SqlitePool;

use sparkup_backend::seeding::store::{
    insert_challenge, insert_info, insert_quiz, insert_true_false, ChallengeRecord, InfoRecord, QuizRecord,
    TrueFalseRecord,
};

fn texts(en: &str, tr: &str) -> BTreeMap<String, String> {
    BTreeMap::from([("en".to_string(), en.to_string()), ("tr".to_string(), tr.to_string())])
}

/// Insert a quiz question whose correct answer is index 1
pub async fn seed_quiz(pool: &SqlitePool, category: &str, n: usize) -> i64 {
    let options = BTreeMap::from([
        (
            "en".to_string(),
            vec!["Red".to_string(), "Blue".to_string(), "Green".to_string(), "Black".to_string()],
        ),
        (
            "tr".to_string(),
            vec!["Kırmızı".to_string(), "Mavi".to_string(), "Yeşil".to_string(), "Siyah".to_string()],
        ),
    ]);
    insert_quiz(
        pool,
        &QuizRecord {
            question_texts: texts(&format!("Question {}?", n), &format!("Soru {}?", n)),
            options_texts: options,
            correct_answer_index: 1,
            category: category.to_string(),
        },
    )
    .await
    .expect("insert quiz")
}

pub async fn seed_quizzes(pool: &SqlitePool, category: &str, count: usize) -> Vec<i64> {
    let mut ids = Vec::with_capacity(count);
    for n in 0..count {
        ids.push(seed_quiz(pool, category, n).await);
    }
    ids
}

pub async fn seed_true_false(pool: &SqlitePool, answer: bool) -> i64 {
    insert_true_false(
        pool,
        &TrueFalseRecord {
            question_texts: texts("The sun is a star.", "Güneş bir yıldızdır."),
            correct_answer: answer,
            category: "science".to_string(),
        },
    )
    .await
    .expect("insert true/false")
}

pub async fn seed_info(pool: &SqlitePool, category: &str, en: &str) -> i64 {
    insert_info(
        pool,
        &InfoRecord {
            info_texts: texts(en, &format!("{} (tr)", en)),
            category: category.to_string(),
            source: Some("Encyclopedia".to_string()),
        },
    )
    .await
    .expect("insert info")
}

pub async fn seed_challenge(pool: &SqlitePool, en: &str) -> i64 {
    insert_challenge(
        pool,
        &ChallengeRecord {
            challenge_texts: texts(en, &format!("{} (tr)", en)),
            category: "fun".to_string(),
        },
    )
    .await
    .expect("insert challenge")
}
