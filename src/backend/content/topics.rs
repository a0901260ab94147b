//! Topic catalogue and per-user topic preferences.

use std::collections::BTreeSet;

use sqlx::SqlitePool;

/// Topic key and English display name, in presentation order
pub const TOPICS: &[(&str, &str)] = &[
    ("history", "History"),
    ("science", "Science"),
    ("art", "Art"),
    ("sports", "Sports"),
    ("technology", "Technology"),
    ("cinema_tv", "Cinema & TV"),
    ("music", "Music"),
    ("nature_animals", "Nature & Animals"),
    ("gastronomy", "Gastronomy & Cuisine"),
    ("geography_travel", "Geography & Travel"),
    ("mythology", "Mythology"),
    ("philosophy", "Philosophy"),
    ("literature", "Literature"),
    ("space_astronomy", "Space & Astronomy"),
    ("health_fitness", "Health & Fitness"),
    ("economics_finance", "Economics & Finance"),
    ("automotive", "Automotive"),
    ("architecture", "Architecture"),
    ("video_games", "Video Games"),
    ("general_culture", "General Culture"),
    ("fun_facts", "Fun Facts"),
];

pub fn is_known_topic(key: &str) -> bool {
    TOPICS.iter().any(|(k, _)| *k == key)
}

/// Display name of a topic, falling back to the key itself
pub fn topic_display_name(key: &str) -> &str {
    TOPICS
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, name)| *name)
        .unwrap_or(key)
}

/// The user's selected topic keys, sorted
pub async fn get_topic_preferences(pool: &SqlitePool, user_id: i64) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar("SELECT topic_key FROM user_topic_preferences WHERE user_id = ? ORDER BY topic_key")
        .bind(user_id)
        .fetch_all(pool)
        .await
}

/// Replace the user's topic preferences
///
/// Unknown keys are dropped and duplicates collapsed.
///
/// # Returns
/// The stored keys, sorted
pub async fn set_topic_preferences(
    pool: &SqlitePool,
    user_id: i64,
    topics: &[String],
) -> Result<Vec<String>, sqlx::Error> {
    let keys: BTreeSet<&str> = topics
        .iter()
        .map(|t| t.trim())
        .filter(|t| is_known_topic(t))
        .collect();

    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM user_topic_preferences WHERE user_id = ?")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;
    for key in &keys {
        sqlx::query("INSERT INTO user_topic_preferences (user_id, topic_key) VALUES (?, ?)")
            .bind(user_id)
            .bind(*key)
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await?;

    Ok(keys.into_iter().map(str::to_string).collect())
}
