//! API integration tests
//!
//! Drives the real router over an in-memory database, authenticating with
//! development tokens.

mod common;

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use common::*;

async fn answered_count(app: &TestApp, user_id: i64) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM user_answered_questions WHERE user_id = ?")
        .bind(user_id)
        .fetch_one(&app.pool)
        .await
        .unwrap()
}

#[tokio::test]
async fn test_welcome_and_topics_are_public() {
    let app = test_app().await;

    let body: Value = app.server.get("/").await.json();
    assert!(body["message"].as_str().is_some());

    let topics: Value = app.server.get("/topics/").await.json();
    assert_eq!(topics["science"], "Science");
    assert_eq!(topics.as_object().map(|t| t.len()), Some(21));
}

#[tokio::test]
async fn test_authentication_required() {
    let app = test_app().await;

    let response = app.server.get("/user/profile/").await;
    assert_error(&response, StatusCode::UNAUTHORIZED, "Missing bearer token");

    let response = app.server.get("/user/profile/").authorization_bearer("not-a-jwt").await;
    assert_error(&response, StatusCode::UNAUTHORIZED, "Invalid authentication token");
}

#[tokio::test]
async fn test_profile_provisions_free_user() {
    let app = test_app().await;

    let response = app.server.get("/user/profile/").authorization_bearer(token_for("alice")).await;
    response.assert_status_ok();
    let profile: Value = response.json();

    assert_eq!(profile["firebase_uid"], "alice");
    assert_eq!(profile["email"], "alice@example.com");
    assert_eq!(profile["score"], 0);
    assert_eq!(profile["rank_name"], "Iron");
    assert_eq!(profile["subscription_level"], "free");
    assert_eq!(profile["language_code"], "en");
    assert_eq!(profile["daily_quiz_limit"], 3);
    assert_eq!(profile["remaining_quizzes"], 3);
    assert_eq!(profile["remaining_energy"], 3);
    assert_eq!(profile["session_seconds"], 60);
    assert_eq!(profile["daily_points"], 0);

    // A second request reuses the same local user
    app.server.get("/user/profile/").authorization_bearer(token_for("alice")).await.assert_status_ok();
    let users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users").fetch_one(&app.pool).await.unwrap();
    assert_eq!(users, 1);
}

#[tokio::test]
async fn test_quiz_session_and_scoring() {
    let app = test_app().await;
    seed_quizzes(&app.pool, "science", 3).await;
    let token = token_for("bob");

    let response = app
        .server
        .get("/quiz/")
        .add_query_param("limit", 2)
        .add_query_param("lang", "tr")
        .authorization_bearer(&token)
        .await;
    response.assert_status_ok();
    let items: Vec<Value> = response.json();
    assert_eq!(items.len(), 2);
    assert!(items[0]["question_text"].as_str().unwrap().starts_with("Soru"));
    assert_eq!(items[0]["options"][1], "Mavi");
    assert_eq!(items[0]["session_seconds"], 60);

    let question_id = items[0]["id"].as_i64().unwrap();
    let answer: Value = app
        .server
        .post("/quiz/answer/")
        .authorization_bearer(&token)
        .json(&json!({"question_id": question_id, "answer_index": 1}))
        .await
        .json();
    assert_eq!(answer["correct"], true);
    assert_eq!(answer["correct_index"], 1);
    assert_eq!(answer["score_awarded"], 20);
    assert_eq!(answer["new_score"], 20);

    // Repeats award nothing
    let repeat: Value = app
        .server
        .post("/quiz/answer/")
        .authorization_bearer(&token)
        .json(&json!({"question_id": question_id, "answer_index": 1}))
        .await
        .json();
    assert_eq!(repeat["score_awarded"], 0);
    assert_eq!(repeat["new_score"], 20);

    // Streak of one adds two points before doubling
    let second_id = items[1]["id"].as_i64().unwrap();
    let second: Value = app
        .server
        .post("/quiz/answer/")
        .authorization_bearer(&token)
        .json(&json!({"question_id": second_id, "answer_index": 1}))
        .await
        .json();
    assert_eq!(second["score_awarded"], 24);
    assert_eq!(second["new_score"], 44);

    let profile: Value = app.server.get("/user/profile/").authorization_bearer(&token).await.json();
    assert_eq!(profile["score"], 44);
    assert_eq!(profile["current_streak"], 2);
    assert_eq!(profile["daily_quiz_used"], 2);
    assert_eq!(profile["remaining_quizzes"], 1);
    assert_eq!(profile["remaining_energy"], 2);
    assert_eq!(profile["daily_points"], 44);
}

#[tokio::test]
async fn test_wrong_answer_resets_streak() {
    let app = test_app().await;
    let ids = seed_quizzes(&app.pool, "history", 2).await;
    let token = token_for("carol");

    let first: Value = app
        .server
        .post("/quiz/answer/")
        .authorization_bearer(&token)
        .json(&json!({"question_id": ids[0], "answer_index": 0}))
        .await
        .json();
    assert_eq!(first["correct"], false);
    assert_eq!(first["score_awarded"], 0);

    let profile: Value = app.server.get("/user/profile/").authorization_bearer(&token).await.json();
    assert_eq!(profile["current_streak"], 0);

    let response = app
        .server
        .post("/quiz/answer/")
        .authorization_bearer(&token)
        .json(&json!({"question_id": 9999, "answer_index": 0}))
        .await;
    assert_error(&response, StatusCode::NOT_FOUND, "Question not found");
}

#[tokio::test]
async fn test_quiz_daily_cap() {
    let app = test_app().await;
    let ids = seed_quizzes(&app.pool, "art", 5).await;
    let token = token_for("dave");

    for id in &ids[..3] {
        app.server
            .post("/quiz/answer/")
            .authorization_bearer(&token)
            .json(&json!({"question_id": id, "answer_index": 1}))
            .await
            .assert_status_ok();
    }

    let response = app.server.get("/quiz/").authorization_bearer(&token).await;
    assert_error(&response, StatusCode::FORBIDDEN, "Daily quiz limit reached (3).");

    let response = app
        .server
        .get("/quiz/")
        .add_query_param("lang", "tr")
        .authorization_bearer(&token)
        .await;
    assert_error(&response, StatusCode::FORBIDDEN, "Günlük quiz limiti doldu (3).");
}

#[tokio::test]
async fn test_energy_is_spent_per_session_not_preview() {
    let app = test_app().await;
    seed_quizzes(&app.pool, "music", 3).await;
    let token = token_for("erin");

    app.server
        .get("/quiz/")
        .add_query_param("limit", 1)
        .add_query_param("preview", true)
        .authorization_bearer(&token)
        .await
        .assert_status_ok();

    for _ in 0..3 {
        app.server
            .get("/quiz/")
            .add_query_param("limit", 1)
            .authorization_bearer(&token)
            .await
            .assert_status_ok();
    }

    let response = app
        .server
        .get("/quiz/")
        .add_query_param("limit", 1)
        .authorization_bearer(&token)
        .await;
    assert_error(&response, StatusCode::FORBIDDEN, "Insufficient energy");
}

#[tokio::test]
async fn test_quiz_not_enough_questions() {
    let app = test_app().await;
    seed_quizzes(&app.pool, "science", 1).await;
    let token = token_for("frank");

    let response = app
        .server
        .get("/quiz/")
        .add_query_param("limit", 2)
        .authorization_bearer(&token)
        .await;
    assert_error(&response, StatusCode::NOT_FOUND, "Not enough new questions.");

    let response = app
        .server
        .get("/quiz/")
        .add_query_param("limit", 2)
        .add_query_param("preview", true)
        .authorization_bearer(&token)
        .await;
    assert_error(&response, StatusCode::NOT_FOUND, "Not enough questions for preview.");
}

#[tokio::test]
async fn test_quiz_cycles_after_pool_exhausted() {
    let app = test_app().await;
    let ids = seed_quizzes(&app.pool, "science", 2).await;
    let token = token_for("gina");
    let gina = user_id(&app, "gina").await;

    for id in &ids {
        app.server
            .post("/quiz/answer/")
            .authorization_bearer(&token)
            .json(&json!({"question_id": id, "answer_index": 1}))
            .await
            .assert_status_ok();
    }

    assert_eq!(answered_count(&app, gina).await, 2);

    // Preview draws from the full pool but keeps the history
    let items: Vec<Value> = app
        .server
        .get("/quiz/")
        .add_query_param("limit", 1)
        .add_query_param("preview", true)
        .authorization_bearer(&token)
        .await
        .json();
    assert_eq!(items.len(), 1);
    assert_eq!(answered_count(&app, gina).await, 2);

    let items: Vec<Value> = app
        .server
        .get("/quiz/")
        .add_query_param("limit", 1)
        .authorization_bearer(&token)
        .await
        .json();
    assert_eq!(items.len(), 1);
    assert!(ids.contains(&items[0]["id"].as_i64().unwrap()));
    assert_eq!(answered_count(&app, gina).await, 0);
}

#[tokio::test]
async fn test_quiz_respects_topic_preferences() {
    let app = test_app().await;
    seed_quizzes(&app.pool, "science", 2).await;
    seed_quizzes(&app.pool, "sports", 2).await;
    let token = token_for("gina");

    let topics: Vec<String> = app
        .server
        .put("/user/topics/")
        .authorization_bearer(&token)
        .json(&json!(["sports", "sports", "unknown_topic"]))
        .await
        .json();
    assert_eq!(topics, vec!["sports"]);

    let items: Vec<Value> = app
        .server
        .get("/quiz/")
        .add_query_param("limit", 2)
        .authorization_bearer(&token)
        .await
        .json();
    assert!(items.iter().all(|item| item["category"] == "sports"));

    let stored: Vec<String> = app.server.get("/user/topics/").authorization_bearer(&token).await.json();
    assert_eq!(stored, vec!["sports"]);
}

#[tokio::test]
async fn test_localize_quiz() {
    let app = test_app().await;
    let ids = seed_quizzes(&app.pool, "science", 2).await;

    let response = app
        .server
        .get("/quiz/localize/")
        .add_query_param("ids", format!("{},{},9999", ids[0], ids[1]))
        .add_query_param("lang", "tr")
        .await;
    response.assert_status_ok();
    let items: Vec<Value> = response.json();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["options"][0], "Kırmızı");

    let response = app.server.get("/quiz/localize/").add_query_param("ids", "a,b").await;
    assert_error(&response, StatusCode::BAD_REQUEST, "Invalid ids parameter");
}

#[tokio::test]
async fn test_true_false_flow() {
    let app = test_app().await;
    let token = token_for("hank");

    let response = app.server.get("/truefalse/").authorization_bearer(&token).await;
    assert_error(&response, StatusCode::NOT_FOUND, "No true/false questions available.");

    let id = seed_true_false(&app.pool, true).await;
    let items: Vec<Value> = app.server.get("/truefalse/").authorization_bearer(&token).await.json();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["correct_answer"], true);

    let answer: Value = app
        .server
        .post("/truefalse/answer/")
        .authorization_bearer(&token)
        .json(&json!({"question_id": id, "answer": true}))
        .await
        .json();
    assert_eq!(answer["correct"], true);
    assert_eq!(answer["score_awarded"], 10);
    assert_eq!(answer["new_score"], 10);

    let status: Value = app.server.get("/debug/content-status/").await.json();
    assert_eq!(status["loaded"], true);
    assert_eq!(status["count"], 1);
}

#[tokio::test]
async fn test_random_info_cycles() {
    let app = test_app().await;
    let token = token_for("iris");

    let response = app.server.get("/info/random/").authorization_bearer(&token).await;
    assert_error(&response, StatusCode::NOT_FOUND, "No infos available.");

    seed_info(&app.pool, "nature_animals", "Octopuses have three hearts.").await;
    seed_info(&app.pool, "space_astronomy", "A day on Venus is longer than its year.").await;

    let first: Value = app.server.get("/info/random/").authorization_bearer(&token).await.json();
    let second: Value = app.server.get("/info/random/").authorization_bearer(&token).await.json();
    assert_ne!(first["id"], second["id"]);

    // Both seen: the history is cleared and a fact is served again
    app.server.get("/info/random/").authorization_bearer(&token).await.assert_status_ok();

    let response = app
        .server
        .get("/info/random/")
        .add_query_param("category", "history")
        .authorization_bearer(&token)
        .await;
    assert_error(&response, StatusCode::NOT_FOUND, "No infos match the category.");

    let filtered: Value = app
        .server
        .get("/info/random/")
        .add_query_param("category", "space_astronomy")
        .authorization_bearer(&token)
        .await
        .json();
    assert_eq!(filtered["category"], "space_astronomy");
    assert_eq!(filtered["source"], "Encyclopedia");
}

#[tokio::test]
async fn test_challenge_limit_and_localize() {
    let app = test_app().await;
    let token = token_for("jack");
    let mut ids = Vec::new();
    for n in 0..4 {
        ids.push(seed_challenge(&app.pool, &format!("Challenge {}", n)).await);
    }

    for _ in 0..3 {
        app.server.get("/challenges/random/").authorization_bearer(&token).await.assert_status_ok();
    }
    let response = app.server.get("/challenges/random/").authorization_bearer(&token).await;
    assert_error(&response, StatusCode::FORBIDDEN, "Daily challenge limit reached (3).");

    let localized: Value = app
        .server
        .get(&format!("/challenges/{}/localize/", ids[0]))
        .add_query_param("lang", "tr")
        .await
        .json();
    assert_eq!(localized["challenge_text"], "Challenge 0 (tr)");

    let response = app.server.get("/challenges/9999/localize/").await;
    assert_error(&response, StatusCode::NOT_FOUND, "Challenge not found");
}

#[tokio::test]
async fn test_profile_settings() {
    let app = test_app().await;
    let token = token_for("kate");

    app.server
        .put("/user/language/")
        .add_query_param("language_code", "de")
        .authorization_bearer(&token)
        .await
        .assert_status_ok();
    let response = app
        .server
        .put("/user/language/")
        .add_query_param("language_code", "xx")
        .authorization_bearer(&token)
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    app.server
        .put("/user/notifications/")
        .add_query_param("enabled", false)
        .authorization_bearer(&token)
        .await
        .assert_status_ok();

    app.server
        .put("/user/username/")
        .authorization_bearer(&token)
        .json(&json!({"username": "quiz_master"}))
        .await
        .assert_status_ok();
    app.server
        .put("/user/username/")
        .authorization_bearer(&token)
        .json(&json!({"username": "no spaces!"}))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let profile: Value = app.server.get("/user/profile/").authorization_bearer(&token).await.json();
    assert_eq!(profile["language_code"], "de");
    assert_eq!(profile["notifications_enabled"], false);
    assert_eq!(profile["username"], "quiz_master");
}

#[tokio::test]
async fn test_leaderboard_rank_and_analysis() {
    let app = test_app().await;
    let ids = seed_quizzes(&app.pool, "science", 2).await;
    let history = seed_quizzes(&app.pool, "history", 1).await;
    let leader = token_for("leader");
    let follower = token_for("follower");

    for id in &ids {
        app.server
            .post("/quiz/answer/")
            .authorization_bearer(&leader)
            .json(&json!({"question_id": id, "answer_index": 1}))
            .await
            .assert_status_ok();
    }
    app.server
        .post("/quiz/answer/")
        .authorization_bearer(&leader)
        .json(&json!({"question_id": history[0], "answer_index": 3}))
        .await
        .assert_status_ok();
    app.server
        .post("/quiz/answer/")
        .authorization_bearer(&follower)
        .json(&json!({"question_id": ids[0], "answer_index": 1}))
        .await
        .assert_status_ok();

    let board: Vec<Value> = app.server.get("/leaderboard/").await.json();
    assert_eq!(board.len(), 2);
    assert_eq!(board[0]["rank"], 1);
    assert_eq!(board[0]["username"], "leader");
    assert_eq!(board[0]["score"], 44);
    assert_eq!(board[1]["score"], 20);

    let rank: Value = app.server.get("/user/rank/").authorization_bearer(&follower).await.json();
    assert_eq!(rank["rank"], 2);

    let analysis: Vec<Value> = app.server.get("/user/analysis/").authorization_bearer(&leader).await.json();
    assert_eq!(analysis.len(), 2);
    assert_eq!(analysis[0]["category"], "science");
    assert_eq!(analysis[0]["correct"], 2);
    assert_eq!(analysis[1]["category"], "history");
    assert_eq!(analysis[1]["total"], 1);
}

#[tokio::test]
async fn test_delete_account() {
    let app = test_app().await;
    let ids = seed_quizzes(&app.pool, "science", 1).await;
    let token = token_for("leaving");

    app.server
        .post("/quiz/answer/")
        .authorization_bearer(&token)
        .json(&json!({"question_id": ids[0], "answer_index": 1}))
        .await
        .assert_status_ok();

    app.server
        .delete("/user/me/")
        .authorization_bearer(&token)
        .await
        .assert_status(StatusCode::NO_CONTENT);

    let scores: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM user_scores").fetch_one(&app.pool).await.unwrap();
    assert_eq!(scores, 0);

    // Signing in again starts from scratch
    let profile: Value = app.server.get("/user/profile/").authorization_bearer(&token).await.json();
    assert_eq!(profile["score"], 0);
}

#[tokio::test]
async fn test_subscription_grant_requires_secret() {
    let app = test_app_with_internal_secret().await;
    let token = token_for("payer");
    user_id(&app, "payer").await;

    let grant = json!({"firebase_uid": "payer", "level": "ultra", "expires_at": "2099-01-01"});

    let response = app.server.post("/subscription/grant").json(&grant).await;
    assert_error(&response, StatusCode::FORBIDDEN, "Forbidden");

    app.server
        .post("/subscription/grant")
        .add_query_param("internal_secret", INTERNAL_SECRET)
        .json(&grant)
        .await
        .assert_status_ok();

    let subscription: Value = app.server.get("/subscription/").authorization_bearer(&token).await.json();
    assert_eq!(subscription["level"], "ultra");
    assert_eq!(subscription["expires_at"], "2099-01-01");
    assert_eq!(subscription["limits"]["session_seconds"], 90);

    let response = app
        .server
        .post("/subscription/grant")
        .add_query_param("internal_secret", INTERNAL_SECRET)
        .json(&json!({"firebase_uid": "payer", "level": "platinum"}))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = app
        .server
        .post("/subscription/grant")
        .add_query_param("internal_secret", INTERNAL_SECRET)
        .json(&json!({"firebase_uid": "nobody", "level": "pro"}))
        .await;
    assert_error(&response, StatusCode::NOT_FOUND, "User not found");
}

#[tokio::test]
async fn test_expired_subscription_downgrades() {
    let app = test_app().await;
    let token = token_for("lapsed");
    user_id(&app, "lapsed").await;

    app.server
        .post("/subscription/grant")
        .json(&json!({"firebase_uid": "lapsed", "level": "pro", "expires_at": "2020-01-01"}))
        .await
        .assert_status_ok();

    let subscription: Value = app.server.get("/subscription/").authorization_bearer(&token).await.json();
    assert_eq!(subscription["level"], "free");
    assert_eq!(subscription["expires_at"], Value::Null);
}
