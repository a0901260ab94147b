//! Test application: real router over an in-memory database.

use std::sync::Arc;

use axum_test::TestServer;
use sqlx::SqlitePool;

use sparkup_backend::backend::auth::{issue_dev_token, DevTokenVerifier};
use sparkup_backend::backend::notifications::PushSender;
use sparkup_backend::backend::routes::create_router;
use sparkup_backend::backend::server::config::{load_database, AppConfig};
use sparkup_backend::backend::server::state::AppState;

use super::push::RecordingPushSender;

pub const DEV_SECRET: &str = "integration-test-secret";
pub const INTERNAL_SECRET: &str = "cron-secret";

pub struct TestApp {
    pub server: TestServer,
    pub pool: SqlitePool,
    pub push: Arc<RecordingPushSender>,
}

/// App with an open internal guard and a recording push sender
pub async fn test_app() -> TestApp {
    build(AppConfig::for_testing(DEV_SECRET), true).await
}

/// App whose internal endpoints require `INTERNAL_SECRET`
pub async fn test_app_with_internal_secret() -> TestApp {
    let mut config = AppConfig::for_testing(DEV_SECRET);
    config.internal_secret = Some(INTERNAL_SECRET.to_string());
    build(config, true).await
}

/// App without push delivery configured
pub async fn test_app_without_push() -> TestApp {
    build(AppConfig::for_testing(DEV_SECRET), false).await
}

async fn build(config: AppConfig, with_push: bool) -> TestApp {
    let pool = load_database(&config.database_url).await.expect("in-memory database");
    let push = Arc::new(RecordingPushSender::default());
    let sender: Option<Arc<dyn PushSender>> = with_push.then(|| push.clone() as Arc<dyn PushSender>);

    let state = AppState::new(
        pool.clone(),
        config,
        Arc::new(DevTokenVerifier::new(DEV_SECRET)),
        sender,
    );
    let server = TestServer::new(create_router(state)).expect("test server");

    TestApp { server, pool, push }
}

/// Bearer token for `uid` with email `<uid>@example.com`
pub fn token_for(uid: &str) -> String {
    issue_dev_token(DEV_SECRET, uid, Some(&format!("{}@example.com", uid))).expect("dev token")
}

/// Local user id of `uid`, provisioning through the API if needed
pub async fn user_id(app: &TestApp, uid: &str) -> i64 {
    app.server
        .get("/user/profile/")
        .authorization_bearer(token_for(uid))
        .await
        .assert_status_ok();
    sqlx::query_scalar("SELECT id FROM users WHERE firebase_uid = ?")
        .bind(uid)
        .fetch_one(&app.pool)
        .await
        .expect("provisioned user")
}
