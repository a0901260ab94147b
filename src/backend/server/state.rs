/**
 * Application State Management
 *
 * This module defines the application state structure and implements
 * the necessary `FromRef` traits for Axum state extraction.
 *
 * # Architecture
 *
 * The `AppState` struct serves as the central state container for the
 * application, holding:
 * - The SQLite connection pool
 * - The loaded configuration
 * - The bearer-token verifier
 * - The push sender, when push delivery is configured
 *
 * # Thread Safety
 *
 * Every field is cheap to clone: the pool is reference counted internally and
 * the remaining services sit behind `Arc`.
 *
 * # Example
 *
 * ```rust,no_run
 * use sparkup_backend::backend::server::state::AppState;
 * use axum::extract::State;
 *
 * async fn handler(State(state): State<AppState>) {
 *     let _pool = &state.pool;
 * }
 * ```
 */

use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::SqlitePool;

use crate::backend::auth::TokenVerifier;
use crate::backend::notifications::push::PushSender;
use crate::backend::server::config::AppConfig;

/// Application state shared by every handler
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub pool: SqlitePool,

    /// Configuration the server was started with
    pub config: Arc<AppConfig>,

    /// Verifies `Authorization: Bearer` tokens
    pub verifier: Arc<dyn TokenVerifier>,

    /// Push delivery backend
    ///
    /// This is `None` if no service account is configured. Sends are then
    /// reported as failed with an error, but still mark content as seen.
    pub push: Option<Arc<dyn PushSender>>,
}

impl AppState {
    pub fn new(
        pool: SqlitePool,
        config: AppConfig,
        verifier: Arc<dyn TokenVerifier>,
        push: Option<Arc<dyn PushSender>>,
    ) -> Self {
        Self {
            pool,
            config: Arc::new(config),
            verifier,
            push,
        }
    }
}

/// Implement FromRef for SqlitePool
///
/// This allows handlers to extract the pool directly with
/// `State(pool): State<SqlitePool>`.
impl FromRef<AppState> for SqlitePool {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.pool.clone()
    }
}

impl FromRef<AppState> for Arc<AppConfig> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.config.clone()
    }
}
