/**
 * Server Initialization
 *
 * This module builds the Axum application from an `AppConfig`.
 *
 * # Initialization Process
 *
 * 1. Open the SQLite pool and run migrations
 * 2. Import curated content from `DATA_DIR` into empty tables
 * 3. Choose the token verifier (Firebase, else the development verifier)
 * 4. Create the FCM sender when a service account is configured
 * 5. Create the router
 *
 * Steps 2 and 4 are best effort: failures are logged and the server still
 * starts, without content or without push delivery respectively.
 */

use std::sync::Arc;

use axum::Router;

use crate::backend::auth::{DevTokenVerifier, FirebaseVerifier, TokenVerifier};
use crate::backend::notifications::{FcmSender, PushSender, ServiceAccount};
use crate::backend::routes::create_router;
use crate::backend::server::config::{load_database, AppConfig, ConfigError};
use crate::backend::server::state::AppState;
use crate::seeding::importer::import_directory;

/// Pick the bearer-token verifier for `config`
///
/// # Errors
///
/// `ConfigError::MissingVerifier` when neither a Firebase project nor a
/// development secret is configured.
pub fn build_verifier(config: &AppConfig) -> Result<Arc<dyn TokenVerifier>, ConfigError> {
    if let Some(project_id) = &config.firebase_project_id {
        tracing::info!("Verifying Firebase ID tokens for project {}", project_id);
        return Ok(Arc::new(FirebaseVerifier::new(project_id.clone())));
    }
    if let Some(secret) = &config.dev_auth_secret {
        tracing::warn!("FIREBASE_PROJECT_ID is not set; accepting HS256 development tokens");
        return Ok(Arc::new(DevTokenVerifier::new(secret.clone())));
    }
    Err(ConfigError::MissingVerifier)
}

/// Create the FCM sender from the configured service account, if any
pub fn build_push_sender(config: &AppConfig) -> Option<Arc<dyn PushSender>> {
    let path = config.service_account_path.as_ref()?;
    match ServiceAccount::from_file(path) {
        Ok(account) => {
            tracing::info!("FCM delivery enabled for project {}", account.project_id);
            Some(Arc::new(FcmSender::from_service_account(account)))
        }
        Err(e) => {
            tracing::error!("Push delivery disabled: {}", e);
            None
        }
    }
}

/// Create and configure the Axum application
///
/// # Errors
///
/// Fails when the database cannot be opened or migrated, or when no token
/// verifier is configured.
pub async fn create_app(config: AppConfig) -> Result<Router, ConfigError> {
    tracing::info!("Initializing SparkUp backend");

    let pool = load_database(&config.database_url).await?;

    match import_directory(&pool, &config.data_dir).await {
        Ok(summary) => tracing::info!("Content import: {}", summary),
        Err(e) => tracing::error!("Content import from {} failed: {}", config.data_dir.display(), e),
    }

    let verifier = build_verifier(&config)?;
    let push = build_push_sender(&config);

    let app_state = AppState::new(pool, config, verifier, push);
    tracing::info!("Router configured");

    Ok(create_router(app_state))
}
