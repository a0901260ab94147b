/**
 * Server Configuration
 *
 * This module handles loading of server configuration from the environment
 * and creation of the SQLite connection pool.
 *
 * # Configuration Sources
 *
 * Configuration is loaded from environment variables (optionally via a
 * `.env` file loaded by the binary), with sensible defaults for local
 * development when possible.
 *
 * | Variable                         | Default                       |
 * |----------------------------------|-------------------------------|
 * | `DATABASE_URL`                   | `sqlite://sparkup.db?mode=rwc`|
 * | `SERVER_PORT`                    | `8000`                        |
 * | `FIREBASE_PROJECT_ID`            | unset                         |
 * | `GOOGLE_APPLICATION_CREDENTIALS` | unset                         |
 * | `DEV_AUTH_SECRET`                | unset                         |
 * | `INTERNAL_CRON_SECRET`           | unset                         |
 * | `DATA_DIR`                       | `data`                        |
 */

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use thiserror::Error;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://sparkup.db?mode=rwc";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_DATA_DIR: &str = "data";

/// Errors raised while reading configuration or opening the database
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },

    #[error("No token verifier configured: set FIREBASE_PROJECT_ID or DEV_AUTH_SECRET")]
    MissingVerifier,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Runtime configuration of the server
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub port: u16,
    /// Enables Firebase ID-token verification
    pub firebase_project_id: Option<String>,
    /// Path to a Google service account JSON file; enables FCM delivery
    pub service_account_path: Option<PathBuf>,
    /// HS256 secret for development tokens, used when Firebase is not configured
    pub dev_auth_secret: Option<String>,
    /// Shared secret for internal (cron/admin) endpoints; the guard is open when unset
    pub internal_secret: Option<String>,
    /// Directory holding the curated `manual_*.json` content files
    pub data_dir: PathBuf,
}

impl AppConfig {
    /// Read configuration from process environment variables
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` when `SERVER_PORT` is not a valid port.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through an arbitrary lookup function
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let port = match get("SERVER_PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|_| ConfigError::InvalidValue {
                name: "SERVER_PORT",
                value: raw.clone(),
            })?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            database_url: get("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            port,
            firebase_project_id: get("FIREBASE_PROJECT_ID"),
            service_account_path: get("GOOGLE_APPLICATION_CREDENTIALS").map(PathBuf::from),
            dev_auth_secret: get("DEV_AUTH_SECRET"),
            internal_secret: get("INTERNAL_CRON_SECRET"),
            data_dir: get("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
        })
    }

    /// Minimal configuration for tests and tooling: in-memory database and a dev secret
    pub fn for_testing(dev_secret: &str) -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            port: 0,
            firebase_project_id: None,
            service_account_path: None,
            dev_auth_secret: Some(dev_secret.to_string()),
            internal_secret: None,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
        }
    }
}

/// Open the SQLite connection pool and run migrations
///
/// This function:
/// 1. Parses the URL, creating the database file if missing
/// 2. Enables foreign keys so per-user rows cascade on deletion
/// 3. Runs the embedded migrations from `migrations/`
///
/// In-memory URLs are limited to a single, never-recycled connection so that
/// every query sees the same database.
///
/// # Arguments
///
/// * `database_url` - A `sqlite:` connection URL
///
/// # Errors
///
/// Returns `ConfigError::Database` if the connection fails and
/// `ConfigError::Migration` if a migration cannot be applied.
pub async fn load_database(database_url: &str) -> Result<SqlitePool, ConfigError> {
    tracing::info!("Connecting to database...");

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let in_memory = database_url.contains(":memory:") || database_url.contains("mode=memory");
    let pool = if in_memory {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?
    } else {
        SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(10))
            .connect_with(options)
            .await?
    };

    tracing::info!("Database connection pool created successfully");

    tracing::info!("Running database migrations...");
    sqlx::migrate!().run(&pool).await.map_err(|e| {
        tracing::error!("Failed to run database migrations: {}", e);
        e
    })?;
    tracing::info!("Database migrations completed successfully");

    Ok(pool)
}
