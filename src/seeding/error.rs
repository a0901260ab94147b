//! Seeding error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by content import, generation and translation
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Model request failed: {0}")]
    Model(String),

    #[error("Model kept rate limiting after {0} attempts")]
    RateLimited(u32),

    #[error("Invalid content: {0}")]
    InvalidContent(String),
}

impl SeedError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
