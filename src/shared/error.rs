//! Shared Error Types
//!
//! This module defines error types that are shared between the HTTP backend
//! and the offline seeding tools. These errors represent common failure cases
//! around user input and stored content.
//!
//! # Error Categories
//!
//! - `SerializationError` - JSON serialization/deserialization failures
//! - `ValidationError` - Data validation failures (usernames, language codes)
//! - `ContentError` - Stored content that cannot be decoded or served
//!
//! # Usage
//!
//! ```rust
//! use sparkup_backend::shared::error::SharedError;
//!
//! let error = SharedError::validation("username", "Username must be 3-30 characters");
//! ```
use thiserror::Error;

/// Shared error types used by both the backend and the seeding tools
#[derive(Debug, Error, Clone)]
pub enum SharedError {
    /// JSON serialization or deserialization error
    #[error("Serialization error: {message}")]
    SerializationError {
        /// Human-readable error message
        message: String,
    },

    /// Data validation error
    #[error("Validation error in field '{field}': {message}")]
    ValidationError {
        /// The field that failed validation
        field: String,
        /// Human-readable error message
        message: String,
    },

    /// Content-related error
    #[error("Content error: {message}")]
    ContentError {
        /// Human-readable error message
        message: String,
    },
}

impl SharedError {
    /// Create a new serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::SerializationError {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new content error
    pub fn content(message: impl Into<String>) -> Self {
        Self::ContentError {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for SharedError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(err.to_string())
    }
}

/// Validate a public username (3-30 chars, alphanumeric + underscore)
pub fn validate_username(username: &str) -> Result<(), SharedError> {
    let len = username.chars().count();
    if !(3..=30).contains(&len) {
        return Err(SharedError::validation(
            "username",
            "Username must be between 3 and 30 characters",
        ));
    }
    if !username.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(SharedError::validation(
            "username",
            "Username may only contain letters, digits and underscores",
        ));
    }
    Ok(())
}
