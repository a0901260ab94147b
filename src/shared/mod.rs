//! Shared Module
//!
//! This module contains types that are shared between the HTTP backend and
//! the offline content-seeding tools. Nothing in here touches the database or
//! the network.
//!
//! # Overview
//!
//! - **`error`** - Validation and serialization errors
//! - **`localized`** - Language-keyed content stored as JSON
//! - **`i18n`** - Supported languages and localized limit messages

/// Shared error types
pub mod error;

/// Language-keyed content decoding
pub mod localized;

/// Supported languages and localized messages
pub mod i18n;

/// Re-export commonly used types for convenience
pub use error::SharedError;
pub use localized::{LocalizedText, DEFAULT_LANGUAGE};
pub use i18n::{is_supported_language, resolve_language, LimitMessage, SUPPORTED_LANGUAGES};
