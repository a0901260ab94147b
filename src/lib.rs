//! SparkUp - Quiz and Daily Fact Backend
//!
//! SparkUp is the server behind a mobile trivia app. It serves multiple-choice
//! quizzes, true/false rounds, daily challenges and "did you know" facts in
//! eleven languages, keeps per-user score, streak and subscription state, and
//! pushes a daily fact to registered devices.
//!
//! # Module Structure
//!
//! - **`shared`** - Types shared between the server and the seeding tools
//!   - Localized content decoding
//!   - Supported languages and localized messages
//!   - Error types
//!
//! - **`backend`** - Axum HTTP server
//!   - Firebase ID-token verification and lazy user provisioning
//!   - Subscription tiers, daily energy and usage limits
//!   - Quiz, true/false, info and challenge content with unseen cycling
//!   - Scoring, leaderboard and per-topic analysis
//!   - Device tokens and FCM push fan-out
//!
//! - **`seeding`** - Offline content tooling
//!   - Import of curated JSON files
//!   - Generative-AI content creation and translation
//!
//! # Usage
//!
//! ```rust,no_run
//! use sparkup_backend::backend::server::{config::AppConfig, init::create_app};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::from_env()?;
//! let app = create_app(config).await?;
//! // Serve `app` with axum::serve
//! # Ok(())
//! # }
//! ```

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
pub mod backend;

/// Offline content import, generation and translation
pub mod seeding;
