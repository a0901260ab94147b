//! Backend Module
//!
//! The SparkUp HTTP server.
//!
//! # Architecture
//!
//! - **`server`** - Configuration, application state, initialization
//! - **`routes`** - Route configuration and router assembly
//! - **`auth`** - Token verification and local user records
//! - **`middleware`** - `CurrentUser` and `InternalAccess` extractors
//! - **`subscription`** - Tiers, daily energy and usage limits
//! - **`content`** - Quiz, true/false, info and challenge delivery
//! - **`progress`** - Scoring, streaks, leaderboard and profile
//! - **`notifications`** - Device tokens and FCM push fan-out
//! - **`error`** - HTTP-facing error type
//!
//! # Request Flow
//!
//! A gated request authenticates through `CurrentUser` (creating the local
//! user on first sight), resolves today's `AccessLevel`, checks the tier's
//! daily limit and energy, serves unseen content, and records what the user
//! has seen or answered.

/// Server setup and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// Backend error types
pub mod error;

/// Authentication and user management
pub mod auth;

/// Request extractors
pub mod middleware;

/// Subscription tiers and daily limits
pub mod subscription;

/// Content delivery
pub mod content;

/// Scores, streaks and profile
pub mod progress;

/// Push notifications
pub mod notifications;

pub use error::{BackendError, BackendResult};
pub use server::create_app;
