//! Middleware Module
//!
//! This module contains the request extractors that run before handlers.
//!
//! # Architecture
//!
//! - **`auth`** - `CurrentUser` extractor: bearer-token verification and
//!   lazy user provisioning
//! - **`internal`** - `InternalAccess` extractor: shared-secret guard for
//!   cron and admin endpoints
//!
//! # Example
//!
//! ```rust,no_run
//! use sparkup_backend::backend::middleware::CurrentUser;
//!
//! async fn handler(CurrentUser(user): CurrentUser) -> String {
//!     user.firebase_uid
//! }
//! ```

pub mod auth;
pub mod internal;

pub use auth::{bearer_token, CurrentUser};
pub use internal::InternalAccess;
