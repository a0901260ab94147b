//! Authentication Module
//!
//! This module verifies bearer tokens and maps them to local users.
//!
//! # Architecture
//!
//! - **`verifier`** - `TokenVerifier` trait, verified identity and errors
//! - **`firebase`** - Firebase ID-token verification against Google's JWK set
//! - **`dev_tokens`** - HS256 development tokens
//! - **`users`** - User model and database operations
//!
//! # Module Structure
//!
//! ```text
//! auth/
//! ├── mod.rs          - Module exports and documentation
//! ├── verifier.rs     - Verifier trait
//! ├── firebase.rs     - Firebase verifier with key cache
//! ├── dev_tokens.rs   - Development token issue/verify
//! └── users.rs        - User model and database operations
//! ```
//!
//! # Authentication Flow
//!
//! 1. Client sends `Authorization: Bearer <id token>`
//! 2. The configured verifier checks the token and yields a uid
//! 3. The local user is looked up by uid, and provisioned on first sight
//!
//! The `CurrentUser` extractor in `middleware::auth` drives this flow.

/// Verifier trait and identity types
pub mod verifier;

/// Firebase ID-token verification
pub mod firebase;

/// Development HS256 tokens
pub mod dev_tokens;

/// User data model and database operations
pub mod users;

pub use verifier::{AuthError, TokenVerifier, VerifiedIdentity};
pub use firebase::FirebaseVerifier;
pub use dev_tokens::{issue_dev_token, DevTokenVerifier};
pub use users::User;
