//! Server Module
//!
//! Server initialization, configuration and shared state.
//!
//! - **`state`** - `AppState` and `FromRef` implementations
//! - **`config`** - Environment configuration and database pool creation
//! - **`init`** - Application assembly
//!
//! ```text
//! server/
//! ├── mod.rs
//! ├── state.rs
//! ├── config.rs
//! └── init.rs
//! ```

/// Application state management
pub mod state;

/// Server configuration loading
pub mod config;

/// Server initialization
pub mod init;

pub use config::AppConfig;
pub use init::create_app;
pub use state::AppState;
