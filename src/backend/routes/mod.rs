//! Route Configuration Module
//!
//! - **`router`** - Router assembly and shared layers
//! - **`api_routes`** - Client-facing endpoints (Firebase bearer auth)
//! - **`internal_routes`** - Scheduler and billing endpoints (shared secret)
//!
//! ```text
//! routes/
//! ├── mod.rs
//! ├── router.rs
//! ├── api_routes.rs
//! └── internal_routes.rs
//! ```

pub mod router;
pub mod api_routes;
pub mod internal_routes;

pub use router::create_router;
