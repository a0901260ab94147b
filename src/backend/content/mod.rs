//! Content Module
//!
//! Quiz questions, true/false questions, daily infos and challenges.
//!
//! # Architecture
//!
//! - **`topics`** - Topic catalogue and user topic preferences
//! - **`selection`** - Random unseen draw with cycling
//! - **`db`** - Content rows and seen/answered bookkeeping
//! - **`info`** - Info selection shared with push notifications
//! - **`handlers`** - HTTP handlers
//!
//! # Module Structure
//!
//! ```text
//! content/
//! ├── mod.rs
//! ├── topics.rs
//! ├── selection.rs
//! ├── db.rs
//! ├── info.rs
//! └── handlers/
//!     ├── quiz.rs        - GET /quiz/, GET /quiz/localize/
//!     ├── truefalse.rs   - GET /truefalse/
//!     ├── info.rs        - GET /info/random/
//!     ├── challenges.rs  - GET /challenges/random/, GET /challenges/{id}/localize/
//!     └── status.rs      - GET /debug/content-status/
//! ```

pub mod topics;
pub mod selection;
pub mod db;
pub mod info;
pub mod handlers;

pub use selection::{pick_unseen, Selection};
pub use topics::{topic_display_name, TOPICS};
