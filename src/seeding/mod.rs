//! Seeding Module
//!
//! Offline content tooling shared by the `sparkup-seed` binary and server
//! startup.
//!
//! - **`importer`** - Load curated `manual_*.json` files into empty tables
//! - **`generator`** - Generate and translate content with a generative model
//! - **`translator`** - Fill one language across a content JSON file
//! - **`store`** - Content record types and inserts
//! - **`error`** - `SeedError`

pub mod error;
pub mod store;
pub mod importer;
pub mod generator;
pub mod translator;

pub use error::SeedError;
pub use generator::{generate, ContentModel, GenaiModel, GenerateKind, GenerateReport, RetryingModel};
pub use importer::{import_directory, ImportSummary};
pub use translator::{translate_file, TranslateReport};
