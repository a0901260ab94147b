//! Common test utilities and helpers
//!
//! - In-memory application with the development token verifier
//! - Recording push sender
//! - Content fixtures
//! - Assertion helpers

#![allow(dead_code)]

pub mod app;
pub mod assertions;
pub mod fixtures;
pub mod push;

pub use app::*;
pub use assertions::*;
pub use fixtures::*;
pub use push::*;
