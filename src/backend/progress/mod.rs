//! Progress Module
//!
//! Scores, streaks, ranks and the user profile.
//!
//! - **`scoring`** - Points per answer and rank names
//! - **`db`** - Answer application, leaderboard, rank and analysis queries
//! - **`handlers`** - Answer, profile and leaderboard endpoints

pub mod scoring;
pub mod db;
pub mod handlers;

pub use scoring::{points_for_correct_answer, rank_name, QuestionKind};
