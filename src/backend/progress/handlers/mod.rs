//! Progress and profile HTTP handlers.

pub mod answers;
pub mod profile;

pub use answers::{answer_quiz, answer_true_false};
pub use profile::{
    delete_me, get_analysis, get_leaderboard, get_profile, get_rank, get_topics, list_topics, put_topics,
    update_language, update_notifications, update_username, welcome,
};
