//! Content HTTP handlers.

pub mod quiz;
pub mod truefalse;
pub mod info;
pub mod challenges;
pub mod status;

pub use quiz::{get_quiz, localize_quiz};
pub use truefalse::get_true_false;
pub use info::get_random_info;
pub use challenges::{get_random_challenge, localize_challenge};
pub use status::content_status;
