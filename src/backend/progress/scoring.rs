//! Points and rank names.

use crate::backend::subscription::SubscriptionTier;

/// Streak length beyond which the bonus stops growing
pub const MAX_STREAK_BONUS_STEPS: i64 = 5;
pub const STREAK_BONUS_PER_STEP: i64 = 2;

/// Kind of question being answered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionKind {
    /// Multiple choice; worth double points
    Quiz,
    TrueFalse,
}

/// Points for a correct answer given the streak before this answer
pub fn points_for_correct_answer(tier: SubscriptionTier, streak: i64, kind: QuestionKind) -> i64 {
    let bonus = streak.clamp(0, MAX_STREAK_BONUS_STEPS) * STREAK_BONUS_PER_STEP;
    let points = tier.limits().base_points + bonus;
    match kind {
        QuestionKind::Quiz => points * 2,
        QuestionKind::TrueFalse => points,
    }
}

/// Rank name for a total score
pub fn rank_name(score: i64) -> &'static str {
    match score {
        s if s >= 10_000 => "Master",
        s if s >= 5_000 => "Diamond",
        s if s >= 2_000 => "Gold",
        s if s >= 1_000 => "Silver",
        s if s >= 500 => "Bronze",
        _ => "Iron",
    }
}
