//! Subscription tiers and their limits.

use serde::Serialize;

/// Subscription level stored in `user_subscriptions.level`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionTier {
    Free,
    Pro,
    Ultra,
}

/// Per-tier daily allowances
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TierLimits {
    /// Energy granted at each daily reset; one unit per quiz or true/false session
    pub energy_per_day: i64,
    /// Answer time per question shown to the client
    pub session_seconds: i64,
    /// Quiz questions per day; `None` is unlimited
    pub quiz_limit: Option<i64>,
    /// Challenges per day; `None` is unlimited
    pub challenge_limit: Option<i64>,
    /// Push notifications per day
    pub notifications_per_day: i64,
    /// Points for a correct answer before streak bonus
    pub base_points: i64,
}

impl SubscriptionTier {
    pub const ALL: [SubscriptionTier; 3] = [Self::Free, Self::Pro, Self::Ultra];

    /// Parse a stored level; unknown values are treated as free
    pub fn from_stored(level: &str) -> Self {
        Self::parse(level).unwrap_or(Self::Free)
    }

    /// Strict parse used for admin input
    pub fn parse(level: &str) -> Option<Self> {
        match level.trim().to_ascii_lowercase().as_str() {
            "free" => Some(Self::Free),
            "pro" => Some(Self::Pro),
            "ultra" => Some(Self::Ultra),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Pro => "pro",
            Self::Ultra => "ultra",
        }
    }

    pub fn limits(&self) -> TierLimits {
        match self {
            Self::Free => TierLimits {
                energy_per_day: 3,
                session_seconds: 60,
                quiz_limit: Some(3),
                challenge_limit: Some(3),
                notifications_per_day: 1,
                base_points: 10,
            },
            Self::Pro => TierLimits {
                energy_per_day: 5,
                session_seconds: 60,
                quiz_limit: Some(5),
                challenge_limit: Some(5),
                notifications_per_day: 2,
                base_points: 15,
            },
            Self::Ultra => TierLimits {
                energy_per_day: 5,
                session_seconds: 90,
                quiz_limit: None,
                challenge_limit: None,
                notifications_per_day: 3,
                base_points: 20,
            },
        }
    }
}
