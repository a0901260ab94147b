//! Subscription Module
//!
//! Tier definitions, per-day energy and usage limits, and the subscription
//! endpoints.
//!
//! - **`tiers`** - Free / Pro / Ultra and their limits
//! - **`access`** - Daily access resolution, energy and usage counters
//! - **`api`** - `GET /subscription/` and the internal grant endpoint

pub mod tiers;
pub mod access;
pub mod api;

pub use tiers::{SubscriptionTier, TierLimits};
pub use access::{consume_energy, increment_usage, resolve_access, today, AccessLevel, UsageCounter};
