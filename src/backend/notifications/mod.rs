//! Notifications Module
//!
//! Daily info push notifications over Firebase Cloud Messaging.
//!
//! - **`push`** - `PushSender` interface and per-token outcomes
//! - **`fcm`** - FCM HTTP v1 implementation
//! - **`db`** - Device tokens and delivery metrics
//! - **`dispatch`** - Sending an info to all of a user's devices
//! - **`handlers`** - Device token, send, scan and cleanup endpoints

pub mod push;
pub mod fcm;
pub mod db;
pub mod dispatch;
pub mod handlers;

pub use dispatch::{send_info_to_user, SendResult};
pub use fcm::{FcmSender, ServiceAccount};
pub use push::{MulticastReport, PushError, PushMessage, PushOutcome, PushSender};
