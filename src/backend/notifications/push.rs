//! Push sender interface
//!
//! This module defines the interface for delivering a notification to a set
//! of device tokens, and the per-token outcome types the dispatcher uses to
//! prune dead tokens and retry transient failures.

use std::collections::BTreeMap;

use async_trait::async_trait;
use thiserror::Error;

/// A notification to deliver
#[derive(Debug, Clone, PartialEq)]
pub struct PushMessage {
    pub title: String,
    pub body: String,
    /// Custom key/value data delivered alongside the notification
    pub data: BTreeMap<String, String>,
}

/// What happened to a single token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushOutcome {
    Delivered,
    /// The token is unregistered or malformed and should be deleted
    InvalidToken(String),
    /// Transient failure; worth retrying
    Failed(String),
}

/// Per-token outcomes of a multicast send, in input order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MulticastReport {
    pub outcomes: Vec<(String, PushOutcome)>,
}

impl MulticastReport {
    pub fn success_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| *outcome == PushOutcome::Delivered)
            .count()
    }

    pub fn failure_count(&self) -> usize {
        self.outcomes.len() - self.success_count()
    }

    pub fn delivered_tokens(&self) -> Vec<String> {
        self.tokens_matching(|o| matches!(o, PushOutcome::Delivered))
    }

    pub fn invalid_tokens(&self) -> Vec<String> {
        self.tokens_matching(|o| matches!(o, PushOutcome::InvalidToken(_)))
    }

    pub fn failed_tokens(&self) -> Vec<String> {
        self.tokens_matching(|o| matches!(o, PushOutcome::Failed(_)))
    }

    fn tokens_matching(&self, predicate: impl Fn(&PushOutcome) -> bool) -> Vec<String> {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| predicate(outcome))
            .map(|(token, _)| token.clone())
            .collect()
    }
}

/// Errors that prevent a send from being attempted at all
#[derive(Debug, Error)]
pub enum PushError {
    #[error("Push credentials error: {0}")]
    Credentials(String),

    #[error("Push transport error: {0}")]
    Transport(String),
}

/// Push delivery interface
#[async_trait]
pub trait PushSender: Send + Sync {
    /// Send `message` to every token, reporting one outcome per token
    async fn send_multicast(&self, tokens: &[String], message: &PushMessage) -> Result<MulticastReport, PushError>;
}
