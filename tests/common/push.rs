//! Push sender that records sends and replays scripted outcomes.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;

use sparkup_backend::backend::notifications::{MulticastReport, PushError, PushMessage, PushOutcome, PushSender};

#[derive(Default)]
pub struct RecordingPushSender {
    sent: Mutex<Vec<(Vec<String>, PushMessage)>>,
    scripted: Mutex<HashMap<String, VecDeque<PushOutcome>>>,
}

impl RecordingPushSender {
    /// Queue outcomes for `token`; unscripted sends are delivered
    pub fn script(&self, token: &str, outcomes: Vec<PushOutcome>) {
        self.scripted
            .lock()
            .unwrap()
            .entry(token.to_string())
            .or_default()
            .extend(outcomes);
    }

    /// Every multicast call so far
    pub fn sends(&self) -> Vec<(Vec<String>, PushMessage)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl PushSender for RecordingPushSender {
    async fn send_multicast(&self, tokens: &[String], message: &PushMessage) -> Result<MulticastReport, PushError> {
        self.sent.lock().unwrap().push((tokens.to_vec(), message.clone()));

        let mut scripted = self.scripted.lock().unwrap();
        let outcomes = tokens
            .iter()
            .map(|token| {
                let outcome = scripted
                    .get_mut(token)
                    .and_then(VecDeque::pop_front)
                    .unwrap_or(PushOutcome::Delivered);
                (token.clone(), outcome)
            })
            .collect();

        Ok(MulticastReport { outcomes })
    }
}
