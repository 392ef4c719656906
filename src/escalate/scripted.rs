//! Scripted escalation for tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::{Decision, Record};

use super::traits::EscalationHandler;

/// Replays queued decisions in order and records each escalation.
///
/// An exhausted queue yields skip. An optional per-call delay simulates a
/// slow human, which exercises the engine's escalation timeout.
#[derive(Default)]
pub struct ScriptedEscalation {
    decisions: Mutex<VecDeque<Decision>>,
    escalated_ids: Mutex<Vec<String>>,
    delay: Option<Duration>,
}

impl ScriptedEscalation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every answer by the given duration.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Queue the answer for the next escalation.
    pub fn push_decision(&self, decision: Decision) {
        self.decisions.lock().unwrap().push_back(decision);
    }

    /// IDs of the records escalated so far.
    pub fn escalated_ids(&self) -> Vec<String> {
        self.escalated_ids.lock().unwrap().clone()
    }
}

#[async_trait]
impl EscalationHandler for ScriptedEscalation {
    async fn escalate(&self, record: &Record, _reasoning: &str) -> Decision {
        self.escalated_ids.lock().unwrap().push(record.id.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.decisions.lock().unwrap().pop_front().unwrap_or(Decision::Skip)
    }
}
