//! Core escalation trait.

use async_trait::async_trait;

use crate::domain::{Decision, Record};

/// A human (or scripted stand-in) that adjudicates uncertain records.
///
/// `escalate` blocks until an answer is available; the engine bounds the
/// wait with its configured escalation timeout.
#[async_trait]
pub trait EscalationHandler: Send + Sync {
    /// Ask for a final decision on a record the classifier was uncertain
    /// about. `reasoning` is the classifier's explanation.
    async fn escalate(&self, record: &Record, reasoning: &str) -> Decision;
}
