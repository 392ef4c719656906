//! Classifier output for a single record.

use serde::{Deserialize, Serialize};

/// Verdict of the relevance classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Relevance {
    Relevant,
    Irrelevant,
    Uncertain,
}

impl Relevance {
    /// Whether this verdict needs human adjudication.
    pub fn needs_escalation(&self) -> bool {
        matches!(self, Relevance::Uncertain)
    }
}

/// Structured classifier output for one record in one iteration.
///
/// Never persisted beyond the iteration that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    /// The classifier's verdict
    pub relevance: Relevance,

    /// Confidence in [0.0, 1.0]
    pub confidence: f64,

    /// Brief explanation of the decision
    pub reasoning: String,
}

impl Classification {
    /// Create a classification, clamping confidence into [0.0, 1.0].
    pub fn new(relevance: Relevance, confidence: f64, reasoning: impl Into<String>) -> Self {
        Self {
            relevance,
            confidence: confidence.clamp(0.0, 1.0),
            reasoning: reasoning.into(),
        }
    }
}
