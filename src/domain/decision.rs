//! Final per-record decision after classification and escalation.

use serde::{Deserialize, Serialize};

use super::classification::Relevance;

/// The final verdict for one record: the classifier's answer, or the
/// human's answer when the classifier was uncertain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    /// Counts toward the relevant tally
    Relevant,

    /// Counts as a false positive
    Irrelevant,

    /// Excluded from both tallies; still counted as fetched
    Skip,
}

impl Decision {
    /// Map a definite classifier verdict to a decision.
    ///
    /// Returns None for `Uncertain`, which must go through escalation.
    pub fn from_relevance(relevance: Relevance) -> Option<Self> {
        match relevance {
            Relevance::Relevant => Some(Decision::Relevant),
            Relevance::Irrelevant => Some(Decision::Irrelevant),
            Relevance::Uncertain => None,
        }
    }

    /// Parse a human answer: "relevant", "irrelevant", or "skip".
    ///
    /// Single-letter shorthands are accepted.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "relevant" | "r" => Some(Decision::Relevant),
            "irrelevant" | "i" => Some(Decision::Irrelevant),
            "skip" | "s" => Some(Decision::Skip),
            _ => None,
        }
    }
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Decision::Relevant => "relevant",
            Decision::Irrelevant => "irrelevant",
            Decision::Skip => "skip",
        };
        write!(f, "{label}")
    }
}
