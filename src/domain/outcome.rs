//! Terminal state of a refinement run.

use serde::{Deserialize, Serialize};

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The source returned no records for the current query
    NoResults,

    /// Precision reached the configured threshold
    TargetReached,

    /// Precision below threshold but no false positives to learn from
    NoSignal,

    /// Iteration budget exhausted with false positives still present
    MaxIterations,
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            StopReason::NoResults => "no results",
            StopReason::TargetReached => "target precision reached",
            StopReason::NoSignal => "no false positives to learn from",
            StopReason::MaxIterations => "max iterations reached",
        };
        write!(f, "{label}")
    }
}

/// Terminal state returned by `RefineEngine::run`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoopOutcome {
    /// The query in effect when the loop stopped
    pub final_query: String,

    /// Last measured precision; None when no iteration completed one
    pub final_precision: Option<f64>,

    /// Number of iterations that were started
    pub iterations: u32,

    /// Why the loop stopped
    pub reason: StopReason,
}
