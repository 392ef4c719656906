//! Per-iteration summary reported through observer callbacks.

use serde::{Deserialize, Serialize};

/// Counts and precision for one completed iteration.
///
/// Precision is `relevant / total`, where `total` counts every fetched
/// record, including records whose classification failed and records the
/// human skipped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IterationSummary {
    /// 1-based iteration number
    pub iteration: u32,

    /// Query used for this iteration
    pub query: String,

    /// Records fetched from the source
    pub total: usize,

    /// Records with a final decision of relevant
    pub relevant: usize,

    /// Records with a final decision of irrelevant (false positives)
    pub irrelevant: usize,

    /// Records the human chose to skip
    pub skipped: usize,

    /// Records whose classification failed
    pub errored: usize,

    /// relevant / total, 0.0 when total is 0
    pub precision: f64,
}

impl IterationSummary {
    /// Compute precision over all fetched records.
    pub fn precision_of(relevant: usize, total: usize) -> f64 {
        if total == 0 {
            0.0
        } else {
            relevant as f64 / total as f64
        }
    }
}
