//! Observer callbacks for loop progress.
//!
//! The engine reports progress through this trait so a CLI or any other
//! front end can render it without the core depending on a presentation
//! layer. All callbacks default to no-ops.

use crate::domain::{Classification, Decision, IterationSummary, LoopOutcome, QuerySuggestion, Record};
use crate::judge::JudgeError;

/// Receives progress events from a refinement run.
pub trait LoopObserver: Send + Sync {
    /// An iteration is starting with the given query.
    fn iteration_started(&self, _iteration: u32, _query: &str) {}

    /// A record received a final decision.
    fn record_classified(&self, _record: &Record, _classification: &Classification, _decision: Decision) {}

    /// A record's classification failed; it is excluded from the tallies.
    fn record_failed(&self, _record: &Record, _error: &JudgeError) {}

    /// An iteration finished classifying and measuring precision.
    fn iteration_summary(&self, _summary: &IterationSummary) {}

    /// The judge proposed a rewritten query for the next iteration.
    fn query_optimized(&self, _suggestion: &QuerySuggestion) {}

    /// The loop reached a terminal state.
    fn finished(&self, _outcome: &LoopOutcome) {}
}

/// Observer that ignores every event.
pub struct NullObserver;

impl LoopObserver for NullObserver {}
