//! The refinement engine.
//!
//! Drives bounded iterations of search, classification, escalation, and
//! query optimization until a terminal state is reached. Loop state is an
//! immutable value threaded through `step`, so single iterations can be
//! exercised in isolation.

use std::sync::Arc;
use std::time::Duration;

use crate::domain::{IterationSummary, LoopOutcome, StopReason};
use crate::error::{Result, SiftrError};
use crate::escalate::EscalationHandler;
use crate::judge::{Criteria, RelevanceJudge};
use crate::source::RecordSource;

use super::aggregate::aggregate;
use super::observer::{LoopObserver, NullObserver};

/// Parameters for one refinement run.
#[derive(Debug, Clone)]
pub struct LoopParams {
    /// Query for the first iteration
    pub initial_query: String,

    /// Inclusion/exclusion criteria records are judged against
    pub criteria: Criteria,

    /// Maximum iterations before giving up
    pub max_iterations: u32,

    /// Target precision in [0.0, 1.0]
    pub precision_threshold: f64,

    /// Maximum records fetched per iteration
    pub max_results: usize,

    /// Upper bound on one escalation wait; None waits indefinitely
    pub escalation_timeout: Option<Duration>,
}

impl Default for LoopParams {
    fn default() -> Self {
        Self {
            initial_query: String::new(),
            criteria: Criteria::default(),
            max_iterations: 5,
            precision_threshold: 0.8,
            max_results: 20,
            escalation_timeout: None,
        }
    }
}

impl LoopParams {
    /// Validate the parameters. The loop never runs with malformed ones.
    pub fn validate(&self) -> Result<()> {
        if self.initial_query.trim().is_empty() {
            return Err(SiftrError::Config("initial query cannot be empty".to_string()));
        }
        if self.criteria.inclusion.trim().is_empty() {
            return Err(SiftrError::Config("inclusion criteria cannot be empty".to_string()));
        }
        if self.max_iterations == 0 {
            return Err(SiftrError::Config("max-iterations must be > 0".to_string()));
        }
        if !(0.0..=1.0).contains(&self.precision_threshold) {
            return Err(SiftrError::Config(
                "precision-threshold must be within [0, 1]".to_string(),
            ));
        }
        if self.max_results == 0 {
            return Err(SiftrError::Config("max-results-per-iter must be > 0".to_string()));
        }
        Ok(())
    }
}

/// Loop state for one iteration.
///
/// Immutable: `next` produces the state for the following iteration. The
/// query changes only between iterations, and only via the judge's
/// suggestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IterationState {
    /// Query in effect for this iteration
    pub query: String,

    /// 1-based iteration counter
    pub iteration: u32,
}

impl IterationState {
    /// State for the first iteration.
    pub fn first(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            iteration: 1,
        }
    }

    /// State for the next iteration with the rewritten query.
    pub fn next(&self, new_query: impl Into<String>) -> Self {
        Self {
            query: new_query.into(),
            iteration: self.iteration + 1,
        }
    }
}

/// What the loop does after an iteration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepAction {
    /// Proceed with the given state
    Continue(IterationState),

    /// Terminate with the given reason
    Stop(StopReason),
}

/// Result of a single iteration step.
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// Continue or stop
    pub action: StepAction,

    /// Precision measured by this step; None when the search was empty
    pub precision: Option<f64>,
}

/// The refinement engine.
pub struct RefineEngine {
    source: Arc<dyn RecordSource>,
    judge: Arc<dyn RelevanceJudge>,
    escalation: Arc<dyn EscalationHandler>,
    observer: Arc<dyn LoopObserver>,
}

impl RefineEngine {
    /// Create an engine over the three collaborators.
    pub fn new(
        source: Arc<dyn RecordSource>,
        judge: Arc<dyn RelevanceJudge>,
        escalation: Arc<dyn EscalationHandler>,
    ) -> Self {
        Self {
            source,
            judge,
            escalation,
            observer: Arc::new(NullObserver),
        }
    }

    /// Install an observer for progress events.
    pub fn with_observer(mut self, observer: Arc<dyn LoopObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Run the refinement loop to a terminal state.
    pub async fn run(&self, params: &LoopParams) -> Result<LoopOutcome> {
        params.validate()?;

        let mut state = IterationState::first(params.initial_query.clone());
        let mut last_precision: Option<f64> = None;

        loop {
            let step = self.step(params, &state).await?;
            if step.precision.is_some() {
                last_precision = step.precision;
            }

            match step.action {
                StepAction::Continue(next) => state = next,
                StepAction::Stop(reason) => {
                    let outcome = LoopOutcome {
                        final_query: state.query.clone(),
                        final_precision: last_precision,
                        iterations: state.iteration,
                        reason,
                    };
                    self.observer.finished(&outcome);
                    log::info!(
                        "loop finished after {} iteration(s): {}",
                        outcome.iterations,
                        outcome.reason
                    );
                    return Ok(outcome);
                }
            }
        }
    }

    /// Execute one iteration against the given state.
    ///
    /// Precision is recomputed from scratch for this iteration's records;
    /// nothing carries over from earlier iterations except the query.
    pub async fn step(&self, params: &LoopParams, state: &IterationState) -> Result<StepResult> {
        self.observer.iteration_started(state.iteration, &state.query);
        log::info!("iteration {} query: {}", state.iteration, state.query);

        let records = self.source.search(&state.query, params.max_results).await;
        if records.is_empty() {
            return Ok(StepResult {
                action: StepAction::Stop(StopReason::NoResults),
                precision: None,
            });
        }

        let tally = aggregate(
            &records,
            &params.criteria,
            self.judge.as_ref(),
            self.escalation.as_ref(),
            params.escalation_timeout,
            self.observer.as_ref(),
        )
        .await;

        // Denominator counts every fetched record, including skipped and
        // errored ones
        let precision = IterationSummary::precision_of(tally.relevant, records.len());

        let summary = IterationSummary {
            iteration: state.iteration,
            query: state.query.clone(),
            total: records.len(),
            relevant: tally.relevant,
            irrelevant: tally.irrelevant.len(),
            skipped: tally.skipped,
            errored: tally.errored,
            precision,
        };
        self.observer.iteration_summary(&summary);
        log::debug!(
            "iteration {} precision {:.3} ({} relevant / {} fetched)",
            state.iteration,
            precision,
            tally.relevant,
            records.len()
        );

        if precision >= params.precision_threshold {
            return Ok(StepResult {
                action: StepAction::Stop(StopReason::TargetReached),
                precision: Some(precision),
            });
        }

        if tally.irrelevant.is_empty() {
            return Ok(StepResult {
                action: StepAction::Stop(StopReason::NoSignal),
                precision: Some(precision),
            });
        }

        if state.iteration >= params.max_iterations {
            return Ok(StepResult {
                action: StepAction::Stop(StopReason::MaxIterations),
                precision: Some(precision),
            });
        }

        let suggestion = self
            .judge
            .optimize_query(&state.query, &tally.irrelevant)
            .await
            .map_err(|source| SiftrError::OptimizeQuery {
                iteration: state.iteration,
                query: state.query.clone(),
                source,
            })?;
        self.observer.query_optimized(&suggestion);

        Ok(StepResult {
            action: StepAction::Continue(state.next(suggestion.new_query)),
            precision: Some(precision),
        })
    }
}
