//! Refinement loop integration tests
//!
//! Drives the engine end to end with scripted source, judge, and
//! escalation collaborators.

use std::sync::{Arc, Mutex};

use siftr::domain::{
    Classification, Decision, IterationSummary, LoopOutcome, QuerySuggestion, Record, Relevance, StopReason,
};
use siftr::error::SiftrError;
use siftr::escalate::ScriptedEscalation;
use siftr::judge::{Criteria, JudgeError, ScriptedJudge};
use siftr::refine::{LoopObserver, LoopParams, RefineEngine};
use siftr::source::ScriptedSource;

fn records(prefix: &str, n: usize) -> Vec<Record> {
    (0..n)
        .map(|i| Record::new(format!("{prefix}{i}"), format!("Paper {prefix}{i}")))
        .collect()
}

fn relevant() -> Classification {
    Classification::new(Relevance::Relevant, 0.9, "matches criteria")
}

fn irrelevant() -> Classification {
    Classification::new(Relevance::Irrelevant, 0.9, "off topic")
}

fn uncertain() -> Classification {
    Classification::new(Relevance::Uncertain, 0.4, "abstract is vague")
}

fn suggestion(new_query: &str) -> QuerySuggestion {
    QuerySuggestion {
        critique: "query over-matches".to_string(),
        new_query: new_query.to_string(),
        expected_improvement: "narrower scope".to_string(),
    }
}

fn params(query: &str, max_iterations: u32, threshold: f64, max_results: usize) -> LoopParams {
    LoopParams {
        initial_query: query.to_string(),
        criteria: Criteria::new("empirical studies", "opinion pieces"),
        max_iterations,
        precision_threshold: threshold,
        max_results,
        escalation_timeout: None,
    }
}

/// Observer that captures events for assertions.
#[derive(Default)]
struct CapturingObserver {
    iterations_started: Mutex<Vec<(u32, String)>>,
    summaries: Mutex<Vec<IterationSummary>>,
    outcomes: Mutex<Vec<LoopOutcome>>,
}

impl LoopObserver for CapturingObserver {
    fn iteration_started(&self, iteration: u32, query: &str) {
        self.iterations_started
            .lock()
            .unwrap()
            .push((iteration, query.to_string()));
    }

    fn iteration_summary(&self, summary: &IterationSummary) {
        self.summaries.lock().unwrap().push(summary.clone());
    }

    fn finished(&self, outcome: &LoopOutcome) {
        self.outcomes.lock().unwrap().push(outcome.clone());
    }
}

/// Scenario: 10 records, 9 relevant / 1 irrelevant, threshold 0.8.
/// Precision 0.9 terminates after one iteration without an optimize call.
#[tokio::test]
async fn target_reached_after_first_iteration() {
    let source = ScriptedSource::new();
    source.push_results(records("W", 10));

    let judge = Arc::new(ScriptedJudge::new());
    for _ in 0..9 {
        judge.push_classification(relevant());
    }
    judge.push_classification(irrelevant());

    let engine = RefineEngine::new(
        Arc::new(source),
        judge.clone(),
        Arc::new(ScriptedEscalation::new()),
    );

    let outcome = engine.run(&params("A", 3, 0.8, 10)).await.unwrap();

    assert_eq!(outcome.reason, StopReason::TargetReached);
    assert_eq!(outcome.iterations, 1);
    assert_eq!(outcome.final_query, "A");
    assert_eq!(outcome.final_precision, Some(0.9));
    assert!(judge.optimize_calls().is_empty());
}

/// Scenario: 5 relevant / 5 irrelevant (precision 0.5) triggers an
/// optimize call with all 5 false positives and query "A", then the loop
/// proceeds to iteration 2 with the returned query.
#[tokio::test]
async fn below_threshold_optimizes_and_continues() {
    let source = Arc::new(ScriptedSource::new());
    source.push_results(records("W", 10));
    // iteration 2: good results so the run terminates cleanly
    source.push_results(records("X", 2));

    let judge = Arc::new(ScriptedJudge::new());
    for i in 0..10 {
        judge.push_classification(if i < 5 { relevant() } else { irrelevant() });
    }
    judge.push_suggestion(suggestion("A AND NOT noise"));
    judge.push_classification(relevant());
    judge.push_classification(relevant());

    let engine = RefineEngine::new(source.clone(), judge.clone(), Arc::new(ScriptedEscalation::new()));
    let outcome = engine.run(&params("A", 3, 0.8, 10)).await.unwrap();

    let optimize_calls = judge.optimize_calls();
    assert_eq!(optimize_calls.len(), 1);
    assert_eq!(optimize_calls[0].query, "A");
    assert_eq!(optimize_calls[0].false_positive_ids.len(), 5);
    assert_eq!(
        optimize_calls[0].false_positive_ids,
        vec!["W5", "W6", "W7", "W8", "W9"]
    );

    // iteration 2 searched with the rewritten query
    let searches = source.searches();
    assert_eq!(searches.len(), 2);
    assert_eq!(searches[0].query, "A");
    assert_eq!(searches[1].query, "A AND NOT noise");

    assert_eq!(outcome.reason, StopReason::TargetReached);
    assert_eq!(outcome.iterations, 2);
    assert_eq!(outcome.final_query, "A AND NOT noise");
}

/// Scenario: max_iterations = 1 and precision below threshold terminates
/// with MaxIterations and never calls optimize, false positives or not.
#[tokio::test]
async fn budget_of_one_never_optimizes() {
    let source = ScriptedSource::new();
    source.push_results(records("W", 4));

    let judge = Arc::new(ScriptedJudge::new());
    judge.push_classification(relevant());
    for _ in 0..3 {
        judge.push_classification(irrelevant());
    }

    let engine = RefineEngine::new(
        Arc::new(source),
        judge.clone(),
        Arc::new(ScriptedEscalation::new()),
    );
    let outcome = engine.run(&params("A", 1, 0.8, 10)).await.unwrap();

    assert_eq!(outcome.reason, StopReason::MaxIterations);
    assert_eq!(outcome.iterations, 1);
    assert!(judge.optimize_calls().is_empty());
}

/// Scenario: empty search on iteration 2 terminates there with NoResults
/// while iteration 1's summary stays visible through the callbacks.
#[tokio::test]
async fn empty_search_on_later_iteration() {
    let source = Arc::new(ScriptedSource::new());
    source.push_results(records("W", 2));
    // nothing queued for iteration 2: the search comes back empty

    let judge = Arc::new(ScriptedJudge::new());
    judge.push_classification(relevant());
    judge.push_classification(irrelevant());
    judge.push_suggestion(suggestion("B"));

    let observer = Arc::new(CapturingObserver::default());
    let engine = RefineEngine::new(source, judge, Arc::new(ScriptedEscalation::new()))
        .with_observer(observer.clone());

    let outcome = engine.run(&params("A", 3, 0.8, 10)).await.unwrap();

    assert_eq!(outcome.reason, StopReason::NoResults);
    assert_eq!(outcome.iterations, 2);
    assert_eq!(outcome.final_query, "B");
    // the terminating iteration measured nothing; iteration 1's precision
    // carries into the outcome
    assert_eq!(outcome.final_precision, Some(0.5));

    let summaries = observer.summaries.lock().unwrap();
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].iteration, 1);
    assert_eq!(summaries[0].precision, 0.5);
}

#[tokio::test]
async fn empty_search_on_first_iteration_has_no_precision() {
    let engine = RefineEngine::new(
        Arc::new(ScriptedSource::new()),
        Arc::new(ScriptedJudge::new()),
        Arc::new(ScriptedEscalation::new()),
    );

    let outcome = engine.run(&params("A", 3, 0.8, 10)).await.unwrap();
    assert_eq!(outcome.reason, StopReason::NoResults);
    assert_eq!(outcome.iterations, 1);
    assert!(outcome.final_precision.is_none());
}

/// Below threshold with an empty false-positive set stops with NoSignal
/// even though iterations remain.
#[tokio::test]
async fn no_false_positives_stops_early() {
    let source = ScriptedSource::new();
    source.push_results(records("W", 4));

    let judge = Arc::new(ScriptedJudge::new());
    // 1 relevant, 3 uncertain-then-skipped: precision 0.25, no false positives
    judge.push_classification(relevant());
    for _ in 0..3 {
        judge.push_classification(uncertain());
    }

    let escalation = ScriptedEscalation::new();
    for _ in 0..3 {
        escalation.push_decision(Decision::Skip);
    }

    let engine = RefineEngine::new(Arc::new(source), judge.clone(), Arc::new(escalation));
    let outcome = engine.run(&params("A", 5, 0.8, 10)).await.unwrap();

    assert_eq!(outcome.reason, StopReason::NoSignal);
    assert_eq!(outcome.iterations, 1);
    assert_eq!(outcome.final_precision, Some(0.25));
    assert!(judge.optimize_calls().is_empty());
}

/// The loop never exceeds its iteration budget.
#[tokio::test]
async fn iteration_budget_is_a_hard_bound() {
    let max_iterations = 3;

    let source = Arc::new(ScriptedSource::new());
    let judge = Arc::new(ScriptedJudge::new());
    for i in 0..10 {
        // every iteration: 1 relevant, 1 irrelevant, precision 0.5
        source.push_results(records(&format!("I{i}-"), 2));
        judge.push_classification(relevant());
        judge.push_classification(irrelevant());
        judge.push_suggestion(suggestion(&format!("Q{}", i + 2)));
    }

    let observer = Arc::new(CapturingObserver::default());
    let engine = RefineEngine::new(source.clone(), judge, Arc::new(ScriptedEscalation::new()))
        .with_observer(observer.clone());

    let outcome = engine.run(&params("Q1", max_iterations, 0.9, 10)).await.unwrap();

    assert_eq!(outcome.reason, StopReason::MaxIterations);
    assert_eq!(outcome.iterations, max_iterations);
    assert_eq!(source.searches().len(), max_iterations as usize);
    assert_eq!(observer.summaries.lock().unwrap().len(), max_iterations as usize);
}

/// The query changes at most once per iteration, strictly between
/// iterations, and only via the judge's suggestion.
#[tokio::test]
async fn query_changes_only_between_iterations() {
    let source = Arc::new(ScriptedSource::new());
    let judge = Arc::new(ScriptedJudge::new());
    for i in 0..3 {
        source.push_results(records(&format!("I{i}-"), 2));
        judge.push_classification(relevant());
        judge.push_classification(irrelevant());
        judge.push_suggestion(suggestion(&format!("Q{}", i + 2)));
    }

    let observer = Arc::new(CapturingObserver::default());
    let engine = RefineEngine::new(source.clone(), judge, Arc::new(ScriptedEscalation::new()))
        .with_observer(observer.clone());

    engine.run(&params("Q1", 3, 0.9, 10)).await.unwrap();

    let started = observer.iterations_started.lock().unwrap();
    assert_eq!(
        *started,
        vec![
            (1, "Q1".to_string()),
            (2, "Q2".to_string()),
            (3, "Q3".to_string()),
        ]
    );

    // each iteration's search saw exactly its iteration's query
    let searches = source.searches();
    let queries: Vec<&str> = searches.iter().map(|s| s.query.as_str()).collect();
    assert_eq!(queries, vec!["Q1", "Q2", "Q3"]);
}

/// A record whose classification errors appears in no tally but still
/// counts toward the precision denominator.
#[tokio::test]
async fn errored_records_stay_in_denominator() {
    let source = ScriptedSource::new();
    source.push_results(records("W", 4));

    let judge = Arc::new(ScriptedJudge::new());
    judge.push_classification(relevant());
    judge.push_classification(relevant());
    judge.push_classification_error(JudgeError::InvalidResponse("garbage".to_string()));
    judge.push_classification(relevant());

    let observer = Arc::new(CapturingObserver::default());
    let engine = RefineEngine::new(
        Arc::new(source),
        judge.clone(),
        Arc::new(ScriptedEscalation::new()),
    )
    .with_observer(observer.clone());

    // 3 relevant out of 4 fetched: 0.75 < 0.8, no false positives
    let outcome = engine.run(&params("A", 2, 0.8, 10)).await.unwrap();

    assert_eq!(outcome.reason, StopReason::NoSignal);
    assert_eq!(outcome.final_precision, Some(0.75));

    let summaries = observer.summaries.lock().unwrap();
    assert_eq!(summaries[0].total, 4);
    assert_eq!(summaries[0].relevant, 3);
    assert_eq!(summaries[0].errored, 1);
    assert_eq!(summaries[0].irrelevant, 0);
}

/// An uncertain record the human skips appears in no tally but still
/// counts toward the precision denominator.
#[tokio::test]
async fn human_skip_stays_in_denominator() {
    let source = ScriptedSource::new();
    source.push_results(records("W", 4));

    let judge = Arc::new(ScriptedJudge::new());
    judge.push_classification(relevant());
    judge.push_classification(relevant());
    judge.push_classification(relevant());
    judge.push_classification(uncertain());

    let escalation = Arc::new(ScriptedEscalation::new());
    escalation.push_decision(Decision::Skip);

    let observer = Arc::new(CapturingObserver::default());
    let engine = RefineEngine::new(Arc::new(source), judge, escalation.clone()).with_observer(observer.clone());

    let outcome = engine.run(&params("A", 2, 0.8, 10)).await.unwrap();

    // 3/4 = 0.75, the skipped record still counted as fetched
    assert_eq!(outcome.final_precision, Some(0.75));
    assert_eq!(escalation.escalated_ids(), vec!["W3"]);

    let summaries = observer.summaries.lock().unwrap();
    assert_eq!(summaries[0].skipped, 1);
    assert_eq!(summaries[0].relevant, 3);
}

/// Escalation decisions override uncertain verdicts for aggregation.
#[tokio::test]
async fn escalation_overrides_uncertain() {
    let source = ScriptedSource::new();
    source.push_results(records("W", 2));

    let judge = Arc::new(ScriptedJudge::new());
    judge.push_classification(uncertain());
    judge.push_classification(uncertain());

    let escalation = ScriptedEscalation::new();
    escalation.push_decision(Decision::Relevant);
    escalation.push_decision(Decision::Relevant);

    let engine = RefineEngine::new(Arc::new(source), judge, Arc::new(escalation));
    let outcome = engine.run(&params("A", 2, 0.8, 10)).await.unwrap();

    assert_eq!(outcome.reason, StopReason::TargetReached);
    assert_eq!(outcome.final_precision, Some(1.0));
}

/// An optimize-query failure is fatal and carries the iteration and query.
#[tokio::test]
async fn optimize_failure_is_fatal_with_context() {
    let source = ScriptedSource::new();
    source.push_results(records("W", 2));

    let judge = Arc::new(ScriptedJudge::new());
    judge.push_classification(relevant());
    judge.push_classification(irrelevant());
    judge.push_suggestion_error(JudgeError::ApiError {
        status: 500,
        message: "backend exploded".to_string(),
    });

    let engine = RefineEngine::new(Arc::new(source), judge, Arc::new(ScriptedEscalation::new()));
    let result = engine.run(&params("A", 3, 0.9, 10)).await;

    match result {
        Err(SiftrError::OptimizeQuery { iteration, query, .. }) => {
            assert_eq!(iteration, 1);
            assert_eq!(query, "A");
        }
        other => panic!("expected OptimizeQuery error, got {other:?}"),
    }
}

/// The finished callback fires exactly once with the returned outcome.
#[tokio::test]
async fn finished_callback_matches_outcome() {
    let source = ScriptedSource::new();
    source.push_results(records("W", 1));

    let judge = Arc::new(ScriptedJudge::new());
    judge.push_classification(relevant());

    let observer = Arc::new(CapturingObserver::default());
    let engine = RefineEngine::new(Arc::new(source), judge, Arc::new(ScriptedEscalation::new()))
        .with_observer(observer.clone());

    let outcome = engine.run(&params("A", 1, 0.5, 10)).await.unwrap();

    let outcomes = observer.outcomes.lock().unwrap();
    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0], outcome);
}
