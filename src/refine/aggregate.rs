//! Decision aggregation for one iteration's records.

use std::time::Duration;

use crate::domain::{Decision, Record};
use crate::escalate::EscalationHandler;
use crate::judge::{Criteria, RelevanceJudge};

use super::observer::LoopObserver;

/// Aggregated decisions for one iteration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tally {
    /// Records with a final decision of relevant
    pub relevant: usize,

    /// False positives, in source order
    pub irrelevant: Vec<Record>,

    /// Records the human chose to skip
    pub skipped: usize,

    /// Records whose classification failed
    pub errored: usize,
}

/// Classify every record and fold the final decisions into a tally.
///
/// Records are processed sequentially in source order, which keeps
/// logging deterministic and escalation serialized. A classification
/// failure excludes the record from all tallies except `errored`; an
/// uncertain verdict is adjudicated by the escalation handler, bounded by
/// `escalation_timeout` (an elapsed timeout degrades to skip).
pub async fn aggregate(
    records: &[Record],
    criteria: &Criteria,
    judge: &dyn RelevanceJudge,
    escalation: &dyn EscalationHandler,
    escalation_timeout: Option<Duration>,
    observer: &dyn LoopObserver,
) -> Tally {
    let mut tally = Tally::default();

    for record in records {
        let classification = match judge.classify(record, criteria).await {
            Ok(classification) => classification,
            Err(error) => {
                log::warn!("classification failed for {}: {error}", record.id);
                observer.record_failed(record, &error);
                tally.errored += 1;
                continue;
            }
        };

        let decision = match Decision::from_relevance(classification.relevance) {
            Some(decision) => decision,
            None => escalate_bounded(escalation, record, &classification.reasoning, escalation_timeout).await,
        };

        observer.record_classified(record, &classification, decision);

        match decision {
            Decision::Relevant => tally.relevant += 1,
            Decision::Irrelevant => tally.irrelevant.push(record.clone()),
            Decision::Skip => tally.skipped += 1,
        }
    }

    tally
}

/// Escalate with an optional upper bound on the wait.
async fn escalate_bounded(
    escalation: &dyn EscalationHandler,
    record: &Record,
    reasoning: &str,
    timeout: Option<Duration>,
) -> Decision {
    match timeout {
        None => escalation.escalate(record, reasoning).await,
        Some(bound) => match tokio::time::timeout(bound, escalation.escalate(record, reasoning)).await {
            Ok(decision) => decision,
            Err(_) => {
                log::warn!("escalation timed out after {bound:?} for {}, skipping record", record.id);
                Decision::Skip
            }
        },
    }
}
