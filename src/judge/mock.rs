//! Scripted judge for tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::{Classification, QuerySuggestion, Record};

use super::traits::{Criteria, JudgeError, RelevanceJudge};

/// A judge that replays queued responses in order.
///
/// Classifications and suggestions are popped from separate queues; an
/// exhausted queue yields an error, which exercises the engine's
/// per-record recovery path. Optimize calls are recorded for assertions.
#[derive(Default)]
pub struct ScriptedJudge {
    classifications: Mutex<VecDeque<Result<Classification, JudgeError>>>,
    suggestions: Mutex<VecDeque<Result<QuerySuggestion, JudgeError>>>,
    optimize_calls: Mutex<Vec<OptimizeCall>>,
}

/// One recorded optimize_query invocation.
#[derive(Debug, Clone)]
pub struct OptimizeCall {
    pub query: String,
    pub false_positive_ids: Vec<String>,
}

impl ScriptedJudge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful classification.
    pub fn push_classification(&self, classification: Classification) {
        self.classifications.lock().unwrap().push_back(Ok(classification));
    }

    /// Queue a classification failure.
    pub fn push_classification_error(&self, error: JudgeError) {
        self.classifications.lock().unwrap().push_back(Err(error));
    }

    /// Queue a successful query suggestion.
    pub fn push_suggestion(&self, suggestion: QuerySuggestion) {
        self.suggestions.lock().unwrap().push_back(Ok(suggestion));
    }

    /// Queue an optimize_query failure.
    pub fn push_suggestion_error(&self, error: JudgeError) {
        self.suggestions.lock().unwrap().push_back(Err(error));
    }

    /// All optimize_query invocations seen so far.
    pub fn optimize_calls(&self) -> Vec<OptimizeCall> {
        self.optimize_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl RelevanceJudge for ScriptedJudge {
    async fn classify(&self, _record: &Record, _criteria: &Criteria) -> Result<Classification, JudgeError> {
        self.classifications
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(JudgeError::InvalidResponse("no scripted classification left".to_string())))
    }

    async fn optimize_query(
        &self,
        query: &str,
        false_positives: &[Record],
    ) -> Result<QuerySuggestion, JudgeError> {
        self.optimize_calls.lock().unwrap().push(OptimizeCall {
            query: query.to_string(),
            false_positive_ids: false_positives.iter().map(|r| r.id.clone()).collect(),
        });
        self.suggestions
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(JudgeError::InvalidResponse("no scripted suggestion left".to_string())))
    }
}
