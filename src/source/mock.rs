//! Scripted record source for tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::Record;

use super::traits::RecordSource;

/// A source that replays queued result sets in order and records every
/// search it receives. An exhausted queue yields an empty result set.
#[derive(Default)]
pub struct ScriptedSource {
    result_sets: Mutex<VecDeque<Vec<Record>>>,
    searches: Mutex<Vec<SearchCall>>,
}

/// One recorded search invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchCall {
    pub query: String,
    pub limit: usize,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the result set for the next search.
    pub fn push_results(&self, records: Vec<Record>) {
        self.result_sets.lock().unwrap().push_back(records);
    }

    /// All searches seen so far.
    pub fn searches(&self) -> Vec<SearchCall> {
        self.searches.lock().unwrap().clone()
    }
}

#[async_trait]
impl RecordSource for ScriptedSource {
    async fn search(&self, query: &str, limit: usize) -> Vec<Record> {
        self.searches.lock().unwrap().push(SearchCall {
            query: query.to_string(),
            limit,
        });
        self.result_sets.lock().unwrap().pop_front().unwrap_or_default()
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
