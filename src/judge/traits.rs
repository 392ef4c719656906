//! Core judge trait and error types.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{Classification, QuerySuggestion, Record};

/// Inclusion/exclusion criteria a record is judged against.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Criteria {
    /// What makes a record relevant
    pub inclusion: String,

    /// What disqualifies a record
    pub exclusion: String,
}

impl Criteria {
    /// Create criteria from inclusion and exclusion descriptions.
    pub fn new(inclusion: impl Into<String>, exclusion: impl Into<String>) -> Self {
        Self {
            inclusion: inclusion.into(),
            exclusion: exclusion.into(),
        }
    }
}

/// Errors that can occur during judge operations
#[derive(Debug, thiserror::Error)]
pub enum JudgeError {
    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Missing API key: environment variable {env_var} not set")]
    MissingApiKey { env_var: String },

    #[error("Judge timed out after {0:?}")]
    Timeout(Duration),
}

impl JudgeError {
    pub fn is_retryable(&self) -> bool {
        match self {
            JudgeError::ApiError { status, .. } => *status >= 500 || *status == 429,
            JudgeError::Network(_) => true,
            JudgeError::Timeout(_) => true,
            JudgeError::InvalidResponse(_) => false,
            JudgeError::Json(_) => false,
            JudgeError::MissingApiKey { .. } => false,
        }
    }
}

/// Stateless relevance judge - each call is independent.
///
/// `classify` may fail per record; the engine treats that as recoverable.
/// `optimize_query` is called only when the loop continues and its failure
/// is fatal to the run.
#[async_trait]
pub trait RelevanceJudge: Send + Sync {
    /// Classify one record against the criteria.
    async fn classify(&self, record: &Record, criteria: &Criteria) -> Result<Classification, JudgeError>;

    /// Rewrite the query to exclude the given false positives.
    async fn optimize_query(
        &self,
        query: &str,
        false_positives: &[Record],
    ) -> Result<QuerySuggestion, JudgeError>;
}
