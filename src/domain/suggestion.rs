//! Query rewrite suggested by the judge.

use serde::{Deserialize, Serialize};

/// Structured output of a query-optimization call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuerySuggestion {
    /// Analysis of why the false positives were matched
    pub critique: String,

    /// The rewritten query; becomes the next iteration's query
    pub new_query: String,

    /// Why the new query should perform better
    pub expected_improvement: String,
}
