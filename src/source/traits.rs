//! Core record source trait.

use async_trait::async_trait;

use crate::domain::Record;

/// A searchable bibliographic database.
///
/// `search` does not fail: implementations catch their own errors, log
/// them, and return an empty vector. An empty result terminates the
/// refinement loop with `NoResults`.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Fetch up to `limit` records matching the query.
    async fn search(&self, query: &str, limit: usize) -> Vec<Record>;

    /// Short name of the backing database, for logs and console output.
    fn name(&self) -> &str {
        "source"
    }
}
