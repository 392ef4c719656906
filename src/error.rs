//! Error types for Siftr
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

use crate::judge::JudgeError;

/// All error types that can occur in Siftr
#[derive(Debug, Error)]
pub enum SiftrError {
    /// Invalid or incomplete configuration
    #[error("Config error: {0}")]
    Config(String),

    /// Project file not found or malformed
    #[error("Project error: {0}")]
    Project(String),

    /// Relevance judge error outside the per-record recovery path
    #[error("Judge error: {0}")]
    Judge(#[from] JudgeError),

    /// Query optimization failed; there is no fallback query to continue with
    #[error("Query optimization failed on iteration {iteration} (query: {query:?}): {source}")]
    OptimizeQuery {
        iteration: u32,
        query: String,
        source: JudgeError,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type alias for Siftr operations
pub type Result<T> = std::result::Result<T, SiftrError>;
