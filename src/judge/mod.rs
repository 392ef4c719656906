//! Relevance judge - LLM-backed classification and query optimization
//!
//! This module provides:
//! - The RelevanceJudge trait consumed by the refinement engine
//! - A Gemini-backed implementation
//! - Prompt builders with a strict-JSON response contract
//! - A scripted judge for tests

pub mod gemini;
pub mod mock;
pub mod prompts;
pub mod traits;

pub use gemini::{GeminiConfig, GeminiJudge};
pub use mock::ScriptedJudge;
pub use traits::{Criteria, JudgeError, RelevanceJudge};
