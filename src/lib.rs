//! Siftr - iterative search-query refinement for systematic reviews
//!
//! Siftr drives a bounded refinement loop: search an academic database,
//! classify each hit against inclusion/exclusion criteria, escalate
//! uncertain hits to a human, measure per-iteration precision, and rewrite
//! the query from the false positives until the target precision is met.

pub mod config;
pub mod domain;
pub mod error;
pub mod escalate;
pub mod judge;
pub mod refine;
pub mod source;

pub use error::{Result, SiftrError};
