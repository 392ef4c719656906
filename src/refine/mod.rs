//! The refinement loop - the core of Siftr
//!
//! This module provides:
//! - LoopParams and IterationState for configuring and threading the loop
//! - RefineEngine, which drives search, classification, escalation, and
//!   query optimization across bounded iterations
//! - Decision aggregation over one iteration's records
//! - The LoopObserver callback trait for front ends

pub mod aggregate;
pub mod engine;
pub mod observer;

pub use aggregate::{Tally, aggregate};
pub use engine::{IterationState, LoopParams, RefineEngine, StepAction, StepResult};
pub use observer::{LoopObserver, NullObserver};
