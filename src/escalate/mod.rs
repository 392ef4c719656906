//! Human escalation - adjudication of uncertain records
//!
//! The classifier hands uncertain records to an EscalationHandler, an
//! injected capability so automated tests can script the human's answers
//! instead of blocking on interactive input.

pub mod console;
pub mod scripted;
pub mod traits;

pub use console::ConsoleEscalation;
pub use scripted::ScriptedEscalation;
pub use traits::EscalationHandler;
