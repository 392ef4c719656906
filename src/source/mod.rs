//! Record sources - academic database adapters
//!
//! This module provides:
//! - The RecordSource trait consumed by the refinement engine
//! - OpenAlex, Scopus, and Web of Science Starter adapters
//! - A scripted source for tests
//!
//! Adapters never fail: transport and parse errors are logged and degrade
//! to an empty result set, which the engine reports as `NoResults`.

pub mod mock;
pub mod openalex;
pub mod scopus;
pub mod traits;
pub mod wos;

pub use mock::ScriptedSource;
pub use openalex::OpenAlexSource;
pub use scopus::ScopusSource;
pub use traits::RecordSource;
pub use wos::WosSource;
