//! CLI module for siftr - command-line interface and console rendering.
//!
//! Provides the clap entry point plus the console observer that renders
//! loop progress.

pub mod commands;
pub mod render;

pub use commands::Cli;
