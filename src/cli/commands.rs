//! CLI command definitions using clap.
//!
//! Defines the main CLI structure and subcommands:
//! - run: execute the refinement loop for a project
//! - show: print a project's resolved configuration

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Siftr - iterative search-query refinement for systematic reviews
#[derive(Parser, Debug)]
#[command(name = "siftr")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional settings file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Main subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the refinement loop for a project
    Run {
        /// Name of the project file (e.g. 'attempts')
        project: String,
    },

    /// Print a project's resolved configuration without running
    Show {
        /// Name of the project file
        project: String,
    },
}
