//! Console observer - renders loop progress to the terminal.

use colored::*;

use siftr::domain::{Classification, Decision, IterationSummary, LoopOutcome, QuerySuggestion, Record, StopReason};
use siftr::judge::JudgeError;
use siftr::refine::LoopObserver;

/// How much of a title the per-record line shows.
const TITLE_PREVIEW_CHARS: usize = 60;

/// Renders progress events with colored console output.
#[derive(Default)]
pub struct ConsoleObserver;

impl ConsoleObserver {
    pub fn new() -> Self {
        Self
    }
}

fn preview(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_chars).collect();
        format!("{truncated}...")
    }
}

impl LoopObserver for ConsoleObserver {
    fn iteration_started(&self, iteration: u32, query: &str) {
        println!();
        println!("{}", format!("=== Iteration {iteration} ===").red().bold());
        println!("Query: {}", query.green());
    }

    fn record_classified(&self, record: &Record, _classification: &Classification, decision: Decision) {
        match decision {
            Decision::Relevant => {
                println!("{} {}", "Relevant:".blue(), preview(&record.title, TITLE_PREVIEW_CHARS));
            }
            Decision::Irrelevant => {
                println!(
                    "{} {}",
                    "Irrelevant:".dimmed(),
                    preview(&record.title, TITLE_PREVIEW_CHARS).dimmed()
                );
            }
            Decision::Skip => {
                println!(
                    "{} {}",
                    "Skipped:".dimmed(),
                    preview(&record.title, TITLE_PREVIEW_CHARS).dimmed()
                );
            }
        }
    }

    fn record_failed(&self, record: &Record, error: &JudgeError) {
        println!(
            "{} {} ({error})",
            "Error:".red(),
            preview(&record.title, TITLE_PREVIEW_CHARS)
        );
    }

    fn iteration_summary(&self, summary: &IterationSummary) {
        println!();
        println!(
            "Iteration precision: {} ({} relevant / {} fetched, {} irrelevant, {} skipped, {} errored)",
            format!("{:.1}%", summary.precision * 100.0).bold(),
            summary.relevant,
            summary.total,
            summary.irrelevant,
            summary.skipped,
            summary.errored
        );
    }

    fn query_optimized(&self, suggestion: &QuerySuggestion) {
        println!();
        println!("{}", "Optimising query...".magenta().bold());
        println!("Critique: {}", suggestion.critique);
        println!("New query: {}", suggestion.new_query.green());
    }

    fn finished(&self, outcome: &LoopOutcome) {
        println!();
        match outcome.reason {
            StopReason::TargetReached => println!("{}", "Target precision reached!".green().bold()),
            StopReason::NoResults => println!("{}", "No records found.".yellow()),
            StopReason::NoSignal => {
                println!("{}", "No false positives left to learn from.".yellow())
            }
            StopReason::MaxIterations => println!("{}", "Max iterations reached.".yellow()),
        }
        if let Some(precision) = outcome.final_precision {
            println!("Final precision: {}", format!("{:.1}%", precision * 100.0).bold());
        }
        println!("Final query: {}", outcome.final_query.green());
    }
}
