//! Console escalation - interactive stdin prompt.

use async_trait::async_trait;
use colored::*;

use crate::domain::{Decision, Record};

use super::traits::EscalationHandler;

/// How much of the abstract the prompt shows.
const ABSTRACT_PREVIEW_CHARS: usize = 200;

/// Prompts the operator on the terminal and reads the decision from stdin.
///
/// Invalid input re-prompts; EOF on stdin degrades to skip.
#[derive(Default)]
pub struct ConsoleEscalation;

impl ConsoleEscalation {
    pub fn new() -> Self {
        Self
    }

    fn print_prompt(record: &Record, reasoning: &str) {
        println!();
        println!("{}", "UNCERTAIN RECORD".yellow().bold());
        println!("{}", record.title.bold());
        if let Some(abstract_text) = &record.abstract_text {
            println!("{}", preview(abstract_text, ABSTRACT_PREVIEW_CHARS).italic());
        }
        println!("Classifier reasoning: {reasoning}");
        println!("Classify [{}/{}/{}]:", "r".blue(), "i".red(), "s".dimmed());
    }

    fn read_decision() -> Decision {
        let stdin = std::io::stdin();
        let mut line = String::new();
        loop {
            line.clear();
            match stdin.read_line(&mut line) {
                Ok(0) => {
                    log::warn!("stdin closed during escalation, skipping record");
                    return Decision::Skip;
                }
                Ok(_) => {
                    if let Some(decision) = Decision::parse(&line) {
                        return decision;
                    }
                    println!("Please answer relevant (r), irrelevant (i), or skip (s):");
                }
                Err(e) => {
                    log::warn!("failed to read escalation answer: {e}");
                    return Decision::Skip;
                }
            }
        }
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

#[async_trait]
impl EscalationHandler for ConsoleEscalation {
    async fn escalate(&self, record: &Record, reasoning: &str) -> Decision {
        Self::print_prompt(record, reasoning);

        // stdin reads are blocking; keep them off the async executor
        tokio::task::spawn_blocking(Self::read_decision)
            .await
            .unwrap_or_else(|e| {
                log::warn!("escalation task failed: {e}");
                Decision::Skip
            })
    }
}
