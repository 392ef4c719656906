//! Prompt builders for the relevance judge.
//!
//! Both operations ask the model for a single JSON object and nothing
//! else; `extract_json` tolerates the common failure mode of the object
//! arriving wrapped in a markdown code fence.

use crate::domain::Record;

use super::traits::Criteria;

/// How many false positives the optimize prompt shows the model.
pub const MAX_FALSE_POSITIVES_SHOWN: usize = 5;

/// System prompt for classification calls.
pub const CLASSIFY_SYSTEM_PROMPT: &str = "You are a systematic-review screening assistant. \
Judge academic papers strictly against the stated criteria and respond with a single JSON object only.";

/// System prompt for query-optimization calls.
pub const OPTIMIZE_SYSTEM_PROMPT: &str = "You are a search-strategy expert for systematic reviews. \
Rewrite boolean search queries to exclude false positives and respond with a single JSON object only.";

/// Build the user prompt for classifying one record.
pub fn build_classify_prompt(record: &Record, criteria: &Criteria) -> String {
    format!(
        "Analyze the following academic paper against the research criteria.\n\n\
         PAPER:\n{paper}\n\n\
         INCLUSION CRITERIA:\n{inclusion}\n\n\
         EXCLUSION CRITERIA:\n{exclusion}\n\n\
         Task: classify the paper as \"relevant\", \"irrelevant\", or \"uncertain\".\n\
         Respond with exactly one JSON object:\n\
         {{\"relevance\": \"relevant\" | \"irrelevant\" | \"uncertain\", \
         \"confidence\": <number between 0.0 and 1.0>, \
         \"reasoning\": \"<brief explanation based on the criteria>\"}}",
        paper = record.prompt_text(),
        inclusion = criteria.inclusion,
        exclusion = criteria.exclusion,
    )
}

/// Build the user prompt for rewriting a query from its false positives.
///
/// Shows at most `MAX_FALSE_POSITIVES_SHOWN` titles; the caller passes the
/// full set.
pub fn build_optimize_prompt(query: &str, false_positives: &[Record]) -> String {
    let titles: Vec<String> = false_positives
        .iter()
        .take(MAX_FALSE_POSITIVES_SHOWN)
        .map(|r| format!("- {}", r.title))
        .collect();

    format!(
        "CURRENT QUERY: {query}\n\n\
         PROBLEM: the query returned these IRRELEVANT papers (false positives):\n{titles}\n\n\
         TASK:\n\
         1. Analyze why these papers were matched (e.g. polysemy, wrong context).\n\
         2. Construct a new boolean query string that excludes these kinds of papers while keeping relevant ones.\n\
         3. Explain your logic.\n\
         Respond with exactly one JSON object:\n\
         {{\"critique\": \"<why the false positives were matched>\", \
         \"new_query\": \"<the rewritten boolean query>\", \
         \"expected_improvement\": \"<why the new query is better>\"}}",
        titles = titles.join("\n"),
    )
}

/// Extract the JSON payload from a model reply.
///
/// Strips a surrounding ```json ... ``` or ``` ... ``` fence when present,
/// otherwise returns the trimmed reply unchanged.
pub fn extract_json(response: &str) -> &str {
    let trimmed = response.trim();

    if let Some(inner) = trimmed.strip_prefix("```json") {
        if let Some(body) = inner.split("```").next() {
            return body.trim();
        }
    }
    if let Some(inner) = trimmed.strip_prefix("```") {
        if let Some(body) = inner.split("```").next() {
            return body.trim();
        }
    }

    trimmed
}
