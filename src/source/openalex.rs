//! OpenAlex adapter.
//!
//! Uses the works search endpoint. OpenAlex does not return plain abstract
//! text; it returns an inverted index that has to be flattened back into
//! prose.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::domain::Record;
use crate::error::{Result, SiftrError};

use super::traits::RecordSource;

/// OpenAlex works endpoint
const OPENALEX_API_URL: &str = "https://api.openalex.org/works";

/// OpenAlex record source.
///
/// Setting a mailto address places requests in the polite pool.
pub struct OpenAlexSource {
    client: Client,
    mailto: Option<String>,
}

impl OpenAlexSource {
    pub fn new(mailto: Option<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SiftrError::Config(format!("failed to create HTTP client: {e}")))?;
        Ok(Self { client, mailto })
    }

    fn parse_results(payload: &Value) -> Vec<Record> {
        let Some(works) = payload["results"].as_array() else {
            return Vec::new();
        };

        works
            .iter()
            .map(|work| {
                let authors = work["authorships"]
                    .as_array()
                    .map(|authorships| {
                        authorships
                            .iter()
                            .filter_map(|a| a["author"]["display_name"].as_str())
                            .map(str::to_string)
                            .collect()
                    })
                    .unwrap_or_default();

                Record {
                    id: work["id"].as_str().unwrap_or_default().to_string(),
                    title: work["display_name"].as_str().unwrap_or("No Title").to_string(),
                    abstract_text: reconstruct_abstract(&work["abstract_inverted_index"]),
                    authors,
                    year: work["publication_year"].as_i64().map(|y| y as i32),
                    doi: work["doi"].as_str().map(str::to_string),
                }
            })
            .collect()
    }
}

/// Flatten an OpenAlex inverted index back into abstract text.
///
/// The index maps each word to the positions it occupies; sorting the
/// (position, word) pairs restores the original order. A malformed index
/// yields None.
fn reconstruct_abstract(index: &Value) -> Option<String> {
    let map = index.as_object()?;

    let mut positioned: Vec<(u64, &str)> = Vec::new();
    for (word, positions) in map {
        let positions = positions.as_array()?;
        for position in positions {
            positioned.push((position.as_u64()?, word.as_str()));
        }
    }

    if positioned.is_empty() {
        return None;
    }

    positioned.sort();
    let words: Vec<&str> = positioned.iter().map(|(_, word)| *word).collect();
    Some(words.join(" "))
}

#[async_trait]
impl RecordSource for OpenAlexSource {
    async fn search(&self, query: &str, limit: usize) -> Vec<Record> {
        log::info!("searching OpenAlex for: {query}");

        let mut params = vec![
            ("search".to_string(), query.to_string()),
            ("per-page".to_string(), limit.to_string()),
        ];
        if let Some(mailto) = &self.mailto {
            params.push(("mailto".to_string(), mailto.clone()));
        }

        let response = match self.client.get(OPENALEX_API_URL).query(&params).send().await {
            Ok(response) => response,
            Err(e) => {
                log::warn!("OpenAlex request failed: {e}");
                return Vec::new();
            }
        };

        if !response.status().is_success() {
            log::warn!("OpenAlex returned {}", response.status());
            return Vec::new();
        }

        match response.json::<Value>().await {
            Ok(payload) => Self::parse_results(&payload),
            Err(e) => {
                log::warn!("failed to parse OpenAlex response: {e}");
                Vec::new()
            }
        }
    }

    fn name(&self) -> &str {
        "openalex"
    }
}
