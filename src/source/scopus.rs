//! Scopus adapter.
//!
//! Uses the Scopus Search API. Abstracts are only present when the
//! subscription level returns `dc:description`; otherwise the record
//! carries a placeholder.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::domain::Record;
use crate::error::{Result, SiftrError};

use super::traits::RecordSource;

/// Scopus search endpoint
const SCOPUS_API_URL: &str = "https://api.elsevier.com/content/search/scopus";

/// Scopus record source.
pub struct ScopusSource {
    client: Client,
    api_key: Option<String>,
}

impl ScopusSource {
    /// Create a source, reading SCOPUS_API_KEY from the environment.
    ///
    /// A missing key is not an error here: searches degrade to empty
    /// results with a warning, matching the source contract.
    pub fn from_env(timeout: Duration) -> Result<Self> {
        let api_key = std::env::var("SCOPUS_API_KEY").ok();
        Self::new(api_key, timeout)
    }

    pub fn new(api_key: Option<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SiftrError::Config(format!("failed to create HTTP client: {e}")))?;
        Ok(Self { client, api_key })
    }

    fn parse_results(payload: &Value) -> Vec<Record> {
        let Some(entries) = payload["search-results"]["entry"].as_array() else {
            return Vec::new();
        };

        entries
            .iter()
            .map(|entry| {
                let year = entry["prism:coverDate"]
                    .as_str()
                    .and_then(|date| date.get(..4))
                    .and_then(|prefix| prefix.parse::<i32>().ok());

                let authors = entry["dc:creator"]
                    .as_str()
                    .map(|creator| vec![creator.to_string()])
                    .unwrap_or_default();

                Record {
                    id: entry["eid"].as_str().unwrap_or_default().to_string(),
                    title: entry["dc:title"].as_str().unwrap_or("No Title").to_string(),
                    abstract_text: entry["dc:description"].as_str().map(str::to_string),
                    authors,
                    year,
                    doi: entry["prism:doi"].as_str().map(str::to_string),
                }
            })
            .collect()
    }
}

#[async_trait]
impl RecordSource for ScopusSource {
    async fn search(&self, query: &str, limit: usize) -> Vec<Record> {
        log::info!("searching Scopus for: {query}");

        let Some(api_key) = &self.api_key else {
            log::warn!("SCOPUS_API_KEY not set, Scopus search skipped");
            return Vec::new();
        };

        let params = [("query", query.to_string()), ("count", limit.to_string())];

        let response = match self
            .client
            .get(SCOPUS_API_URL)
            .header("X-ELS-APIKey", api_key)
            .query(&params)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                log::warn!("Scopus request failed: {e}");
                return Vec::new();
            }
        };

        if !response.status().is_success() {
            log::warn!("Scopus returned {}", response.status());
            return Vec::new();
        }

        match response.json::<Value>().await {
            Ok(payload) => Self::parse_results(&payload),
            Err(e) => {
                log::warn!("failed to parse Scopus response: {e}");
                Vec::new()
            }
        }
    }

    fn name(&self) -> &str {
        "scopus"
    }
}
