//! Web of Science Starter adapter.
//!
//! The Starter API returns document metadata without abstract text, so
//! records from this source always carry `abstract_text: None`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::domain::Record;
use crate::error::{Result, SiftrError};

use super::traits::RecordSource;

/// WoS Starter documents endpoint
const WOS_API_URL: &str = "https://api.clarivate.com/apis/wos-starter/v1/documents";

/// Web of Science Starter record source.
pub struct WosSource {
    client: Client,
    api_key: Option<String>,
}

impl WosSource {
    /// Create a source, reading WOS_STARTER_API_KEY from the environment.
    pub fn from_env(timeout: Duration) -> Result<Self> {
        let api_key = std::env::var("WOS_STARTER_API_KEY").ok();
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
        let Some(hits) = payload["hits"].as_array() else {
            return Vec::new();
        };

        hits.iter()
            .map(|doc| {
                let authors = doc["names"]["authors"]
                    .as_array()
                    .map(|authors| {
                        authors
                            .iter()
                            .filter_map(|a| a["displayName"].as_str().or_else(|| a["name"].as_str()))
                            .map(str::to_string)
                            .collect()
                    })
                    .unwrap_or_default();

                let year = doc["source"]["publishYear"].as_i64().map(|y| y as i32);

                Record {
                    id: doc["uid"].as_str().unwrap_or_default().to_string(),
                    title: doc["title"].as_str().unwrap_or("No Title").to_string(),
                    abstract_text: None,
                    authors,
                    year,
                    doi: doc["identifiers"]["doi"].as_str().map(str::to_string),
                }
            })
            .collect()
    }
}

#[async_trait]
impl RecordSource for WosSource {
    async fn search(&self, query: &str, limit: usize) -> Vec<Record> {
        log::info!("searching Web of Science (Starter) for: {query}");

        let Some(api_key) = &self.api_key else {
            log::warn!("WOS_STARTER_API_KEY not set, Web of Science search skipped");
            return Vec::new();
        };

        let params = [
            ("q", query.to_string()),
            ("limit", limit.to_string()),
            ("page", "1".to_string()),
        ];

        let response = match self
            .client
            .get(WOS_API_URL)
            .header("X-ApiKey", api_key)
            .query(&params)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                log::warn!("Web of Science request failed: {e}");
                return Vec::new();
            }
        };

        if !response.status().is_success() {
            log::warn!("Web of Science returned {}", response.status());
            return Vec::new();
        }

        match response.json::<Value>().await {
            Ok(payload) => Self::parse_results(&payload),
            Err(e) => {
                log::warn!("failed to parse Web of Science response: {e}");
                Vec::new()
            }
        }
    }

    fn name(&self) -> &str {
        "wos"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_results_maps_fields() {
        let payload = json!({
            "hits": [{
                "uid": "WOS:0001",
                "title": "A starter record",
                "names": {
                    "authors": [
                        { "displayName": "Lovelace, Ada" },
                        { "name": "Turing, Alan" }
                    ]
                },
                "source": { "publishYear": 2018 },
                "identifiers": { "doi": "10.2/xyz" }
            }]
        });

        let records = WosSource::parse_results(&payload);
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.id, "WOS:0001");
        assert_eq!(record.title, "A starter record");
        assert!(record.abstract_text.is_none());
        assert_eq!(record.authors, vec!["Lovelace, Ada", "Turing, Alan"]);
        assert_eq!(record.year, Some(2018));
        assert_eq!(record.doi.as_deref(), Some("10.2/xyz"));
    }

    #[test]
    fn test_parse_results_empty_payload() {
        assert!(WosSource::parse_results(&json!({})).is_empty());
    }

    #[tokio::test]
    async fn test_search_without_api_key_is_empty() {
        let source = WosSource::new(None, Duration::from_secs(5)).unwrap();
        let records = source.search("anything", 10).await;
        assert!(records.is_empty());
    }
}
