//! Gemini API judge implementation
//!
//! Implements the RelevanceJudge trait against the Google Generative
//! Language API. Both operations request a JSON response and parse it into
//! the corresponding domain type.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};

use crate::domain::{Classification, QuerySuggestion, Record};

use super::prompts::{
    CLASSIFY_SYSTEM_PROMPT, OPTIMIZE_SYSTEM_PROMPT, build_classify_prompt, build_optimize_prompt, extract_json,
};
use super::traits::{Criteria, JudgeError, RelevanceJudge};

/// Generative Language API base URL
const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Default model to use
const DEFAULT_MODEL: &str = "gemini-1.5-pro-latest";

/// Default environment variable holding the API key
const DEFAULT_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Default max tokens for a judge response
const DEFAULT_MAX_TOKENS: u32 = 1024;

/// Configuration for the Gemini judge
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub model: String,
    pub max_tokens: u32,
    pub timeout: Duration,
    pub api_key_env: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout: Duration::from_secs(60),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
        }
    }
}

impl GeminiConfig {
    /// Create a config with a specific model
    pub fn with_model(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Default::default()
        }
    }
}

/// Gemini-backed relevance judge
pub struct GeminiJudge {
    client: Client,
    api_key: String,
    config: GeminiConfig,
}

impl GeminiJudge {
    /// Create a new judge, reading the API key from the configured
    /// environment variable.
    pub fn new(config: GeminiConfig) -> Result<Self, JudgeError> {
        let api_key = std::env::var(&config.api_key_env).map_err(|_| JudgeError::MissingApiKey {
            env_var: config.api_key_env.clone(),
        })?;
        Self::with_api_key(api_key, config)
    }

    /// Create a judge with an explicit API key
    pub fn with_api_key(api_key: String, config: GeminiConfig) -> Result<Self, JudgeError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, api_key, config })
    }

    /// Build the request body for the generateContent endpoint
    fn build_request(&self, system_prompt: &str, user_prompt: &str) -> Value {
        json!({
            "system_instruction": {
                "parts": [{ "text": system_prompt }]
            },
            "contents": [{
                "role": "user",
                "parts": [{ "text": user_prompt }]
            }],
            "generationConfig": {
                "temperature": 0.0,
                "maxOutputTokens": self.config.max_tokens,
                "responseMimeType": "application/json"
            }
        })
    }

    /// Send one prompt and return the reply text.
    async fn send(&self, system_prompt: &str, user_prompt: &str) -> Result<String, JudgeError> {
        let url = format!("{}/{}:generateContent", GEMINI_API_URL, self.config.model);
        let body = self.build_request(system_prompt, user_prompt);

        let request = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send();

        let response = tokio::time::timeout(self.config.timeout, request)
            .await
            .map_err(|_| JudgeError::Timeout(self.config.timeout))??;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(JudgeError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let payload: Value = response.json().await?;
        parse_reply_text(&payload)
    }
}

/// Pull the reply text out of a generateContent response body.
fn parse_reply_text(payload: &Value) -> Result<String, JudgeError> {
    payload["candidates"]
        .as_array()
        .and_then(|candidates| candidates.first())
        .and_then(|candidate| candidate["content"]["parts"].as_array())
        .and_then(|parts| parts.first())
        .and_then(|part| part["text"].as_str())
        .map(str::to_string)
        .ok_or_else(|| JudgeError::InvalidResponse("no text in response".to_string()))
}

#[async_trait]
impl RelevanceJudge for GeminiJudge {
    async fn classify(&self, record: &Record, criteria: &Criteria) -> Result<Classification, JudgeError> {
        let prompt = build_classify_prompt(record, criteria);
        let reply = self.send(CLASSIFY_SYSTEM_PROMPT, &prompt).await?;

        let parsed: Classification = serde_json::from_str(extract_json(&reply))?;
        // Re-clamp: the model is not trusted to stay within [0, 1]
        Ok(Classification::new(parsed.relevance, parsed.confidence, parsed.reasoning))
    }

    async fn optimize_query(
        &self,
        query: &str,
        false_positives: &[Record],
    ) -> Result<QuerySuggestion, JudgeError> {
        let prompt = build_optimize_prompt(query, false_positives);
        let reply = self.send(OPTIMIZE_SYSTEM_PROMPT, &prompt).await?;

        let suggestion: QuerySuggestion = serde_json::from_str(extract_json(&reply))?;
        if suggestion.new_query.trim().is_empty() {
            return Err(JudgeError::InvalidResponse("empty new_query in suggestion".to_string()));
        }
        Ok(suggestion)
    }
}
