//! Gemini REST client
//!
//! Talks to the `generateContent` endpoint with a JSON response schema, so the
//! model's answer can be decoded straight into our types.

use crate::analysis::prompts;
use crate::analysis::{Analysis, AnalysisError, AnalysisProvider, NutritionFacts};
use crate::storage::{DomainEntries, MuscleLogPatch};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::time::Duration;

pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const DEFAULT_ANALYSIS_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_NUTRITION_MODEL: &str = "gemini-3-pro-preview";

/// Configuration for the Gemini client
#[derive(Debug, Clone, PartialEq)]
pub struct GeminiConfig {
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Model for weekly analysis and log parsing
    pub model: String,
    /// Model for nutrition lookups (messy text and brand names)
    pub nutrition_model: String,
    pub base_url: String,
    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,
    /// Maximum attempts per request
    pub max_retries: u32,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            model: DEFAULT_ANALYSIS_MODEL.to_string(),
            nutrition_model: DEFAULT_NUTRITION_MODEL.to_string(),
            base_url: GEMINI_API_BASE.to_string(),
            request_timeout_ms: 30_000,
            max_retries: 3,
        }
    }
}

/// Gemini `generateContent` client
pub struct GeminiClient {
    client: Client,
    config: GeminiConfig,
    api_key: String,
}

impl GeminiClient {
    /// Build a client, reading the key from `config.api_key_env`.
    ///
    /// Fails with [`AnalysisError::MissingApiKey`] before any request is made.
    pub fn from_env(config: GeminiConfig) -> Result<Self, AnalysisError> {
        let api_key = read_env_non_empty(&config.api_key_env)
            .ok_or_else(|| AnalysisError::MissingApiKey(config.api_key_env.clone()))?;
        Self::new(api_key, config)
    }

    pub fn new(api_key: String, config: GeminiConfig) -> Result<Self, AnalysisError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()?;

        Ok(Self {
            client,
            config,
            api_key,
        })
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    fn endpoint_url(&self, model: &str) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            model
        )
    }

    /// Ask `model` for JSON matching `schema`; `None` when it answered with nothing
    async fn generate<T: DeserializeOwned>(
        &self,
        model: &str,
        prompt: String,
        schema: Value,
    ) -> Result<Option<T>, AnalysisError> {
        let url = self.endpoint_url(model);
        let body = request_body(&prompt, schema);

        tracing::debug!(model, prompt_len = prompt.len(), "Sending generateContent request");
        let response = self.send_post(&url, &body).await?;

        let text = extract_text_part(&response)?;
        if text.trim().is_empty() {
            tracing::warn!(model, "Model returned an empty answer");
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(text)?))
    }

    /// POST with retries: exponential backoff, honouring Retry-After on 429
    async fn send_post(&self, url: &str, body: &Value) -> Result<Value, AnalysisError> {
        let mut last_error = AnalysisError::Unavailable;
        let mut server_delay = None;
        let cap = Duration::from_millis(self.config.request_timeout_ms);

        for attempt in 0..self.config.max_retries.max(1) {
            if attempt > 0 {
                let delay = retry_delay(attempt, server_delay.take(), cap);
                tracing::warn!(attempt, delay_ms = delay.as_millis() as u64, error = %last_error, "Retrying analysis request");
                tokio::time::sleep(delay).await;
            }

            let sent = self
                .client
                .post(url)
                .header("x-goog-api-key", &self.api_key)
                .json(body)
                .send()
                .await;

            let response = match sent {
                Ok(response) => response,
                Err(e) => {
                    last_error = classify_transport_error(e);
                    if last_error.is_retryable() {
                        continue;
                    }
                    return Err(last_error);
                }
            };

            let status = response.status();
            if status.is_success() {
                return Ok(response.json().await?);
            }

            if status == StatusCode::TOO_MANY_REQUESTS {
                server_delay = retry_after(response.headers());
                last_error = AnalysisError::RateLimited;
                continue;
            }

            let message = response.text().await.unwrap_or_default();
            last_error = AnalysisError::Api {
                status: status.as_u16(),
                message,
            };
            if !last_error.is_retryable() {
                return Err(last_error);
            }
        }

        Err(last_error)
    }
}

/// Seconds from a 429 `Retry-After` header
fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}

/// Pause before `attempt`: the server's hint capped at `cap`, else 1s, 4s, 9s...
fn retry_delay(attempt: u32, server_delay: Option<Duration>, cap: Duration) -> Duration {
    match server_delay {
        Some(delay) => delay.min(cap),
        None => Duration::from_secs(u64::from(attempt).pow(2)),
    }
}

#[async_trait]
impl AnalysisProvider for GeminiClient {
    async fn summarize(&self, entries: DomainEntries<'_>) -> Result<Analysis, AnalysisError> {
        let domain = entries.domain();
        let data = entries.to_json()?;
        tracing::info!(%domain, entries = entries.len(), "Requesting weekly analysis");

        let analysis = self
            .generate::<Analysis>(
                &self.config.model,
                prompts::analysis_prompt(domain, &data),
                prompts::analysis_schema(),
            )
            .await?;

        Ok(analysis.unwrap_or_else(|| Analysis {
            summary: prompts::empty_analysis_summary(domain).to_string(),
            tips: Vec::new(),
        }))
    }

    async fn lookup_nutrition(
        &self,
        food_description: &str,
    ) -> Result<NutritionFacts, AnalysisError> {
        let facts = self
            .generate::<NutritionFacts>(
                &self.config.nutrition_model,
                prompts::nutrition_prompt(food_description),
                prompts::nutrition_schema(),
            )
            .await?;
        Ok(facts.unwrap_or_default())
    }

    async fn parse_muscle_log(
        &self,
        text: &str,
        today: NaiveDate,
    ) -> Result<MuscleLogPatch, AnalysisError> {
        let mut patch = self
            .generate::<MuscleLogPatch>(
                &self.config.model,
                prompts::muscle_log_prompt(text, today),
                prompts::muscle_log_schema(),
            )
            .await?
            .unwrap_or_default();
        patch.date.get_or_insert(today);
        Ok(patch)
    }
}

fn request_body(prompt: &str, schema: Value) -> Value {
    json!({
        "contents": [
            { "parts": [ { "text": prompt } ] }
        ],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": schema
        }
    })
}

fn classify_transport_error(e: reqwest::Error) -> AnalysisError {
    if e.is_timeout() {
        AnalysisError::Timeout
    } else if e.is_connect() {
        AnalysisError::Unavailable
    } else {
        AnalysisError::Request(e)
    }
}

/// Pull `candidates[0].content.parts[0].text` out of a generateContent response
pub fn extract_text_part(response: &Value) -> Result<&str, AnalysisError> {
    response
        .get("candidates")
        .and_then(Value::as_array)
        .and_then(|candidates| candidates.first())
        .and_then(|candidate| candidate.get("content"))
        .and_then(|content| content.get("parts"))
        .and_then(Value::as_array)
        .and_then(|parts| parts.first())
        .and_then(|part| part.get("text"))
        .and_then(Value::as_str)
        .ok_or_else(|| {
            AnalysisError::InvalidResponse("missing candidates[0].content.parts[0].text".to_owned())
        })
}

fn read_env_non_empty(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_after_is_capped_and_replaces_backoff() {
        let cap = Duration::from_millis(30_000);

        assert_eq!(retry_delay(1, None, cap), Duration::from_secs(1));
        assert_eq!(retry_delay(3, None, cap), Duration::from_secs(9));
        assert_eq!(
            retry_delay(3, Some(Duration::from_secs(2)), cap),
            Duration::from_secs(2)
        );
        assert_eq!(retry_delay(1, Some(Duration::from_secs(3600)), cap), cap);
    }

    #[test]
    fn test_retry_after_header() {
        let mut headers = HeaderMap::new();
        assert_eq!(retry_after(&headers), None);

        headers.insert(RETRY_AFTER, "7".parse().unwrap());
        assert_eq!(retry_after(&headers), Some(Duration::from_secs(7)));

        headers.insert(RETRY_AFTER, "Wed, 21 Oct 2026 07:28:00 GMT".parse().unwrap());
        assert_eq!(retry_after(&headers), None);
    }

    #[test]
    fn test_default_config() {
        let config = GeminiConfig::default();
        assert_eq!(config.api_key_env, "GEMINI_API_KEY");
        assert_eq!(config.model, "gemini-2.5-flash");
        assert_eq!(config.nutrition_model, "gemini-3-pro-preview");
        assert_eq!(config.max_retries, 3);
    }

    #[test]
    fn test_missing_key_is_reported_before_any_request() {
        let config = GeminiConfig {
            api_key_env: "GROWTH_TEST_KEY_THAT_IS_NEVER_SET".to_string(),
            ..Default::default()
        };
        match GeminiClient::from_env(config) {
            Err(AnalysisError::MissingApiKey(env)) => {
                assert_eq!(env, "GROWTH_TEST_KEY_THAT_IS_NEVER_SET")
            }
            other => panic!("expected MissingApiKey, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_endpoint_url() {
        let client = GeminiClient::new(
            "k".to_string(),
            GeminiConfig {
                base_url: "http://localhost:9999/v1beta/".to_string(),
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(
            client.endpoint_url("gemini-2.5-flash"),
            "http://localhost:9999/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn test_request_body_shape() {
        let body = request_body("hello", prompts::analysis_schema());
        assert_eq!(body["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(
            body["generationConfig"]["responseSchema"]["properties"]["summary"]["type"],
            "STRING"
        );
    }

    #[test]
    fn test_extract_text_part() {
        let response = json!({
            "candidates": [
                { "content": { "parts": [ { "text": "{\"summary\":\"ok\",\"tips\":[]}" } ] } }
            ]
        });
        let text = extract_text_part(&response).unwrap();
        let analysis: Analysis = serde_json::from_str(text).unwrap();
        assert_eq!(analysis.summary, "ok");

        let empty = json!({ "candidates": [] });
        assert!(matches!(
            extract_text_part(&empty),
            Err(AnalysisError::InvalidResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_unreachable_service_fails_without_panicking() {
        let client = GeminiClient::new(
            "k".to_string(),
            GeminiConfig {
                base_url: "http://127.0.0.1:9".to_string(),
                request_timeout_ms: 500,
                max_retries: 1,
                ..Default::default()
            },
        )
        .unwrap();

        let logs = crate::storage::seed::mind_logs();
        let result = client.summarize(DomainEntries::Mind(&logs)).await;
        assert!(result.is_err());
    }
}
