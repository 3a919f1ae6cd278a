//! Gemini API client.
//!
//! All model traffic goes through [`GeminiClient::call`] (or the JSON-typed
//! wrapper [`GeminiClient::call_json`]) so retry, timeout, and token
//! accounting live in exactly one place. Transient upstream failures (429 and
//! 5xx) are retried with exponential backoff; everything else surfaces
//! immediately as [`LlmError::Api`].

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::errors::EngineError;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const MODEL: &str = "gemini-1.5-pro";
const MAX_RETRIES: u32 = 3;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(90);

// ────────────────────────────────────────────────────────────────────────────
// Errors
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Model API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Rate limited by the model API after {0} attempts")]
    RateLimited(u32),

    #[error("Model returned an empty response")]
    EmptyContent,

    #[error("Failed to parse model output: {0}")]
    Parse(String),
}

impl From<LlmError> for EngineError {
    fn from(e: LlmError) -> Self {
        EngineError::Llm(e.to_string())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Generation seam
// ────────────────────────────────────────────────────────────────────────────

/// The one seam the analysis layer talks through, so tests can substitute a
/// canned model.
#[async_trait]
pub trait GenerateText: Send + Sync {
    async fn generate(
        &self,
        system: &str,
        prompt: &str,
        temperature: f32,
    ) -> Result<String, LlmError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
}

impl GeminiClient {
    pub fn new(api_key: String) -> Result<Self, LlmError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(GeminiClient { http, api_key })
    }

    /// Sends one generation request and returns the raw text of the first
    /// candidate. Retries 429/5xx with exponential backoff (1s, 2s, 4s).
    pub async fn call(
        &self,
        system: &str,
        prompt: &str,
        temperature: f32,
    ) -> Result<String, LlmError> {
        let body = GenerateContentRequest::new(system, prompt, temperature);
        let url = format!("{GEMINI_API_BASE}/{MODEL}:generateContent");

        let mut attempt = 0;
        let response = loop {
            let response = self
                .http
                .post(&url)
                .header("x-goog-api-key", &self.api_key)
                .json(&body)
                .send()
                .await?;

            let status = response.status();
            if status.as_u16() == 429 || status.is_server_error() {
                attempt += 1;
                if attempt >= MAX_RETRIES {
                    return Err(LlmError::RateLimited(attempt));
                }
                let delay = Duration::from_secs(1 << (attempt - 1));
                tracing::warn!(
                    status = status.as_u16(),
                    attempt,
                    delay_s = delay.as_secs(),
                    "Transient model API failure, backing off"
                );
                tokio::time::sleep(delay).await;
                continue;
            }
            if !status.is_success() {
                let message = response.text().await.unwrap_or_default();
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message,
                });
            }
            break response;
        };

        let parsed: GenerateContentResponse = response.json().await?;
        if let Some(usage) = &parsed.usage_metadata {
            tracing::debug!(
                prompt_tokens = usage.prompt_token_count,
                output_tokens = usage.candidates_token_count,
                "Model call completed"
            );
        }

        parsed
            .candidates
            .into_iter()
            .filter_map(|c| c.content)
            .flat_map(|c| c.parts)
            .map(|p| p.text)
            .find(|t| !t.trim().is_empty())
            .ok_or(LlmError::EmptyContent)
    }

    /// [`call`](Self::call), then parses the output as JSON after stripping
    /// any markdown code fences the model wrapped it in.
    pub async fn call_json<T: DeserializeOwned>(
        &self,
        system: &str,
        prompt: &str,
        temperature: f32,
    ) -> Result<T, LlmError> {
        let raw = self.call(system, prompt, temperature).await?;
        serde_json::from_str(strip_json_fences(&raw)).map_err(|e| LlmError::Parse(e.to_string()))
    }
}

#[async_trait]
impl GenerateText for GeminiClient {
    async fn generate(
        &self,
        system: &str,
        prompt: &str,
        temperature: f32,
    ) -> Result<String, LlmError> {
        self.call(system, prompt, temperature).await
    }
}

/// Removes a leading ```` ```json ```` / ```` ``` ```` fence and the matching
/// closing fence. Models add these even when told not to.
pub fn strip_json_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let opened = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    let closed = opened.strip_suffix("```").unwrap_or(opened);
    closed.trim()
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

impl<'a> GenerateContentRequest<'a> {
    fn new(system: &'a str, prompt: &'a str, temperature: f32) -> Self {
        GenerateContentRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: system.to_string(),
                }],
            },
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature,
                response_mime_type: "application/json",
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    response_mime_type: &'static str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u64,
    #[serde(default)]
    candidates_token_count: u64,
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_fences_json_block() {
        let raw = "```json\n{\"a\": 1}\n```";
        assert_eq!(strip_json_fences(raw), "{\"a\": 1}");
    }

    #[test]
    fn test_strip_fences_bare_block() {
        let raw = "```\n{\"a\": 1}\n```";
        assert_eq!(strip_json_fences(raw), "{\"a\": 1}");
    }

    #[test]
    fn test_strip_fences_unfenced_passthrough() {
        assert_eq!(strip_json_fences("  {\"a\": 1}  "), "{\"a\": 1}");
    }

    #[test]
    fn test_request_serializes_camel_case() {
        let req = GenerateContentRequest::new("sys", "hello", 0.2);
        let json = serde_json::to_value(&req).unwrap();
        assert!(json.get("systemInstruction").is_some());
        assert!(json.get("generationConfig").is_some());
        assert_eq!(
            json["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hello");
    }

    #[test]
    fn test_response_parses_camel_case() {
        let raw = r#"{
            "candidates": [{"content": {"parts": [{"text": "hi"}]}}],
            "usageMetadata": {"promptTokenCount": 12, "candidatesTokenCount": 3}
        }"#;
        let parsed: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.candidates.len(), 1);
        assert_eq!(parsed.usage_metadata.unwrap().prompt_token_count, 12);
    }

    #[test]
    fn test_empty_candidates_parse_cleanly() {
        let parsed: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.candidates.is_empty());
    }
}
