//! Gemini generative-language API client.
//!
//! Only the two calls the relay needs are implemented: `models.list` and
//! `models.generateContent`. Responses are decoded regardless of HTTP status
//! because Gemini reports failures as an `error` object in the body; the
//! relay decides what a response means.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Gemini API base URL.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

pub const DEFAULT_MODEL: &str = "gemini-pro";

#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Built through `transport` so the request URL, which carries the
    /// API key, never reaches the message.
    #[error("failed to reach the Gemini API: {0}")]
    Transport(reqwest::Error),

    #[error("invalid JSON from the Gemini API ({status}): {source}")]
    Decode {
        status: u16,
        #[source]
        source: serde_json::Error,
    },
}

/// The outbound side of the relay. `GeminiClient` is the real implementation;
/// tests substitute their own.
#[async_trait]
pub trait Upstream: Send + Sync {
    async fn generate_content(
        &self,
        api_key: &str,
        prompt: &str,
    ) -> Result<GenerateContentResponse, UpstreamError>;

    async fn list_models(&self, api_key: &str) -> Result<ListModelsResponse, UpstreamError>;
}

#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: Client,
    base_url: String,
    model: String,
}

impl GeminiClient {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
        }
    }

    fn generate_url(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    fn models_url(&self) -> String {
        format!("{}/models", self.base_url)
    }
}

#[async_trait]
impl Upstream for GeminiClient {
    async fn generate_content(
        &self,
        api_key: &str,
        prompt: &str,
    ) -> Result<GenerateContentResponse, UpstreamError> {
        let request = GenerateContentRequest::from_prompt(prompt);

        tracing::debug!(
            model = %self.model,
            prompt_len = prompt.len(),
            "Sending generateContent request to Gemini API"
        );

        let response = self
            .http
            .post(self.generate_url())
            .query(&[("key", api_key)])
            .json(&request)
            .send()
            .await
            .map_err(transport)?;

        decode(response).await
    }

    async fn list_models(&self, api_key: &str) -> Result<ListModelsResponse, UpstreamError> {
        tracing::debug!("Sending models.list request to Gemini API");

        let response = self
            .http
            .get(self.models_url())
            .query(&[("key", api_key)])
            .send()
            .await
            .map_err(transport)?;

        let status = response.status().as_u16();
        let raw: Value = decode(response).await?;
        ListModelsResponse::from_value(raw).map_err(|source| UpstreamError::Decode { status, source })
    }
}

fn transport(err: reqwest::Error) -> UpstreamError {
    UpstreamError::Transport(err.without_url())
}

async fn decode<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, UpstreamError> {
    let status = response.status().as_u16();
    let body = response.bytes().await.map_err(transport)?;
    serde_json::from_slice(&body).map_err(|source| UpstreamError::Decode { status, source })
}

// ============================================================================
// Gemini API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
}

impl GenerateContentRequest {
    pub fn from_prompt(prompt: &str) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Option<Vec<Candidate>>,
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
    #[serde(default)]
    pub error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

impl Candidate {
    /// Text of the first part, if the candidate carries any.
    pub fn text(&self) -> Option<&str> {
        self.content
            .as_ref()?
            .parts
            .first()?
            .text
            .as_deref()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    #[serde(default)]
    pub block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListModelsResponse {
    #[serde(default)]
    pub models: Vec<ModelInfo>,
    #[serde(default)]
    pub error: Option<ApiError>,
    /// The body exactly as received, unknown fields included.
    #[serde(skip)]
    pub raw: Value,
}

impl ListModelsResponse {
    pub fn from_value(raw: Value) -> Result<Self, serde_json::Error> {
        let mut parsed: Self = serde_json::from_value(raw.clone())?;
        parsed.raw = raw;
        Ok(parsed)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfo {
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub code: Option<u16>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_wraps_prompt_in_contents_parts() {
        let value = serde_json::to_value(GenerateContentRequest::from_prompt("hello")).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"contents":[{"parts":[{"text":"hello"}]}]})
        );
    }

    #[test]
    fn parses_candidate_text() {
        let raw = r#"{"candidates":[{"content":{"parts":[{"text":"hi there"}],"role":"model"},"finishReason":"STOP"}]}"#;
        let parsed: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        let candidates = parsed.candidates.unwrap();
        assert_eq!(candidates[0].text(), Some("hi there"));
        assert_eq!(candidates[0].finish_reason.as_deref(), Some("STOP"));
    }

    #[test]
    fn parses_block_reason_without_candidates() {
        let raw = r#"{"promptFeedback":{"blockReason":"SAFETY","safetyRatings":[]}}"#;
        let parsed: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        assert!(parsed.candidates.is_none());
        assert_eq!(
            parsed.prompt_feedback.unwrap().block_reason.as_deref(),
            Some("SAFETY")
        );
    }

    #[test]
    fn parses_error_object() {
        let raw = r#"{"error":{"code":400,"message":"API key not valid.","status":"INVALID_ARGUMENT"}}"#;
        let parsed: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        let error = parsed.error.unwrap();
        assert_eq!(error.code, Some(400));
        assert_eq!(error.message, "API key not valid.");
    }

    #[test]
    fn model_listing_keeps_raw_body() {
        let raw = serde_json::json!({"models": [{"name": "m1"}], "nextPageToken": "abc"});
        let parsed = ListModelsResponse::from_value(raw.clone()).unwrap();
        assert_eq!(parsed.models[0].name, "m1");
        assert_eq!(parsed.raw, raw);
    }

    #[tokio::test]
    async fn transport_error_hides_request_url() {
        let client = GeminiClient::new("http://127.0.0.1:1/v1beta", "gemini-pro");
        let err = client
            .generate_content("very-secret-key", "hello")
            .await
            .unwrap_err();

        assert!(matches!(err, UpstreamError::Transport(_)));
        let text = err.to_string();
        assert!(!text.contains("very-secret-key"), "{text}");
        assert!(!text.contains("key="), "{text}");
    }

    #[test]
    fn urls_use_model_and_trimmed_base() {
        let client = GeminiClient::new("http://localhost:9000/v1beta/", "gemini-pro");
        assert_eq!(
            client.generate_url(),
            "http://localhost:9000/v1beta/models/gemini-pro:generateContent"
        );
        assert_eq!(client.models_url(), "http://localhost:9000/v1beta/models");
    }
}
