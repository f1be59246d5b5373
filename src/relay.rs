//! Host-independent request handling.
//!
//! Adapters hand over the request method and raw body; the relay returns a
//! status and reply text. CORS headers are the adapter's job.

use std::sync::Arc;

use http::{Method, StatusCode};
use serde::{Deserialize, Serialize};

use crate::error::{RelayError, Result};
use crate::gemini::{ApiError, GenerateContentResponse, ListModelsResponse, Upstream};

pub const PREFLIGHT_REPLY: &str = "CORS preflight OK";

const LIST_MODELS_COMMAND: &str = "list models";

/// Used when the upstream error object carries no message.
const INVALID_RESPONSE: &str = "Invalid response from API.";

/// Outcome of one relayed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayReply {
    pub status: StatusCode,
    pub reply: String,
}

impl RelayReply {
    pub fn ok(reply: impl Into<String>) -> Self {
        Self {
            status: StatusCode::OK,
            reply: reply.into(),
        }
    }
}

impl From<RelayError> for RelayReply {
    fn from(err: RelayError) -> Self {
        Self {
            status: err.status(),
            reply: err.to_string(),
        }
    }
}

/// Inbound body. A non-string `prompt` fails to parse and is treated the
/// same as a missing one.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct PromptRequest {
    #[serde(default)]
    pub prompt: Option<String>,
}

#[derive(Clone)]
pub struct PromptRelay {
    api_key: Option<String>,
    upstream: Arc<dyn Upstream>,
}

impl PromptRelay {
    /// An empty key counts as no key.
    pub fn new(api_key: Option<String>, upstream: Arc<dyn Upstream>) -> Self {
        Self {
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            upstream,
        }
    }

    pub async fn handle(&self, method: &Method, body: &[u8]) -> RelayReply {
        match self.dispatch(method, body).await {
            Ok(reply) => reply,
            Err(err) => {
                match &err {
                    RelayError::MissingApiKey | RelayError::Server(_) | RelayError::Upstream(_) => {
                        tracing::error!(%method, error = %err, "Relay request failed")
                    }
                    _ => tracing::warn!(%method, error = %err, "Relay request rejected"),
                }
                err.into()
            }
        }
    }

    async fn dispatch(&self, method: &Method, body: &[u8]) -> Result<RelayReply> {
        if method == Method::OPTIONS {
            return Ok(RelayReply::ok(PREFLIGHT_REPLY));
        }
        if method != Method::POST {
            return Err(RelayError::MethodNotAllowed);
        }

        let api_key = self.api_key.as_deref().ok_or(RelayError::MissingApiKey)?;
        let prompt = parse_prompt(body)?;

        if is_list_models(&prompt) {
            tracing::info!("Listing upstream models");
            let models = self.upstream.list_models(api_key).await?;
            return format_models(models).map(RelayReply::ok);
        }

        tracing::info!(prompt_len = prompt.len(), "Relaying prompt");
        let response = self.upstream.generate_content(api_key, &prompt).await?;
        classify(response).map(RelayReply::ok)
    }
}

fn parse_prompt(body: &[u8]) -> Result<String> {
    let parsed: PromptRequest =
        serde_json::from_slice(body).map_err(|_| RelayError::MissingPrompt)?;

    parsed
        .prompt
        .filter(|prompt| !prompt.trim().is_empty())
        .ok_or(RelayError::MissingPrompt)
}

fn is_list_models(prompt: &str) -> bool {
    prompt.trim().eq_ignore_ascii_case(LIST_MODELS_COMMAND)
}

fn rejection(error: ApiError) -> RelayError {
    if error.message.trim().is_empty() {
        RelayError::Upstream(INVALID_RESPONSE.to_string())
    } else {
        RelayError::Upstream(error.message)
    }
}

/// Turns a generateContent response into reply text or the matching error.
pub fn classify(response: GenerateContentResponse) -> Result<String> {
    if let Some(error) = response.error {
        return Err(rejection(error));
    }

    let first = match response.candidates.as_deref() {
        Some([first, ..]) => first,
        _ => {
            let reason = response
                .prompt_feedback
                .and_then(|feedback| feedback.block_reason);
            return Err(match reason {
                Some(reason) => RelayError::Blocked(reason),
                None => RelayError::NoCandidates,
            });
        }
    };

    first
        .text()
        .map(str::to_string)
        .ok_or_else(|| RelayError::Server("candidate has no text content".to_string()))
}

/// Renders a models listing as a bulleted, newline-separated list.
pub fn format_models(response: ListModelsResponse) -> Result<String> {
    if let Some(error) = response.error {
        return Err(rejection(error));
    }

    if response.models.is_empty() {
        return Ok(format!(
            "Could not retrieve any models. Response: {}",
            response.raw
        ));
    }

    let mut listing = String::from("Available Models:\n");
    for model in &response.models {
        listing.push_str("- ");
        listing.push_str(&model.name);
        listing.push('\n');
    }
    Ok(listing)
}
