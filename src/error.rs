use http::StatusCode;
use thiserror::Error;

use crate::gemini::UpstreamError;

/// Every way a relay request can fail. Each variant is terminal for the
/// request and maps to exactly one status code and reply text.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Method Not Allowed")]
    MethodNotAllowed,

    #[error("API key is not configured on the server.")]
    MissingApiKey,

    #[error("Prompt is missing from the request.")]
    MissingPrompt,

    #[error("Gemini API Error: {0}")]
    Upstream(String),

    #[error("Request was blocked by the Gemini API: {0}")]
    Blocked(String),

    #[error("Gemini API Error: no candidates were returned.")]
    NoCandidates,

    #[error("Server Error: {0}")]
    Server(String),
}

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::MissingPrompt | Self::Blocked(_) | Self::NoCandidates => StatusCode::BAD_REQUEST,
            Self::MissingApiKey | Self::Upstream(_) | Self::Server(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<UpstreamError> for RelayError {
    fn from(err: UpstreamError) -> Self {
        Self::Server(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RelayError>;
