use serde::{Deserialize, Serialize};

/// Every response body, success or failure.
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct ReplyEnvelope {
    pub reply: String,
}
