//! Function-style adapter: an event value in, a `{statusCode, headers, body}`
//! value out, with the same CORS headers the HTTP server attaches.

use std::collections::BTreeMap;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use http::Method;
use serde::{Deserialize, Serialize};

use crate::api::{ReplyEnvelope, ALLOW_HEADERS, ALLOW_METHODS, ALLOW_ORIGIN};
use crate::relay::{PromptRelay, RelayReply};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetlifyEvent {
    pub http_method: String,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub is_base64_encoded: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetlifyResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

pub async fn handle_event(relay: &PromptRelay, event: NetlifyEvent) -> NetlifyResponse {
    // An unknown method still has to come back as 405, so fall back to one
    // the relay rejects.
    let method = Method::from_bytes(event.http_method.as_bytes()).unwrap_or(Method::TRACE);

    let body = match (event.body, event.is_base64_encoded) {
        (None, _) => Vec::new(),
        (Some(body), false) => body.into_bytes(),
        (Some(body), true) => STANDARD.decode(body.trim()).unwrap_or_default(),
    };

    let reply = relay.handle(&method, &body).await;
    to_response(reply)
}

fn to_response(reply: RelayReply) -> NetlifyResponse {
    let headers = BTreeMap::from([
        ("Access-Control-Allow-Origin".to_string(), ALLOW_ORIGIN.to_string()),
        ("Access-Control-Allow-Methods".to_string(), ALLOW_METHODS.to_string()),
        ("Access-Control-Allow-Headers".to_string(), ALLOW_HEADERS.to_string()),
        ("Content-Type".to_string(), "application/json".to_string()),
    ]);

    let envelope = ReplyEnvelope { reply: reply.reply };
    // Serializing a single string field cannot fail.
    let body = serde_json::to_string(&envelope).unwrap_or_default();

    NetlifyResponse {
        status_code: reply.status.as_u16(),
        headers,
        body,
    }
}
