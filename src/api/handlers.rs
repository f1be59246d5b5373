use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::relay::RelayReply;
use crate::AppState;

use super::models::ReplyEnvelope;

/// Accepts any method; the relay decides what is allowed.
pub async fn relay(State(state): State<Arc<AppState>>, method: Method, body: Bytes) -> Response {
    let reply = state.relay.handle(&method, &body).await;
    tracing::info!(%method, status = reply.status.as_u16(), "Relay request completed");
    reply.into_response()
}

pub async fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ReplyEnvelope {
            reply: "Not found".to_string(),
        }),
    )
        .into_response()
}

impl IntoResponse for RelayReply {
    fn into_response(self) -> Response {
        (self.status, Json(ReplyEnvelope { reply: self.reply })).into_response()
    }
}
