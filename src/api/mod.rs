mod handlers;
mod models;

use std::sync::Arc;

use axum::{
    extract::Request,
    http::{header, HeaderValue},
    middleware::{self, Next},
    response::Response,
    routing::any,
    Router,
};
use tower_http::trace::TraceLayer;

use crate::AppState;

pub use handlers::{not_found, relay};
pub use models::ReplyEnvelope;

pub const ALLOW_ORIGIN: &str = "*";
pub const ALLOW_METHODS: &str = "POST, OPTIONS";
pub const ALLOW_HEADERS: &str = "Content-Type";

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/proxy", any(relay))
        .route("/.netlify/functions/proxy", any(relay))
        .fallback(not_found)
        .with_state(state)
        .layer(middleware::from_fn(cors_headers))
        .layer(TraceLayer::new_for_http())
}

/// Attaches the CORS headers to every response, errors and 404s included.
pub async fn cors_headers(req: Request, next: Next) -> Response {
    let mut response = next.run(req).await;
    let headers = response.headers_mut();

    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static(ALLOW_ORIGIN),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOW_METHODS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOW_HEADERS),
    );

    response
}
