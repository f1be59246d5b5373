//! prompt-relay: forwards browser prompts to the Gemini API.
//!
//! The handler core lives in [`relay`]; [`api`] serves it over HTTP and
//! [`netlify`] wraps it in a function-style event/response shape.

pub mod api;
pub mod config;
pub mod error;
pub mod gemini;
pub mod netlify;
pub mod relay;

use std::sync::Arc;

use axum::Router;

use config::AppConfig;
use gemini::GeminiClient;
use relay::PromptRelay;

pub struct AppState {
    pub relay: PromptRelay,
}

impl AppState {
    pub fn from_config(config: &AppConfig) -> Arc<Self> {
        Arc::new(Self {
            relay: relay_from_config(config),
        })
    }
}

pub fn relay_from_config(config: &AppConfig) -> PromptRelay {
    let upstream = GeminiClient::new(&config.gemini_base_url, &config.gemini_model);
    PromptRelay::new(config.gemini_api_key.clone(), Arc::new(upstream))
}

/// `RUST_LOG` wins over the filter derived from `--verbose`.
pub fn init_tracing(config: &AppConfig) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter().into()),
        )
        .with_target(true)
        .init();
}

pub fn build_app(state: Arc<AppState>) -> Router {
    api::router(state)
}

pub async fn run_server(app: Router, port: u16) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    tracing::info!(addr = %listener.local_addr()?, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
