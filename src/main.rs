use clap::Parser;
use tracing::info;

use prompt_relay::{build_app, config::AppConfig, init_tracing, run_server, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::parse();
    init_tracing(&config);

    info!(
        model = %config.gemini_model,
        api_key_configured = config.gemini_api_key.is_some(),
        "prompt-relay v{}",
        env!("CARGO_PKG_VERSION")
    );

    let app = build_app(AppState::from_config(&config));
    run_server(app, config.port).await?;

    Ok(())
}
