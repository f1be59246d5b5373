use clap::Parser;

use crate::gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL};

/// Runtime configuration. Every option can also come from the environment,
/// which is how hosting platforms usually supply the API key.
#[derive(Parser, Debug, Clone)]
#[command(name = "prompt-relay", about = "CORS-enabled prompt relay for the Gemini API")]
pub struct AppConfig {
    /// HTTP listen port.
    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Gemini API key. The server starts without one, but every POST then fails.
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub gemini_api_key: Option<String>,

    /// Upstream model used for generateContent.
    #[arg(long, env = "GEMINI_MODEL", default_value = DEFAULT_MODEL)]
    pub gemini_model: String,

    #[arg(long, env = "GEMINI_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub gemini_base_url: String,

    /// Enable debug logging.
    #[arg(short, long)]
    pub verbose: bool,
}

impl AppConfig {
    pub fn log_filter(&self) -> &'static str {
        if self.verbose {
            "prompt_relay=debug,tower_http=debug"
        } else {
            "prompt_relay=info,tower_http=info"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let config = AppConfig::try_parse_from([
            "prompt-relay",
            "--port",
            "8080",
            "--gemini-api-key",
            "secret",
            "--gemini-model",
            "gemini-1.5-flash",
            "-v",
        ])
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.gemini_api_key.as_deref(), Some("secret"));
        assert_eq!(config.gemini_model, "gemini-1.5-flash");
        assert_eq!(config.log_filter(), "prompt_relay=debug,tower_http=debug");
    }
}
