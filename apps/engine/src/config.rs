use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Engine configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    /// Root directory for branding assets; logos live under `<assets_dir>/logos/`.
    pub assets_dir: String,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            gemini_api_key: require_env("GEMINI_API_KEY")?,
            assets_dir: std::env::var("ASSETS_DIR").unwrap_or_else(|_| "static".to_string()),
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Initializes structured logging. Called once by the hosting binary before
/// any engine function; `RUST_LOG` overrides the configured default level.
pub fn init_logging(config: &Config) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            let target = env!("CARGO_PKG_NAME").replace('-', "_");
            EnvFilter::new(format!("{target}={}", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();
}
