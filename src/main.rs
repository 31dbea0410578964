//! Kiosk Queue server.
//!
//! Main entry point that loads configuration, installs logging and starts
//! the HTTP and WebSocket server.

use tracing_subscriber::{EnvFilter, fmt};

use kiosk_core::config::AppConfig;
use kiosk_core::error::AppError;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    tracing::info!("Starting Kiosk Queue v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = kiosk_api::run_server(config, true).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from file and environment
fn load_configuration() -> Result<AppConfig, AppError> {
    let config_path =
        std::env::var("KIOSK_CONFIG").unwrap_or_else(|_| "config/default".to_string());
    let env = std::env::var("KIOSK_ENV").unwrap_or_else(|_| "development".to_string());

    AppConfig::load(&config_path, &env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}
