//! Start the Kiosk Queue server.

use clap::Args;

use kiosk_core::error::AppError;

use crate::output;

/// Arguments for the serve command
#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Override the server port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Override the server host
    #[arg(long)]
    pub host: Option<String>,

    /// Skip database migrations on startup
    #[arg(long)]
    pub no_migrate: bool,
}

/// Execute the serve command
pub async fn execute(args: &ServeArgs, config_path: &str) -> Result<(), AppError> {
    let mut config = super::load_config(config_path)?;

    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(ref host) = args.host {
        config.server.host = host.clone();
    }

    println!("Starting Kiosk Queue server...");
    output::print_kv("Host", &config.server.host);
    output::print_kv("Port", &config.server.port.to_string());
    output::print_kv("Prefix", &config.server.url_prefix);
    output::print_kv("Lines", &config.queue.line_count.to_string());

    kiosk_api::run_server(config, !args.no_migrate).await
}
