//! CLI command definitions and dispatch.

pub mod migrate;
pub mod queue;
pub mod serve;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use kiosk_core::config::{AppConfig, StorageBackend};
use kiosk_core::error::AppError;
use kiosk_engine::QueueContext;
use kiosk_realtime::NullBroadcaster;
use kiosk_service::{LogGateway, QueueService};

use crate::output::{self, OutputFormat};

/// Kiosk Queue: multi-lane waiting queue server and operator tools
#[derive(Debug, Parser)]
#[command(name = "kiosk", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the Kiosk Queue server
    Serve(serve::ServeArgs),
    /// Apply pending database migrations
    Migrate,
    /// Drop every queue table and re-run migrations
    Reset(migrate::ResetArgs),
    /// List the queue with full contact details
    List,
    /// Serve the next party on a line
    Next(queue::NextArgs),
    /// Remove a registration by id
    Remove(queue::RemoveArgs),
    /// Show current wait estimates
    Estimate(queue::EstimateArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        match &self.command {
            Commands::Serve(args) => serve::execute(args, &self.config).await,
            Commands::Migrate => migrate::run(&self.config).await,
            Commands::Reset(args) => migrate::reset(args, &self.config).await,
            Commands::List => queue::list(&self.config, self.format).await,
            Commands::Next(args) => queue::next(args, &self.config, self.format).await,
            Commands::Remove(args) => queue::remove(args, &self.config).await,
            Commands::Estimate(args) => queue::estimate(args, &self.config, self.format).await,
        }
    }
}

/// Helper: load configuration, overlaid by `config/{KIOSK_ENV}`
pub fn load_config(config_path: &str) -> Result<AppConfig, AppError> {
    let env = std::env::var("KIOSK_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(config_path, &env)
}

/// Helper: a queue service for one-shot operator commands.
///
/// There are no sockets to publish to and the process exits right after
/// the command, so broadcasts are dropped and notifications only logged.
pub async fn open_service(config: &AppConfig) -> Result<QueueService, AppError> {
    if config.database.storage == StorageBackend::Memory {
        output::print_warning("database.storage is \"memory\"; the queue starts empty every run.");
    }

    let store = kiosk_database::open_store(&config.database, false).await?;
    Ok(QueueService::new(
        QueueContext::from_config(&config.queue),
        store,
        Arc::new(NullBroadcaster),
        Arc::new(LogGateway),
    ))
}
