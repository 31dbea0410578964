//! Schema management commands.

use clap::Args;

use kiosk_core::config::StorageBackend;
use kiosk_core::error::AppError;
use kiosk_database::DatabasePool;
use kiosk_database::migration;

use crate::output;

/// Arguments for the reset command
#[derive(Debug, Args)]
pub struct ResetArgs {
    /// Skip confirmation prompt
    #[arg(long)]
    pub force: bool,
}

async fn connect(config_path: &str) -> Result<Option<DatabasePool>, AppError> {
    let config = super::load_config(config_path)?;
    if config.database.storage == StorageBackend::Memory {
        output::print_warning("database.storage is \"memory\"; nothing to migrate.");
        return Ok(None);
    }
    Ok(Some(DatabasePool::connect(&config.database).await?))
}

/// Run all pending migrations
pub async fn run(config_path: &str) -> Result<(), AppError> {
    let Some(db) = connect(config_path).await? else {
        return Ok(());
    };

    println!("Running database migrations...");
    migration::run_migrations(db.pool()).await?;
    db.close().await;
    output::print_success("All migrations applied successfully.");
    Ok(())
}

/// Drop the queue tables and re-run migrations
pub async fn reset(args: &ResetArgs, config_path: &str) -> Result<(), AppError> {
    if !args.force {
        let confirm = dialoguer::Confirm::new()
            .with_prompt("This will DROP every queue table and re-run migrations. Continue?")
            .default(false)
            .interact()
            .map_err(|e| AppError::internal(format!("Input error: {e}")))?;

        if !confirm {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let Some(db) = connect(config_path).await? else {
        return Ok(());
    };

    println!("Resetting database...");
    migration::reset_schema(db.pool()).await?;
    db.close().await;
    output::print_success("Database reset complete.");
    Ok(())
}
