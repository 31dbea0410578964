//! Schema migrations.

use sqlx::PgPool;
use tracing::{info, warn};

use kiosk_core::error::{AppError, ErrorKind};

/// Apply every pending migration.
pub async fn run_migrations(pool: &PgPool) -> Result<(), AppError> {
    info!("Running database migrations");

    sqlx::migrate!("../../migrations")
        .run(pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                format!("Failed to run migrations: {e}"),
                e,
            )
        })?;

    info!("Database migrations completed");
    Ok(())
}

/// Drop every queue table and rebuild the schema from scratch.
pub async fn reset_schema(pool: &PgPool) -> Result<(), AppError> {
    warn!("Dropping all queue tables");

    sqlx::query(
        "DROP TABLE IF EXISTS registrations, line_status, queue_summary, _sqlx_migrations CASCADE",
    )
    .execute(pool)
    .await
    .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to drop queue tables", e))?;

    run_migrations(pool).await
}
