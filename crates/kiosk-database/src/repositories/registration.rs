//! PostgreSQL registration store.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};

use kiosk_core::error::{AppError, ErrorKind};
use kiosk_core::result::AppResult;
use kiosk_core::types::id::RegistrationId;
use kiosk_entity::{LineStatus, QueueSummary, Registration};

use crate::store::{RegistrationStore, Removal, StoreSnapshot};

const SELECT_REGISTRATION: &str = "SELECT id, name, phone_number, email, email_consent, \
     party_size, line_number, place_in_queue, created_at FROM registrations";

/// Registration store over the `registrations`, `line_status` and
/// `queue_summary` tables.
#[derive(Debug, Clone)]
pub struct PgRegistrationStore {
    pool: PgPool,
}

impl PgRegistrationStore {
    /// Create a store over an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn begin(&self) -> AppResult<Transaction<'static, Postgres>> {
        self.pool
            .begin()
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e))
    }
}

fn db_int(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

fn db_err(message: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| AppError::with_source(ErrorKind::Database, message, e)
}

#[async_trait]
impl RegistrationStore for PgRegistrationStore {
    async fn create(&self, registration: &Registration) -> AppResult<RegistrationId> {
        sqlx::query(
            "INSERT INTO registrations \
             (id, name, phone_number, email, email_consent, party_size, line_number, place_in_queue, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(registration.id)
        .bind(&registration.name)
        .bind(&registration.contact.phone_number)
        .bind(&registration.contact.email)
        .bind(registration.contact.email_consent)
        .bind(db_int(registration.party_size))
        .bind(db_int(registration.line))
        .bind(db_int(registration.depth))
        .bind(registration.created_at)
        .execute(&self.pool)
        .await
        .map_err(db_err("Failed to create registration"))?;
        Ok(registration.id)
    }

    async fn list(&self) -> AppResult<Vec<Registration>> {
        sqlx::query_as::<_, Registration>(&format!(
            "{SELECT_REGISTRATION} ORDER BY line_number, place_in_queue"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(db_err("Failed to list registrations"))
    }

    async fn find(&self, id: RegistrationId) -> AppResult<Option<Registration>> {
        sqlx::query_as::<_, Registration>(&format!("{SELECT_REGISTRATION} WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err("Failed to find registration"))
    }

    async fn find_by_contact(&self, address: &str) -> AppResult<Option<Registration>> {
        let address = address.trim();
        if address.is_empty() {
            return Ok(None);
        }
        sqlx::query_as::<_, Registration>(&format!(
            "{SELECT_REGISTRATION} WHERE phone_number = $1 OR lower(email) = lower($1) \
             ORDER BY place_in_queue, line_number LIMIT 1"
        ))
        .bind(address)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err("Failed to find registration by contact"))
    }

    async fn delete(&self, id: RegistrationId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM registrations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err("Failed to delete registration"))?;
        Ok(result.rows_affected() > 0)
    }

    async fn update_depth(&self, id: RegistrationId, depth: u32) -> AppResult<()> {
        let result = sqlx::query("UPDATE registrations SET place_in_queue = $2 WHERE id = $1")
            .bind(id)
            .bind(db_int(depth))
            .execute(&self.pool)
            .await
            .map_err(db_err("Failed to update registration depth"))?;
        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Registration {id} not found")));
        }
        Ok(())
    }

    async fn apply_removal(&self, removal: &Removal) -> AppResult<bool> {
        let mut tx = self.begin().await?;

        let deleted = sqlx::query("DELETE FROM registrations WHERE id = $1")
            .bind(removal.id)
            .execute(&mut *tx)
            .await
            .map_err(db_err("Failed to delete registration"))?;
        if deleted.rows_affected() == 0 {
            tx.rollback()
                .await
                .map_err(db_err("Failed to roll back removal"))?;
            return Ok(false);
        }

        for (id, depth) in &removal.depth_updates {
            sqlx::query("UPDATE registrations SET place_in_queue = $2 WHERE id = $1")
                .bind(*id)
                .bind(db_int(*depth))
                .execute(&mut *tx)
                .await
                .map_err(db_err("Failed to compact registration depth"))?;
        }

        for line in &removal.admitted_lines {
            sqlx::query(
                "INSERT INTO line_status (line_number, last_admitted_time) VALUES ($1, $2) \
                 ON CONFLICT (line_number) DO UPDATE SET last_admitted_time = EXCLUDED.last_admitted_time",
            )
            .bind(db_int(*line))
            .bind(removal.admitted_at)
            .execute(&mut *tx)
            .await
            .map_err(db_err("Failed to update line status"))?;
        }

        tx.commit()
            .await
            .map_err(db_err("Failed to commit removal"))?;
        Ok(true)
    }

    async fn line_statuses(&self) -> AppResult<Vec<LineStatus>> {
        sqlx::query_as::<_, LineStatus>(
            "SELECT line_number, last_admitted_time FROM line_status ORDER BY line_number",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_err("Failed to load line status"))
    }

    async fn snapshot(&self) -> AppResult<StoreSnapshot> {
        let mut tx = self.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ READ ONLY")
            .execute(&mut *tx)
            .await
            .map_err(db_err("Failed to open snapshot"))?;

        let registrations = sqlx::query_as::<_, Registration>(&format!(
            "{SELECT_REGISTRATION} ORDER BY line_number, place_in_queue"
        ))
        .fetch_all(&mut *tx)
        .await
        .map_err(db_err("Failed to list registrations"))?;

        let line_statuses = sqlx::query_as::<_, LineStatus>(
            "SELECT line_number, last_admitted_time FROM line_status ORDER BY line_number",
        )
        .fetch_all(&mut *tx)
        .await
        .map_err(db_err("Failed to load line status"))?;

        tx.commit()
            .await
            .map_err(db_err("Failed to close snapshot"))?;

        Ok(StoreSnapshot {
            registrations,
            line_statuses,
        })
    }

    async fn save_summary(&self, wait_time: u32) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO queue_summary (id, wait_time, updated_at) VALUES (1, $1, NOW()) \
             ON CONFLICT (id) DO UPDATE SET wait_time = EXCLUDED.wait_time, updated_at = NOW()",
        )
        .bind(db_int(wait_time))
        .execute(&self.pool)
        .await
        .map_err(db_err("Failed to save queue summary"))?;
        Ok(())
    }

    async fn load_summary(&self) -> AppResult<QueueSummary> {
        let summary = sqlx::query_as::<_, QueueSummary>(
            "SELECT wait_time, updated_at FROM queue_summary WHERE id = 1",
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err("Failed to load queue summary"))?;
        Ok(summary.unwrap_or_default())
    }

    async fn clear(&self) -> AppResult<()> {
        let mut tx = self.begin().await?;
        for table in ["registrations", "line_status", "queue_summary"] {
            sqlx::query(&format!("DELETE FROM {table}"))
                .execute(&mut *tx)
                .await
                .map_err(db_err("Failed to clear queue tables"))?;
        }
        tx.commit()
            .await
            .map_err(db_err("Failed to commit clear"))?;
        Ok(())
    }

    async fn health_check(&self) -> AppResult<bool> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|v| v == 1)
            .map_err(db_err("Health check failed"))
    }
}
