//! # kiosk-database
//!
//! PostgreSQL connection management, schema migrations and the
//! [`RegistrationStore`] implementations backing the queue.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

use std::sync::Arc;

use tracing::info;

use kiosk_core::config::{DatabaseConfig, StorageBackend};
use kiosk_core::result::AppResult;

pub use connection::DatabasePool;
pub use memory::MemoryRegistrationStore;
pub use repositories::PgRegistrationStore;
pub use store::{RegistrationStore, Removal, StoreSnapshot};

/// Open the configured registration store.
///
/// For PostgreSQL, pending migrations are applied first when `migrate` is set.
pub async fn open_store(
    config: &DatabaseConfig,
    migrate: bool,
) -> AppResult<Arc<dyn RegistrationStore>> {
    match config.storage {
        StorageBackend::Memory => {
            info!("Using in-memory registration store");
            Ok(Arc::new(MemoryRegistrationStore::new()))
        }
        StorageBackend::Postgres => {
            let db = DatabasePool::connect(config).await?;
            if migrate {
                migration::run_migrations(db.pool()).await?;
            }
            Ok(Arc::new(PgRegistrationStore::new(db.into_pool())))
        }
    }
}
