//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod admin;
pub mod app;
pub mod database;
pub mod logging;
pub mod notification;
pub mod queue;
pub mod realtime;

use serde::{Deserialize, Serialize};

pub use self::admin::AdminConfig;
pub use self::app::{CorsConfig, ServerConfig};
pub use self::database::{DatabaseConfig, StorageBackend};
pub use self::logging::LoggingConfig;
pub use self::notification::{NotificationConfig, TwilioConfig};
pub use self::queue::QueueConfig;
pub use self::realtime::RealtimeConfig;

use crate::error::AppError;

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database connection settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Line geometry and timing.
    #[serde(default)]
    pub queue: QueueConfig,
    /// Admin secret.
    #[serde(default)]
    pub admin: AdminConfig,
    /// Outbound notification settings.
    #[serde(default)]
    pub notification: NotificationConfig,
    /// Real-time WebSocket settings.
    #[serde(default)]
    pub realtime: RealtimeConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// `path` names the base file (extension optional). It is merged with
    /// `config/{env}` and environment variables prefixed with `KIOSK__`.
    pub fn load(path: &str, env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("KIOSK")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let config: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Reject settings the queue engine cannot run with.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.queue.line_count == 0 {
            return Err(AppError::configuration("queue.line_count must be positive"));
        }
        if self.queue.search_cap == 0 {
            return Err(AppError::configuration("queue.search_cap must be positive"));
        }
        if self.database.storage == StorageBackend::Postgres && self.database.url.is_empty() {
            return Err(AppError::configuration(
                "database.url is required when database.storage = \"postgres\"",
            ));
        }
        Ok(())
    }
}
