//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use kiosk_core::config::AppConfig;
use kiosk_realtime::RealtimeEngine;
use kiosk_service::QueueService;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Queue lifecycle coordinator
    pub service: Arc<QueueService>,
    /// WebSocket realtime engine
    pub realtime: Arc<RealtimeEngine>,
    /// Process start, for uptime reporting
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// Bundle already-constructed collaborators.
    pub fn new(
        config: AppConfig,
        service: Arc<QueueService>,
        realtime: Arc<RealtimeEngine>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            service,
            realtime,
            started_at: Utc::now(),
        }
    }
}
