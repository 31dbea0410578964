//! Persistence contract for queue state.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use kiosk_core::result::AppResult;
use kiosk_core::types::id::RegistrationId;
use kiosk_entity::{LineStatus, QueueSummary, Registration};

/// A departure committed as one unit: the delete, every resulting depth
/// change, and the line timestamps it advances.
#[derive(Debug, Clone)]
pub struct Removal {
    /// Registration leaving the queue.
    pub id: RegistrationId,
    /// New depths for registrations that moved up.
    pub depth_updates: Vec<(RegistrationId, u32)>,
    /// Lines whose `last_admitted_time` advances.
    pub admitted_lines: Vec<u32>,
    /// Timestamp written to `admitted_lines`.
    pub admitted_at: DateTime<Utc>,
}

/// Registrations and line timestamps read together.
#[derive(Debug, Clone, Default)]
pub struct StoreSnapshot {
    /// Ordered by (line, depth).
    pub registrations: Vec<Registration>,
    /// Sparse; missing lines have never admitted anyone.
    pub line_statuses: Vec<LineStatus>,
}

/// Storage for registrations, line timestamps and the wait summary.
///
/// Callers serialize writes; implementations only need to make
/// [`RegistrationStore::apply_removal`] atomic.
#[async_trait]
pub trait RegistrationStore: Send + Sync + std::fmt::Debug {
    /// Insert a new registration.
    async fn create(&self, registration: &Registration) -> AppResult<RegistrationId>;

    /// Every registration ordered by (line, depth).
    async fn list(&self) -> AppResult<Vec<Registration>>;

    /// Look up a registration by id.
    async fn find(&self, id: RegistrationId) -> AppResult<Option<Registration>>;

    /// First registration (by depth, then line) whose phone or email matches.
    async fn find_by_contact(&self, address: &str) -> AppResult<Option<Registration>>;

    /// Delete a registration. Returns `false` if it did not exist.
    async fn delete(&self, id: RegistrationId) -> AppResult<bool>;

    /// Set a registration's depth.
    async fn update_depth(&self, id: RegistrationId, depth: u32) -> AppResult<()>;

    /// Commit a removal atomically. Returns `false`, changing nothing, if
    /// the registration was already gone.
    async fn apply_removal(&self, removal: &Removal) -> AppResult<bool>;

    /// Stored line timestamps.
    async fn line_statuses(&self) -> AppResult<Vec<LineStatus>>;

    /// Registrations and line timestamps from one consistent read.
    async fn snapshot(&self) -> AppResult<StoreSnapshot> {
        Ok(StoreSnapshot {
            registrations: self.list().await?,
            line_statuses: self.line_statuses().await?,
        })
    }

    /// Persist the informational wait time.
    async fn save_summary(&self, wait_time: u32) -> AppResult<()>;

    /// Last persisted wait time, zero if never saved.
    async fn load_summary(&self) -> AppResult<QueueSummary>;

    /// Drop every registration, line timestamp and summary.
    async fn clear(&self) -> AppResult<()>;

    /// Returns `true` if the backend is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}
