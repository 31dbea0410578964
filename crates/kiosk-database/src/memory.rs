//! In-memory registration store for tests and single-node demos.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;

use kiosk_core::error::AppError;
use kiosk_core::result::AppResult;
use kiosk_core::types::id::RegistrationId;
use kiosk_entity::{LineStatus, QueueSummary, Registration};

use crate::store::{RegistrationStore, Removal, StoreSnapshot};

#[derive(Debug, Default)]
struct InnerState {
    registrations: Vec<Registration>,
    line_status: BTreeMap<u32, DateTime<Utc>>,
    summary: Option<QueueSummary>,
}

impl InnerState {
    fn ordered(&self) -> Vec<Registration> {
        let mut out = self.registrations.clone();
        out.sort_by_key(|r| (r.line, r.depth));
        out
    }

    fn statuses(&self) -> Vec<LineStatus> {
        self.line_status
            .iter()
            .map(|(&line_number, &last_admitted_time)| LineStatus {
                line_number,
                last_admitted_time,
            })
            .collect()
    }
}

/// Registration store held in process memory behind a Tokio `RwLock`.
///
/// Contents are lost on restart.
#[derive(Debug, Clone, Default)]
pub struct MemoryRegistrationStore {
    state: Arc<RwLock<InnerState>>,
}

impl MemoryRegistrationStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RegistrationStore for MemoryRegistrationStore {
    async fn create(&self, registration: &Registration) -> AppResult<RegistrationId> {
        let mut state = self.state.write().await;
        if state.registrations.iter().any(|r| r.id == registration.id) {
            return Err(AppError::database(format!(
                "Registration {} already exists",
                registration.id
            )));
        }
        state.registrations.push(registration.clone());
        Ok(registration.id)
    }

    async fn list(&self) -> AppResult<Vec<Registration>> {
        Ok(self.state.read().await.ordered())
    }

    async fn find(&self, id: RegistrationId) -> AppResult<Option<Registration>> {
        let state = self.state.read().await;
        Ok(state.registrations.iter().find(|r| r.id == id).cloned())
    }

    async fn find_by_contact(&self, address: &str) -> AppResult<Option<Registration>> {
        let state = self.state.read().await;
        Ok(state
            .registrations
            .iter()
            .filter(|r| r.contact.matches(address))
            .min_by_key(|r| (r.depth, r.line))
            .cloned())
    }

    async fn delete(&self, id: RegistrationId) -> AppResult<bool> {
        let mut state = self.state.write().await;
        let before = state.registrations.len();
        state.registrations.retain(|r| r.id != id);
        Ok(state.registrations.len() < before)
    }

    async fn update_depth(&self, id: RegistrationId, depth: u32) -> AppResult<()> {
        let mut state = self.state.write().await;
        let reg = state
            .registrations
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| AppError::not_found(format!("Registration {id} not found")))?;
        reg.depth = depth;
        Ok(())
    }

    async fn apply_removal(&self, removal: &Removal) -> AppResult<bool> {
        let mut state = self.state.write().await;
        let Some(index) = state.registrations.iter().position(|r| r.id == removal.id) else {
            return Ok(false);
        };
        state.registrations.remove(index);

        for (id, depth) in &removal.depth_updates {
            if let Some(reg) = state.registrations.iter_mut().find(|r| r.id == *id) {
                reg.depth = *depth;
            }
        }
        for line in &removal.admitted_lines {
            state.line_status.insert(*line, removal.admitted_at);
        }

        debug!(
            registration_id = %removal.id,
            moved = removal.depth_updates.len(),
            "Applied removal"
        );
        Ok(true)
    }

    async fn line_statuses(&self) -> AppResult<Vec<LineStatus>> {
        Ok(self.state.read().await.statuses())
    }

    async fn snapshot(&self) -> AppResult<StoreSnapshot> {
        let state = self.state.read().await;
        Ok(StoreSnapshot {
            registrations: state.ordered(),
            line_statuses: state.statuses(),
        })
    }

    async fn save_summary(&self, wait_time: u32) -> AppResult<()> {
        self.state.write().await.summary = Some(QueueSummary {
            wait_time,
            updated_at: Utc::now(),
        });
        Ok(())
    }

    async fn load_summary(&self) -> AppResult<QueueSummary> {
        Ok(self.state.read().await.summary.clone().unwrap_or_default())
    }

    async fn clear(&self) -> AppResult<()> {
        *self.state.write().await = InnerState::default();
        Ok(())
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}
