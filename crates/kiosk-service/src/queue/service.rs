//! The lifecycle coordinator.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use kiosk_core::error::AppError;
use kiosk_core::result::AppResult;
use kiosk_core::types::id::RegistrationId;
use kiosk_database::{RegistrationStore, Removal};
use kiosk_engine::wait::{self, WaitDetail};
use kiosk_engine::{
    AdminEntry, PlacementError, PublicEntry, QueueContext, QueueSnapshot, QueueUpdate, compact,
    place,
};
use kiosk_entity::{Contact, NewRegistration, QueueSummary, Registration};
use kiosk_realtime::{Audience, OutboundMessage, QueueBroadcaster};

use super::outcome::{JoinOutcome, JoinRequest};
use crate::notification::{NotificationGateway, formatter};

/// Serializes queue mutations and fans out their side effects.
///
/// Reads go straight to the store and never wait on the writer lock.
#[derive(Debug)]
pub struct QueueService {
    ctx: QueueContext,
    store: Arc<dyn RegistrationStore>,
    broadcaster: Arc<dyn QueueBroadcaster>,
    notifier: Arc<dyn NotificationGateway>,
    writer: Mutex<()>,
}

impl QueueService {
    /// Creates a new queue service.
    pub fn new(
        ctx: QueueContext,
        store: Arc<dyn RegistrationStore>,
        broadcaster: Arc<dyn QueueBroadcaster>,
        notifier: Arc<dyn NotificationGateway>,
    ) -> Self {
        Self {
            ctx,
            store,
            broadcaster,
            notifier,
            writer: Mutex::new(()),
        }
    }

    /// Queue geometry in force.
    pub fn context(&self) -> &QueueContext {
        &self.ctx
    }

    /// Place a party and commit it.
    pub async fn join(&self, request: JoinRequest) -> AppResult<JoinOutcome> {
        let name = request.name.trim();
        if name.is_empty() {
            return Err(AppError::validation("Name is required"));
        }

        let guard = self.writer.lock().await;
        let snapshot = self.snapshot().await?;
        let placement = place(
            &self.ctx,
            &snapshot.occupancy(&self.ctx),
            request.party_size,
            request.requested_line,
        )
        .map_err(|e| self.placement_error(e))?;

        let registration = NewRegistration {
            name: name.to_string(),
            contact: request.contact,
            party_size: request.party_size,
            line: placement.line,
            depth: placement.depth,
        }
        .into_registration();
        self.store.create(&registration).await?;

        let wait_minutes = wait::eta_for_cell(
            &self.ctx,
            &snapshot.last_admitted,
            registration.line,
            registration.party_size,
            registration.depth,
            Utc::now(),
        );

        info!(
            registration_id = %registration.id,
            party_size = registration.party_size,
            line = registration.line,
            depth = registration.depth,
            wait_minutes,
            "Party joined queue"
        );

        drop(guard);
        self.republish().await;
        self.notify(
            registration.contact.clone(),
            formatter::joined(
                registration.party_size,
                registration.depth,
                registration.line,
                wait_minutes,
            ),
        );

        Ok(JoinOutcome {
            registration,
            wait_minutes,
        })
    }

    /// Admit the shallowest party whose span covers `line`.
    ///
    /// Returns the admitted registration, or `None` if nobody covers the line.
    pub async fn serve_next(&self, line: u32) -> AppResult<Option<Registration>> {
        if !self.ctx.contains_line(line) {
            return Err(AppError::validation(format!(
                "Line {line} is out of range (0..{})",
                self.ctx.line_count
            )));
        }

        let guard = self.writer.lock().await;
        let snapshot = self.snapshot().await?;
        let Some(target) = snapshot
            .registrations
            .iter()
            .filter(|r| r.covers(line))
            .min_by_key(|r| (r.depth, r.line))
            .cloned()
        else {
            debug!(line, "Nobody waiting on line");
            return Ok(None);
        };

        let admitted_lines = if target.depth == 1 {
            target.spanned_lines(self.ctx.line_count).collect()
        } else {
            Vec::new()
        };
        let Some(moved) = self
            .commit_removal(&snapshot, &target, admitted_lines)
            .await?
        else {
            return Ok(None);
        };

        info!(
            registration_id = %target.id,
            line,
            depth = target.depth,
            moved,
            "Party served"
        );

        drop(guard);
        self.republish().await;
        self.notify(target.contact.clone(), formatter::served().to_string());

        Ok(Some(target))
    }

    /// Remove a registration without admitting it.
    ///
    /// Unknown ids succeed and change nothing; returns whether anything was removed.
    pub async fn remove(&self, id: RegistrationId) -> AppResult<bool> {
        let guard = self.writer.lock().await;
        let snapshot = self.snapshot().await?;
        let Some(target) = snapshot.registrations.iter().find(|r| r.id == id).cloned() else {
            debug!(registration_id = %id, "Remove of unknown registration ignored");
            return Ok(false);
        };

        let Some(moved) = self.commit_removal(&snapshot, &target, Vec::new()).await? else {
            return Ok(false);
        };

        info!(
            registration_id = %id,
            depth = target.depth,
            moved,
            "Party removed"
        );

        drop(guard);
        self.republish().await;
        Ok(true)
    }

    /// Remove the registration reachable at `address` (phone or email).
    ///
    /// Returns whether a match was found.
    pub async fn cancel_by_contact(&self, address: &str) -> AppResult<bool> {
        let Some(registration) = self.store.find_by_contact(address).await? else {
            debug!("Cancel request matched no registration");
            return Ok(false);
        };
        self.remove(registration.id).await?;
        Ok(true)
    }

    /// Consistent read of the queue.
    pub async fn snapshot(&self) -> AppResult<QueueSnapshot> {
        let stored = self.store.snapshot().await?;
        Ok(QueueSnapshot::new(
            stored.registrations,
            &stored.line_statuses,
            self.ctx.line_count,
        ))
    }

    /// Wait estimates as of `now`.
    pub async fn wait_estimates(&self, now: DateTime<Utc>) -> AppResult<WaitDetail> {
        Ok(self.snapshot().await?.wait_detail(&self.ctx, now))
    }

    /// Best single-party wait as of the last committed mutation.
    pub async fn published_summary(&self) -> AppResult<QueueSummary> {
        self.store.load_summary().await
    }

    /// Redacted listing with estimates.
    pub async fn public_listing(&self) -> AppResult<QueueUpdate<PublicEntry>> {
        let snapshot = self.snapshot().await?;
        let detail = snapshot.wait_detail(&self.ctx, Utc::now());
        Ok(snapshot.public_update(&detail))
    }

    /// Full listing with estimates.
    pub async fn admin_listing(&self) -> AppResult<QueueUpdate<AdminEntry>> {
        let snapshot = self.snapshot().await?;
        let detail = snapshot.wait_detail(&self.ctx, Utc::now());
        Ok(snapshot.admin_update(&detail))
    }

    /// Returns `true` if the store is reachable.
    pub async fn health_check(&self) -> AppResult<bool> {
        self.store.health_check().await
    }

    /// Delete `target`, compact behind it and advance `admitted_lines`, all
    /// in one store commit. Returns the number of parties moved, or `None`
    /// if the store no longer had `target`.
    async fn commit_removal(
        &self,
        snapshot: &QueueSnapshot,
        target: &Registration,
        admitted_lines: Vec<u32>,
    ) -> AppResult<Option<usize>> {
        let remaining: Vec<Registration> = snapshot
            .registrations
            .iter()
            .filter(|r| r.id != target.id)
            .cloned()
            .collect();
        let plan = compact(&self.ctx, &remaining, target.depth);
        debug!(passes = plan.passes, moves = plan.moves.len(), "Compaction planned");

        let removal = Removal {
            id: target.id,
            depth_updates: plan.moves.iter().map(|m| (m.id, m.to)).collect(),
            admitted_lines,
            admitted_at: Utc::now(),
        };
        if !self.store.apply_removal(&removal).await? {
            debug!(registration_id = %target.id, "Registration already gone");
            return Ok(None);
        }
        Ok(Some(plan.moves.len()))
    }

    fn placement_error(&self, err: PlacementError) -> AppError {
        if err.is_validation() {
            return AppError::validation(err.to_string());
        }
        warn!(error = %err, "Placement search exhausted, queue may be fragmented");
        AppError::capacity("No available space in the queue for this party size.")
    }

    /// Recompute estimates, persist the summary and push both views.
    async fn republish(&self) {
        let snapshot = match self.snapshot().await {
            Ok(s) => s,
            Err(e) => {
                warn!(error = %e, "Failed to read queue for broadcast");
                return;
            }
        };
        let detail = snapshot.wait_detail(&self.ctx, Utc::now());

        if let Err(e) = self.store.save_summary(detail.best_single()).await {
            warn!(error = %e, "Failed to persist wait summary");
        }

        match OutboundMessage::queue_update(&snapshot.public_update(&detail)) {
            Ok(msg) => {
                self.broadcaster.publish(Audience::Public, msg).await;
            }
            Err(e) => warn!(error = %e, "Failed to build public queue update"),
        }
        match OutboundMessage::queue_update(&snapshot.admin_update(&detail)) {
            Ok(msg) => {
                self.broadcaster.publish(Audience::Admin, msg).await;
            }
            Err(e) => warn!(error = %e, "Failed to build admin queue update"),
        }
    }

    fn notify(&self, contact: Contact, message: String) {
        if contact.sms_target().is_none() {
            return;
        }
        let notifier = self.notifier.clone();
        tokio::spawn(async move {
            if let Err(e) = notifier.notify(&contact, &message).await {
                warn!(error = %e, "Notification failed");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex as StdMutex;

    use async_trait::async_trait;
    use kiosk_core::error::ErrorKind;
    use kiosk_database::MemoryRegistrationStore;

    #[derive(Debug, Default)]
    struct RecordingBroadcaster {
        frames: StdMutex<Vec<(Audience, serde_json::Value)>>,
    }

    #[async_trait]
    impl QueueBroadcaster for RecordingBroadcaster {
        async fn publish(&self, audience: Audience, message: OutboundMessage) -> usize {
            let json = serde_json::to_value(&message).unwrap();
            self.frames.lock().unwrap().push((audience, json));
            1
        }
    }

    #[derive(Debug, Default)]
    struct RecordingGateway {
        sent: StdMutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl NotificationGateway for RecordingGateway {
        async fn notify(&self, contact: &Contact, message: &str) -> AppResult<()> {
            self.sent.lock().unwrap().push((
                contact.sms_target().unwrap_or_default().to_string(),
                message.to_string(),
            ));
            Ok(())
        }
    }

    /// Parks the first publish until released.
    #[derive(Debug, Default)]
    struct StallingBroadcaster {
        calls: std::sync::atomic::AtomicUsize,
        release: tokio::sync::Notify,
    }

    #[async_trait]
    impl QueueBroadcaster for StallingBroadcaster {
        async fn publish(&self, _audience: Audience, _message: OutboundMessage) -> usize {
            if self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst) == 0 {
                self.release.notified().await;
            }
            1
        }
    }

    struct Harness {
        service: QueueService,
        store: Arc<MemoryRegistrationStore>,
        broadcaster: Arc<RecordingBroadcaster>,
        gateway: Arc<RecordingGateway>,
    }

    fn harness() -> Harness {
        let store = Arc::new(MemoryRegistrationStore::new());
        let broadcaster = Arc::new(RecordingBroadcaster::default());
        let gateway = Arc::new(RecordingGateway::default());
        let service = QueueService::new(
            QueueContext::new(3),
            store.clone(),
            broadcaster.clone(),
            gateway.clone(),
        );
        Harness {
            service,
            store,
            broadcaster,
            gateway,
        }
    }

    async fn settle() {
        for _ in 0..50 {
            tokio::task::yield_now().await;
        }
    }

    fn cell(outcome: &JoinOutcome) -> (u32, u32) {
        (outcome.registration.line, outcome.registration.depth)
    }

    #[tokio::test]
    async fn test_join_scenarios() {
        let h = harness();
        let a = h.service.join(JoinRequest::named("a")).await.unwrap();
        assert_eq!(cell(&a), (0, 1));
        let b = h.service.join(JoinRequest::named("b")).await.unwrap();
        assert_eq!(cell(&b), (1, 1));
        let pair = h
            .service
            .join(JoinRequest::named("pair").with_party_size(2))
            .await
            .unwrap();
        assert_eq!(cell(&pair), (0, 2));
    }

    #[tokio::test]
    async fn test_join_rejects_blank_name() {
        let h = harness();
        let err = h.service.join(JoinRequest::named("   ")).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(err.message, "Name is required");
        assert!(h.store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_join_rejects_oversized_party() {
        let h = harness();
        let err = h
            .service
            .join(JoinRequest::named("big").with_party_size(4))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert!(h.broadcaster.frames.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_exhausted_maps_to_capacity() {
        let store = Arc::new(MemoryRegistrationStore::new());
        let service = QueueService::new(
            QueueContext {
                search_cap: 1,
                ..QueueContext::new(1)
            },
            store.clone(),
            Arc::new(kiosk_realtime::NullBroadcaster),
            Arc::new(crate::LogGateway),
        );
        service.join(JoinRequest::named("a")).await.unwrap();
        let err = service.join(JoinRequest::named("b")).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Capacity);
        assert_eq!(
            err.message,
            "No available space in the queue for this party size."
        );
        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_serve_full_span_updates_every_line() {
        let h = harness();
        let all = h
            .service
            .join(JoinRequest::named("all").with_party_size(3))
            .await
            .unwrap();
        let served = h.service.serve_next(0).await.unwrap().unwrap();
        assert_eq!(served.id, all.registration.id);
        assert!(h.store.list().await.unwrap().is_empty());
        let statuses = h.store.line_statuses().await.unwrap();
        let lines: Vec<_> = statuses.iter().map(|s| s.line_number).collect();
        assert_eq!(lines, vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn test_serve_compacts_line() {
        let h = harness();
        for name in ["a", "b", "c", "d"] {
            h.service.join(JoinRequest::named(name).on_line(0)).await.unwrap();
        }
        h.service.serve_next(0).await.unwrap();
        let depths: Vec<_> = h
            .store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|r| (r.name, r.depth))
            .collect();
        assert_eq!(
            depths,
            vec![
                ("b".to_string(), 1),
                ("c".to_string(), 2),
                ("d".to_string(), 3)
            ]
        );
    }

    #[tokio::test]
    async fn test_serve_empty_line_is_noop() {
        let h = harness();
        assert!(h.service.serve_next(2).await.unwrap().is_none());
        assert!(h.broadcaster.frames.lock().unwrap().is_empty());
        let err = h.service.serve_next(3).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_remove_is_idempotent_and_never_admits() {
        let h = harness();
        let a = h.service.join(JoinRequest::named("a")).await.unwrap();
        assert!(h.service.remove(a.registration.id).await.unwrap());
        assert!(h.store.line_statuses().await.unwrap().is_empty());
        let frames_before = h.broadcaster.frames.lock().unwrap().len();
        assert!(!h.service.remove(a.registration.id).await.unwrap());
        assert_eq!(h.broadcaster.frames.lock().unwrap().len(), frames_before);
    }

    #[tokio::test]
    async fn test_cancel_by_contact() {
        let h = harness();
        let contact = Contact::new(Some("+15550100".to_string()), None, false);
        h.service
            .join(JoinRequest::named("a").with_contact(contact))
            .await
            .unwrap();
        assert!(!h.service.cancel_by_contact("+15550199").await.unwrap());
        assert!(h.service.cancel_by_contact("+15550100").await.unwrap());
        assert!(h.store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_broadcast_redacts_public_view() {
        let h = harness();
        h.service.join(JoinRequest::named("a").on_line(0)).await.unwrap();
        h.service.join(JoinRequest::named("b").on_line(0)).await.unwrap();
        let frames = h.broadcaster.frames.lock().unwrap();
        let (audience, public) = &frames[frames.len() - 2];
        assert_eq!(*audience, Audience::Public);
        assert_eq!(public["type"], "queue_update");
        assert_eq!(public["queue"][0]["name"], "a");
        assert!(public["queue"][1].get("name").is_none());
        let (audience, admin) = &frames[frames.len() - 1];
        assert_eq!(*audience, Audience::Admin);
        assert_eq!(admin["queue"][1]["name"], "b");
        assert_eq!(admin["wait_detail"]["per_line_single"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_notifications_sent_to_phone() {
        let h = harness();
        let contact = Contact::new(Some("+15550100".to_string()), None, false);
        h.service
            .join(JoinRequest::named("a").with_contact(contact))
            .await
            .unwrap();
        h.service.join(JoinRequest::named("quiet")).await.unwrap();
        h.service.serve_next(0).await.unwrap();
        settle().await;

        let sent = h.gateway.sent.lock().unwrap().clone();
        assert_eq!(sent.len(), 2);
        assert!(sent[0].1.starts_with("You are in the queue! Depth 1, starting line 1."));
        assert_eq!(sent[1], ("+15550100".to_string(), "You are next in the queue!".to_string()));
    }

    #[tokio::test]
    async fn test_summary_tracks_best_single_wait() {
        let h = harness();
        h.service.join(JoinRequest::named("a")).await.unwrap();
        // epoch timestamps make every estimate zero
        let summary = h.service.published_summary().await.unwrap();
        assert_eq!(summary.wait_time, 0);
        assert!(summary.updated_at > DateTime::<Utc>::UNIX_EPOCH);
        let detail = h.service.wait_estimates(Utc::now()).await.unwrap();
        assert_eq!(detail.per_line_single.len(), 3);
        assert!(!detail.per_span.contains_key(&4));
    }

    #[tokio::test]
    async fn test_writers_do_not_wait_on_broadcast() {
        let broadcaster = Arc::new(StallingBroadcaster::default());
        let store = Arc::new(MemoryRegistrationStore::new());
        let service = Arc::new(QueueService::new(
            QueueContext::new(3),
            store.clone(),
            broadcaster.clone(),
            Arc::new(crate::LogGateway),
        ));

        let first = tokio::spawn({
            let service = service.clone();
            async move { service.join(JoinRequest::named("a")).await }
        });
        while broadcaster.calls.load(std::sync::atomic::Ordering::SeqCst) == 0 {
            tokio::task::yield_now().await;
        }

        let second = tokio::time::timeout(
            std::time::Duration::from_secs(5),
            service.join(JoinRequest::named("b")),
        )
        .await
        .expect("second join waited on the first broadcast")
        .unwrap();
        assert_eq!(cell(&second), (1, 1));
        assert!(!first.is_finished());

        broadcaster.release.notify_one();
        let first = first.await.unwrap().unwrap();
        assert_eq!(cell(&first), (0, 1));
        assert_eq!(store.list().await.unwrap().len(), 2);
    }
}
