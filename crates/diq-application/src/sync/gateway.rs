use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use diq_core::api::DecisionApi;
use diq_core::decision::{
    DecisionDraft, DecisionId, DecisionRecord, DecisionStore, DecisionSummary, Outcome,
};
use diq_core::notification::{Notification, NotificationSink};
use diq_core::session::Credential;
use diq_core::{DiqError, Result};
use tokio::sync::RwLock;

use super::in_flight::InFlightRegistry;

/// Translates user actions into single API calls and applies the server's
/// answers to the [`DecisionStore`].
///
/// Responsibilities:
/// - One request per action, no retries
/// - On success, the server's record becomes canonical in the store
/// - On failure, the store is left exactly as it was and an error
///   notification is raised
/// - At most one in-flight mutation per decision id
///
/// The store lock is only taken after the network call has resolved, so
/// independent operations can run concurrently and apply in completion
/// order.
///
/// Every [`clear`](Self::clear) starts a new generation. A load or create
/// whose answer arrives in a later generation than the one it was issued in
/// is dropped.
pub struct RemoteSyncGateway {
    api: Arc<dyn DecisionApi>,
    store: Arc<RwLock<DecisionStore>>,
    /// Only changed while `store` is write-locked.
    generation: AtomicU64,
    notifier: Arc<dyn NotificationSink>,
    in_flight: InFlightRegistry,
    editing: Mutex<Option<DecisionId>>,
}

impl RemoteSyncGateway {
    pub fn new(api: Arc<dyn DecisionApi>, notifier: Arc<dyn NotificationSink>) -> Self {
        Self {
            api,
            store: Arc::new(RwLock::new(DecisionStore::new())),
            generation: AtomicU64::new(0),
            notifier,
            in_flight: InFlightRegistry::new(),
            editing: Mutex::new(None),
        }
    }

    /// Shared handle to the store, for read-only views.
    pub fn store(&self) -> Arc<RwLock<DecisionStore>> {
        self.store.clone()
    }

    pub fn in_flight(&self) -> &InFlightRegistry {
        &self.in_flight
    }

    /// Current session generation.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    fn session_changed(&self, what: &str, issued: u64) -> DiqError {
        tracing::info!(
            "[SyncGateway] Dropping {} answer from generation {} (now {})",
            what,
            issued,
            self.generation()
        );
        DiqError::SessionChanged(format!("{} finished after the session ended", what))
    }

    // ============================================================================
    // Remote operations
    // ============================================================================

    /// Replaces the store with the server's list.
    ///
    /// On failure the previous contents are kept.
    pub async fn load_decisions(&self, credential: &Credential) -> Result<usize> {
        self.load_decisions_in(credential, self.generation()).await
    }

    /// Like [`load_decisions`](Self::load_decisions), but the answer is only
    /// applied while the store is still in `generation`.
    pub async fn load_decisions_in(
        &self,
        credential: &Credential,
        generation: u64,
    ) -> Result<usize> {
        match self.api.list_decisions(credential).await {
            Ok(records) => {
                let count = records.len();
                let mut store = self.store.write().await;
                if self.generation() != generation {
                    return Err(self.session_changed("load", generation));
                }
                store.replace_all(records);
                drop(store);
                tracing::info!("[SyncGateway] Loaded {} decision(s)", count);
                Ok(count)
            }
            Err(e) => {
                tracing::error!("[SyncGateway] Failed to load decisions: {}", e);
                self.notifier
                    .notify(Notification::error("Failed to load decisions"));
                Err(e)
            }
        }
    }

    /// Sends `draft` to the server and prepends the created record.
    ///
    /// A draft without situation or decision is rejected before any request
    /// is made. The draft is reset only on success.
    pub async fn create_decision(
        &self,
        credential: &Credential,
        draft: &mut DecisionDraft,
    ) -> Result<DecisionRecord> {
        if let Err(e) = draft.validate() {
            self.notifier.notify(Notification::error(e.user_message()));
            return Err(e);
        }

        let generation = self.generation();
        match self.api.create_decision(credential, draft).await {
            Ok(created) => {
                let mut store = self.store.write().await;
                if self.generation() != generation {
                    return Err(self.session_changed("create", generation));
                }
                store.insert_created(created.clone());
                drop(store);
                draft.reset();
                tracing::info!("[SyncGateway] Created decision {}", created.id);
                self.notifier
                    .notify(Notification::success("Decision saved successfully!"));
                Ok(created)
            }
            Err(e) => {
                tracing::error!("[SyncGateway] Failed to save decision: {}", e);
                self.notifier
                    .notify(Notification::error("Failed to save decision"));
                Err(e)
            }
        }
    }

    /// Records `outcome` for decision `id`.
    ///
    /// On failure the store is untouched and the editing state for `id`
    /// stays open so the caller can retry.
    pub async fn patch_outcome(
        &self,
        credential: &Credential,
        id: &str,
        outcome: Outcome,
    ) -> Result<DecisionRecord> {
        if let Err(e) = outcome.validate() {
            self.notifier.notify(Notification::error(e.user_message()));
            return Err(e);
        }
        let _permit = self.acquire(id)?;

        match self.api.patch_outcome(credential, id, &outcome).await {
            Ok(updated) => {
                if let Err(e) = self
                    .store
                    .write()
                    .await
                    .apply_outcome_patch(id, updated.clone())
                {
                    tracing::warn!(
                        "[SyncGateway] Inconsistency: server updated {} but it is not in the store ({})",
                        id,
                        e
                    );
                }
                self.close_edit_if(id);
                tracing::info!("[SyncGateway] Updated outcome for {}", id);
                self.notifier
                    .notify(Notification::success("Outcome updated successfully!"));
                Ok(updated)
            }
            Err(e) => {
                tracing::error!("[SyncGateway] Failed to update outcome for {}: {}", id, e);
                self.notifier
                    .notify(Notification::error("Failed to update outcome"));
                Err(e)
            }
        }
    }

    /// Deletes decision `id` remotely, then locally.
    pub async fn delete_decision(&self, credential: &Credential, id: &str) -> Result<()> {
        let _permit = self.acquire(id)?;

        match self.api.delete_decision(credential, id).await {
            Ok(()) => {
                if !self.store.write().await.remove(id) {
                    tracing::debug!("[SyncGateway] {} was already absent locally", id);
                }
                self.close_edit_if(id);
                tracing::info!("[SyncGateway] Deleted decision {}", id);
                self.notifier.notify(Notification::success("Decision deleted"));
                Ok(())
            }
            Err(e) => {
                tracing::error!("[SyncGateway] Failed to delete decision {}: {}", id, e);
                self.notifier
                    .notify(Notification::error("Failed to delete decision"));
                Err(e)
            }
        }
    }

    fn acquire(&self, id: &str) -> Result<super::in_flight::InFlightPermit> {
        self.in_flight.try_acquire(id).map_err(|e| {
            tracing::warn!("[SyncGateway] Rejected concurrent mutation of {}", id);
            self.notifier.notify(Notification::error(
                "Another change to this decision is still in progress",
            ));
            e
        })
    }

    // ============================================================================
    // Outcome editing state
    // ============================================================================

    /// Opens the outcome editor for `id`, replacing any other open editor.
    pub async fn begin_outcome_edit(&self, id: &str) -> Result<()> {
        if self.store.read().await.get(id).is_none() {
            return Err(DiqError::not_found("decision", id));
        }
        *self.editing_slot() = Some(id.to_string());
        Ok(())
    }

    pub fn cancel_outcome_edit(&self) {
        *self.editing_slot() = None;
    }

    /// Id whose outcome editor is currently open.
    pub fn editing_outcome(&self) -> Option<DecisionId> {
        self.editing_slot().clone()
    }

    fn close_edit_if(&self, id: &str) {
        let mut slot = self.editing_slot();
        if slot.as_deref() == Some(id) {
            *slot = None;
        }
    }

    fn editing_slot(&self) -> std::sync::MutexGuard<'_, Option<DecisionId>> {
        self.editing
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    // ============================================================================
    // Local views
    // ============================================================================

    /// Drops all records, closes the editor and starts a new generation
    /// (session loss).
    pub async fn clear(&self) {
        let mut store = self.store.write().await;
        self.generation.fetch_add(1, Ordering::SeqCst);
        store.clear();
        drop(store);
        self.cancel_outcome_edit();
    }

    pub async fn records(&self) -> Vec<DecisionRecord> {
        self.store.read().await.records().to_vec()
    }

    pub async fn search(&self, query: &str) -> Vec<DecisionRecord> {
        self.store
            .read()
            .await
            .filter_by_query(query)
            .cloned()
            .collect()
    }

    pub async fn pending_outcomes(&self) -> Vec<DecisionRecord> {
        self.store.read().await.pending_outcomes().cloned().collect()
    }

    pub async fn summary(&self) -> DecisionSummary {
        self.store.read().await.summary()
    }
}
