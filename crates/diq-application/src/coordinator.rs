//! Ties the session lifecycle to the decision store.
//!
//! Whenever the credential changes from absent to present (or to a different
//! value) the profile and decision list are (re)fetched. When it goes away
//! the store is cleared without any network traffic.

use std::sync::Arc;

use diq_core::{DiqError, Result};
use diq_core::session::{Credential, UserProfile};
use tokio::sync::Mutex;

use crate::session::SessionManager;
use crate::sync::RemoteSyncGateway;

/// Results of the fetches triggered by a credential change.
///
/// A failed profile fetch is reported here and in the logs, but does not
/// stop the decision load.
#[derive(Debug)]
pub struct LoadReport {
    pub profile: Result<UserProfile>,
    pub decisions: Result<usize>,
}

impl LoadReport {
    pub fn is_complete(&self) -> bool {
        self.profile.is_ok() && self.decisions.is_ok()
    }

    fn superseded() -> Self {
        let error = DiqError::SessionChanged("credential replaced before loading".to_string());
        Self {
            profile: Err(error.clone()),
            decisions: Err(error),
        }
    }
}

pub struct SessionStoreCoordinator {
    session: Arc<SessionManager>,
    gateway: Arc<RemoteSyncGateway>,
    last_seen: Mutex<Option<Credential>>,
}

impl SessionStoreCoordinator {
    pub fn new(session: Arc<SessionManager>, gateway: Arc<RemoteSyncGateway>) -> Self {
        Self {
            session,
            gateway,
            last_seen: Mutex::new(None),
        }
    }

    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    pub fn gateway(&self) -> &Arc<RemoteSyncGateway> {
        &self.gateway
    }

    /// Restores a persisted session and loads its data.
    ///
    /// Returns `None` when there was nothing to restore.
    pub async fn start(&self) -> Result<Option<LoadReport>> {
        self.session.restore().await?;
        Ok(self.on_credential_changed().await)
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<LoadReport> {
        let credential = self.session.login(username, password).await?;
        Ok(self.adopt(credential).await)
    }

    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<LoadReport> {
        let credential = self.session.register(username, email, password).await?;
        Ok(self.adopt(credential).await)
    }

    pub async fn logout(&self) -> Result<()> {
        let result = self.session.logout().await;
        // Clear even if the persisted copy could not be removed.
        self.on_credential_changed().await;
        result
    }

    /// Fetches profile and decisions again for the current credential.
    pub async fn reload(&self) -> Option<LoadReport> {
        let (credential, generation) = {
            let _last_seen = self.last_seen.lock().await;
            let credential = self.session.credential().await?;
            (credential, self.gateway.generation())
        };
        Some(self.load_for(&credential, generation).await)
    }

    /// Reacts to the difference between the current credential and the last
    /// one seen.
    ///
    /// Returns a report when fetches were made. The lock on the last seen
    /// credential is released before any network call, so a concurrent
    /// logout clears the store immediately.
    pub async fn on_credential_changed(&self) -> Option<LoadReport> {
        let (credential, generation) = {
            let mut last_seen = self.last_seen.lock().await;
            let current = self.session.credential().await;
            if *last_seen == current {
                return None;
            }
            let previous = std::mem::replace(&mut *last_seen, current.clone());
            if previous.is_some() {
                tracing::debug!("[Coordinator] Credential dropped or replaced, clearing decisions");
                self.gateway.clear().await;
            }

            match current {
                Some(credential) => (credential, self.gateway.generation()),
                None => return None,
            }
        };

        tracing::debug!("[Coordinator] Credential changed, loading session data");
        Some(self.load_for(&credential, generation).await)
    }

    /// Loads for a freshly obtained credential, even if it equals the last one.
    async fn adopt(&self, credential: Credential) -> LoadReport {
        let generation = {
            let mut last_seen = self.last_seen.lock().await;
            if self.session.credential().await.as_ref() != Some(&credential) {
                // Signed out (or in again) before we got here.
                return LoadReport::superseded();
            }
            let previous = last_seen.replace(credential.clone());
            if previous.is_some_and(|previous| previous != credential) {
                // Another account's records must not survive a failed load.
                self.gateway.clear().await;
            }
            self.gateway.generation()
        };
        self.load_for(&credential, generation).await
    }

    async fn load_for(&self, credential: &Credential, generation: u64) -> LoadReport {
        let profile = self.session.fetch_profile(credential).await;
        if let Err(e) = &profile {
            tracing::warn!("[Coordinator] Continuing without profile: {}", e);
        }
        let decisions = self
            .gateway
            .load_decisions_in(credential, generation)
            .await;
        LoadReport { profile, decisions }
    }
}
