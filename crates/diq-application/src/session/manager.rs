use std::sync::Arc;

use diq_core::api::AuthApi;
use diq_core::notification::{Notification, NotificationSink};
use diq_core::session::{Credential, CredentialStore, SessionContext, SessionState, UserProfile};
use diq_core::{DiqError, Result};
use tokio::sync::RwLock;

/// Owns the authentication lifecycle: the credential, its persistence and
/// the user profile.
///
/// `SessionManager` is responsible for:
/// - Restoring a persisted credential at startup (no network)
/// - Logging in and registering (register always follows with a login)
/// - Logging out, which clears the persisted credential and the profile
/// - Fetching and updating the profile
///
/// A failed login or registration leaves both the persisted credential and
/// the in-memory session exactly as they were.
pub struct SessionManager {
    auth_api: Arc<dyn AuthApi>,
    credential_store: Arc<dyn CredentialStore>,
    notifier: Arc<dyn NotificationSink>,
    context: RwLock<SessionContext>,
}

impl SessionManager {
    pub fn new(
        auth_api: Arc<dyn AuthApi>,
        credential_store: Arc<dyn CredentialStore>,
        notifier: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            auth_api,
            credential_store,
            notifier,
            context: RwLock::new(SessionContext::default()),
        }
    }

    // ============================================================================
    // Accessors
    // ============================================================================

    pub async fn state(&self) -> SessionState {
        self.context.read().await.state
    }

    pub async fn credential(&self) -> Option<Credential> {
        self.context.read().await.credential.clone()
    }

    pub async fn profile(&self) -> Option<UserProfile> {
        self.context.read().await.profile.clone()
    }

    /// Snapshot of the whole session context.
    pub async fn context(&self) -> SessionContext {
        self.context.read().await.clone()
    }

    // ============================================================================
    // Lifecycle
    // ============================================================================

    /// Reads a previously persisted credential. Never touches the network.
    ///
    /// # Returns
    ///
    /// `Some(credential)` if one was stored, `None` otherwise.
    pub async fn restore(&self) -> Result<Option<Credential>> {
        let restored = self.credential_store.load().map_err(|e| {
            tracing::error!("[SessionManager] Failed to read persisted credential: {}", e);
            self.notifier
                .notify(Notification::error("Failed to read saved session"));
            e
        })?;
        if let Some(credential) = &restored {
            *self.context.write().await = SessionContext::authenticated(credential.clone());
            tracing::info!("[SessionManager] Restored persisted session");
        } else {
            tracing::debug!("[SessionManager] No persisted session");
        }
        Ok(restored)
    }

    /// Exchanges username/password for a credential and persists it.
    ///
    /// # Errors
    ///
    /// - `ServerRejected` with the server's message for wrong credentials
    /// - `NetworkFailure` when no response was received
    /// - `MalformedResponse` when the answer carried no token
    pub async fn login(&self, username: &str, password: &str) -> Result<Credential> {
        let previous = self.begin_authenticating().await;
        self.authenticate(username, password, previous).await
    }

    /// Creates an account, then logs in with the same username/password.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<Credential> {
        let previous = self.begin_authenticating().await;

        if let Err(e) = self.auth_api.register(username, email, password).await {
            *self.context.write().await = previous;
            let message = match &e {
                DiqError::NetworkFailure(_) => "Registration failed: network error".to_string(),
                other => other.user_message(),
            };
            tracing::warn!("[SessionManager] Registration failed: {}", e);
            self.notifier.notify(Notification::error(message));
            return Err(e);
        }

        tracing::info!("[SessionManager] Registered '{}', logging in", username);
        self.authenticate(username, password, previous).await
    }

    /// Drops the session. Safe to call when already signed out.
    pub async fn logout(&self) -> Result<()> {
        let had_session = {
            let mut context = self.context.write().await;
            let had_session = context.credential.is_some();
            *context = SessionContext::default();
            had_session
        };

        if let Err(e) = self.credential_store.clear() {
            tracing::error!("[SessionManager] Failed to clear persisted credential: {}", e);
            self.notifier
                .notify(Notification::error("Failed to clear saved session"));
            return Err(e);
        }

        if had_session {
            tracing::info!("[SessionManager] Logged out");
            self.notifier.notify(Notification::success("Logged out"));
        }
        Ok(())
    }

    /// Fetches `/me/` and replaces the profile.
    ///
    /// A failure is returned and logged but does not end the session.
    pub async fn fetch_profile(&self, credential: &Credential) -> Result<UserProfile> {
        match self.auth_api.fetch_profile(credential).await {
            Ok(profile) => {
                let mut context = self.context.write().await;
                // Ignore answers for a credential that is no longer current.
                if context.credential.as_ref() == Some(credential) {
                    context.profile = Some(profile.clone());
                }
                Ok(profile)
            }
            Err(e) => {
                tracing::warn!("[SessionManager] Profile fetch failed: {}", e);
                Err(e)
            }
        }
    }

    /// Sends new username/email and replaces the profile with the answer.
    pub async fn update_profile(&self, username: &str, email: &str) -> Result<UserProfile> {
        let Some(credential) = self.credential().await else {
            return Err(DiqError::unauthorized("Not signed in"));
        };

        match self
            .auth_api
            .update_profile(&credential, username, email)
            .await
        {
            Ok(profile) => {
                self.context.write().await.profile = Some(profile.clone());
                self.notifier.notify(Notification::success("Profile updated"));
                Ok(profile)
            }
            Err(e) => {
                tracing::error!("[SessionManager] Profile update failed: {}", e);
                self.notifier
                    .notify(Notification::error("Failed to update profile"));
                Err(e)
            }
        }
    }

    // ============================================================================
    // Internals
    // ============================================================================

    /// Moves to `Authenticating`, returning the context to roll back to.
    async fn begin_authenticating(&self) -> SessionContext {
        let mut context = self.context.write().await;
        let previous = context.clone();
        context.state = SessionState::Authenticating;
        previous
    }

    async fn authenticate(
        &self,
        username: &str,
        password: &str,
        previous: SessionContext,
    ) -> Result<Credential> {
        let credential = match self.auth_api.obtain_token(username, password).await {
            Ok(credential) => credential,
            Err(e) => {
                *self.context.write().await = previous;
                let message = match &e {
                    DiqError::NetworkFailure(_) => "Login failed: network error".to_string(),
                    DiqError::MalformedResponse(message) => message.clone(),
                    other => other.user_message(),
                };
                tracing::warn!("[SessionManager] Login failed: {}", e);
                self.notifier.notify(Notification::error(message));
                return Err(e);
            }
        };

        if let Err(e) = self.credential_store.save(&credential) {
            // The session is still usable for this run.
            tracing::error!("[SessionManager] Failed to persist credential: {}", e);
        }

        *self.context.write().await = SessionContext::authenticated(credential.clone());
        tracing::info!("[SessionManager] Logged in as '{}'", username);
        self.notifier.notify(Notification::success("Logged in"));
        Ok(credential)
    }
}
