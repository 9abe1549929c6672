//! Remote API seams.
//!
//! The HTTP implementation lives in `diq-interaction`; the application layer
//! only sees these traits, so tests can substitute in-process fakes.

use async_trait::async_trait;

use crate::decision::{DecisionDraft, DecisionRecord, Outcome};
use crate::error::Result;
use crate::session::{Credential, UserProfile};

/// Authentication and profile endpoints.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// `POST /auth/token/`: exchanges username/password for an access token.
    ///
    /// A non-2xx answer is `ServerRejected` carrying the server's message;
    /// a 2xx answer without a token is `MalformedResponse`.
    async fn obtain_token(&self, username: &str, password: &str) -> Result<Credential>;

    /// `POST /auth/register/`: creates the account. Does not sign in.
    async fn register(&self, username: &str, email: &str, password: &str) -> Result<()>;

    /// `GET /me/`
    async fn fetch_profile(&self, credential: &Credential) -> Result<UserProfile>;

    /// `PATCH /me/update/`
    async fn update_profile(
        &self,
        credential: &Credential,
        username: &str,
        email: &str,
    ) -> Result<UserProfile>;
}

/// Decision collection endpoints.
#[async_trait]
pub trait DecisionApi: Send + Sync {
    /// `GET /decisions/`, newest first.
    async fn list_decisions(&self, credential: &Credential) -> Result<Vec<DecisionRecord>>;

    /// `POST /decisions/`: returns the server's record with its id.
    async fn create_decision(
        &self,
        credential: &Credential,
        draft: &DecisionDraft,
    ) -> Result<DecisionRecord>;

    /// `PATCH /decisions/{id}/` with `{ "outcome": ... }`.
    async fn patch_outcome(
        &self,
        credential: &Credential,
        id: &str,
        outcome: &Outcome,
    ) -> Result<DecisionRecord>;

    /// `DELETE /decisions/{id}/`: 204 or any 2xx counts as success.
    async fn delete_decision(&self, credential: &Credential, id: &str) -> Result<()>;
}
