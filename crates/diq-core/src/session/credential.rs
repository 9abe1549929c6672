//! Bearer credential and its persistence trait.

use std::fmt;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::error::{DiqError, Result};

/// Key under which the credential is persisted.
pub const TOKEN_STORAGE_KEY: &str = "token";

/// An opaque bearer token.
///
/// `Debug` is redacted so the token never reaches the logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token, for building the `Authorization` header.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Value of the `Authorization` header for protected calls.
    pub fn bearer_header(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// Durable storage for the session credential.
///
/// # Security Note
///
/// Implementations should ensure that:
/// - Persisted files have appropriate permissions (e.g., 600 on Unix)
/// - The token is never logged or exposed in error messages
pub trait CredentialStore: Send + Sync {
    /// Reads the persisted credential, if any.
    fn load(&self) -> Result<Option<Credential>>;

    /// Persists `credential`, replacing any previous one.
    fn save(&self, credential: &Credential) -> Result<()>;

    /// Removes the persisted credential. Clearing an empty store succeeds.
    fn clear(&self) -> Result<()>;
}

/// Process-local credential store for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    slot: Mutex<Option<Credential>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `credential`.
    pub fn with_credential(credential: Credential) -> Self {
        Self {
            slot: Mutex::new(Some(credential)),
        }
    }
}

impl CredentialStore for InMemoryCredentialStore {
    fn load(&self) -> Result<Option<Credential>> {
        let slot = self
            .slot
            .lock()
            .map_err(|e| DiqError::internal(format!("credential slot poisoned: {}", e)))?;
        Ok(slot.clone())
    }

    fn save(&self, credential: &Credential) -> Result<()> {
        let mut slot = self
            .slot
            .lock()
            .map_err(|e| DiqError::internal(format!("credential slot poisoned: {}", e)))?;
        *slot = Some(credential.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut slot = self
            .slot
            .lock()
            .map_err(|e| DiqError::internal(format!("credential slot poisoned: {}", e)))?;
        *slot = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_is_redacted() {
        let credential = Credential::new("eyJhbGciOi.secret");
        let rendered = format!("{:?}", credential);
        assert!(!rendered.contains("secret"));
    }

    #[test]
    fn test_bearer_header() {
        let credential = Credential::new("abc");
        assert_eq!(credential.bearer_header(), "Bearer abc");
    }

    #[test]
    fn test_in_memory_store_roundtrip_and_clear() {
        let store = InMemoryCredentialStore::new();
        assert_eq!(store.load().unwrap(), None);

        store.save(&Credential::new("t1")).unwrap();
        assert_eq!(store.load().unwrap(), Some(Credential::new("t1")));

        store.clear().unwrap();
        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
    }
}
