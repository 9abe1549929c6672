//! File-backed credential persistence.

use std::path::{Path, PathBuf};

use diq_core::session::{Credential, CredentialStore};
use diq_core::{DiqError, Result};
use serde::{Deserialize, Serialize};

use crate::paths::{DiqPaths, ServiceType};
use crate::storage::AtomicTomlFile;

/// On-disk layout of `session.toml`. The field name is the fixed storage key.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredSession {
    token: String,
}

/// Keeps the credential in `session.toml` so it survives restarts.
pub struct FileCredentialStore {
    file: AtomicTomlFile<StoredSession>,
}

impl FileCredentialStore {
    /// Store at the default location (or under `base` when given).
    pub fn new(base: Option<&Path>) -> Result<Self> {
        let path = DiqPaths::new(base)
            .get_path(ServiceType::Session)
            .map_err(|e| DiqError::config(e.to_string()))?;
        Ok(Self::with_path(path))
    }

    /// Store at an explicit file path.
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            file: AtomicTomlFile::new(path).private(),
        }
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Result<Option<Credential>> {
        let stored = self.file.load()?;
        Ok(stored
            .map(|s| s.token)
            .filter(|token| !token.trim().is_empty())
            .map(Credential::new))
    }

    fn save(&self, credential: &Credential) -> Result<()> {
        self.file.save(&StoredSession {
            token: credential.expose().to_string(),
        })?;
        tracing::debug!(
            "[CredentialStore] Credential persisted to {}",
            self.file.path().display()
        );
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.file.remove()?;
        tracing::debug!("[CredentialStore] Credential cleared");
        Ok(())
    }
}
