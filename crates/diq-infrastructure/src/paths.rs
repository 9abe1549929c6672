//! Unified path management for DecisionIQ client files.
//!
//! ```text
//! ~/.config/decisioniq/        # Config directory (platform default)
//! ├── config.toml              # Client configuration
//! ├── session.toml             # Persisted credential (mode 600)
//! └── logs/                    # Application logs
//!     └── diq.log.YYYY-MM-DD
//! ```

use std::path::{Path, PathBuf};

use thiserror::Error;

const APP_DIR_NAME: &str = "decisioniq";

/// Errors that can occur during path resolution.
#[derive(Debug, Error)]
pub enum PathError {
    /// Platform config directory could not be determined.
    #[error("Cannot find config directory")]
    ConfigDirNotFound,
}

/// Files and directories owned by a particular service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceType {
    Config,
    Session,
    Logs,
}

/// Resolves client paths, optionally under an explicit base directory.
///
/// With no base the platform config directory (`dirs::config_dir`) plus
/// `decisioniq/` is used. A base is used verbatim, which keeps tests inside
/// a temp dir.
#[derive(Debug, Clone)]
pub struct DiqPaths {
    base: Option<PathBuf>,
}

impl DiqPaths {
    pub fn new(base: Option<&Path>) -> Self {
        Self {
            base: base.map(Path::to_path_buf),
        }
    }

    /// The root directory every other path hangs off.
    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base {
            Some(base) => Ok(base.clone()),
            None => dirs::config_dir()
                .map(|dir| dir.join(APP_DIR_NAME))
                .ok_or(PathError::ConfigDirNotFound),
        }
    }

    /// Path for the given service.
    pub fn get_path(&self, service: ServiceType) -> Result<PathBuf, PathError> {
        let root = self.config_dir()?;
        Ok(match service {
            ServiceType::Config => root.join("config.toml"),
            ServiceType::Session => root.join("session.toml"),
            ServiceType::Logs => root.join("logs"),
        })
    }
}

impl Default for DiqPaths {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_dir_ends_with_app_name() {
        // Some CI sandboxes have no config dir; only check when one exists.
        if let Ok(dir) = DiqPaths::default().config_dir() {
            assert!(dir.ends_with(APP_DIR_NAME));
        }
    }

    #[test]
    fn test_paths_under_explicit_base() {
        let base = Path::new("/tmp/diq-test");
        let paths = DiqPaths::new(Some(base));

        assert_eq!(paths.config_dir().unwrap(), base);
        assert_eq!(
            paths.get_path(ServiceType::Config).unwrap(),
            base.join("config.toml")
        );
        assert_eq!(
            paths.get_path(ServiceType::Session).unwrap(),
            base.join("session.toml")
        );
        assert!(paths.get_path(ServiceType::Logs).unwrap().ends_with("logs"));
    }
}
