//! Client configuration loading.
//!
//! Priority:
//! 1. Environment variables (`DIQ_API_URL`, `DIQ_LOG`)
//! 2. `config.toml`
//! 3. Built-in defaults

use std::path::{Path, PathBuf};

use diq_core::config::ClientConfig;
use diq_core::{DiqError, Result};

use crate::paths::{DiqPaths, ServiceType};
use crate::storage::AtomicTomlFile;

pub const ENV_API_URL: &str = "DIQ_API_URL";
pub const ENV_LOG: &str = "DIQ_LOG";

/// Loads and saves [`ClientConfig`].
pub struct ConfigService {
    file: AtomicTomlFile<ClientConfig>,
}

impl ConfigService {
    pub fn new(base: Option<&Path>) -> Result<Self> {
        let path = DiqPaths::new(base)
            .get_path(ServiceType::Config)
            .map_err(|e| DiqError::config(e.to_string()))?;
        Ok(Self::with_path(path))
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self {
            file: AtomicTomlFile::new(path),
        }
    }

    /// File contents only; defaults when the file is missing.
    pub fn load_file(&self) -> Result<ClientConfig> {
        let config = self.file.load().map_err(|e| {
            DiqError::config(format!(
                "Failed to read {}: {}",
                self.file.path().display(),
                e
            ))
        })?;
        Ok(config.unwrap_or_default())
    }

    /// File contents with environment overrides applied.
    pub fn load(&self) -> Result<ClientConfig> {
        let config = self.load_file()?;
        let config = apply_overrides(
            config,
            std::env::var(ENV_API_URL).ok(),
            std::env::var(ENV_LOG).ok(),
        );
        tracing::debug!(
            "[Config] Using API base URL {} (log level {})",
            config.api_base_url,
            config.log_level
        );
        Ok(config)
    }

    pub fn save(&self, config: &ClientConfig) -> Result<()> {
        self.file.save(config)?;
        Ok(())
    }
}

/// Applies non-empty overrides on top of `config`.
pub fn apply_overrides(
    mut config: ClientConfig,
    api_url: Option<String>,
    log_level: Option<String>,
) -> ClientConfig {
    if let Some(url) = api_url.filter(|v| !v.trim().is_empty()) {
        config.api_base_url = url;
    }
    if let Some(level) = log_level.filter(|v| !v.trim().is_empty()) {
        config.log_level = level;
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use diq_core::config::DEFAULT_API_BASE_URL;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let service = ConfigService::new(Some(temp_dir.path())).unwrap();
        assert_eq!(service.load_file().unwrap(), ClientConfig::default());
    }

    #[test]
    fn test_save_then_load() {
        let temp_dir = TempDir::new().unwrap();
        let service = ConfigService::new(Some(temp_dir.path())).unwrap();
        let config = ClientConfig {
            api_base_url: "https://journal.example.com/api".to_string(),
            log_level: "debug".to_string(),
        };
        service.save(&config).unwrap();

        assert_eq!(service.load_file().unwrap(), config);
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("config.toml"), "api_base_url = [").unwrap();
        let service = ConfigService::new(Some(temp_dir.path())).unwrap();

        assert!(matches!(service.load_file(), Err(DiqError::Config(_))));
    }

    #[test]
    fn test_overrides_take_priority() {
        let config = apply_overrides(
            ClientConfig::default(),
            Some("http://10.0.0.2:8000/api".to_string()),
            None,
        );
        assert_eq!(config.api_base_url, "http://10.0.0.2:8000/api");
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn test_blank_override_is_ignored() {
        let config = apply_overrides(ClientConfig::default(), Some("  ".to_string()), None);
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
    }
}
