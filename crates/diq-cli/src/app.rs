use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use diq_application::{RemoteSyncGateway, SessionManager, SessionStoreCoordinator};
use diq_core::config::ClientConfig;
use diq_core::notification::NotificationSink;
use diq_core::session::Credential;
use diq_infrastructure::config_service::apply_overrides;
use diq_infrastructure::{ConfigService, DiqPaths, FileCredentialStore, ServiceType};
use diq_interaction::HttpApiClient;
use tracing_appender::non_blocking::WorkerGuard;

use crate::logging;
use crate::notifier::TerminalNotificationSink;

/// Wired-up client for one CLI invocation.
pub struct App {
    pub config: ClientConfig,
    pub coordinator: SessionStoreCoordinator,
    _log_guard: WorkerGuard,
}

impl App {
    /// Loads config, installs logging and builds the service graph.
    ///
    /// `api_url` from the command line wins over env and file.
    pub fn bootstrap(config_dir: Option<&Path>, api_url: Option<String>) -> Result<Self> {
        let config = ConfigService::new(config_dir)?
            .load()
            .context("Failed to load configuration")?;
        let config = apply_overrides(config, api_url, None);

        let logs_dir = DiqPaths::new(config_dir)
            .get_path(ServiceType::Logs)
            .context("Failed to resolve log directory")?;
        let log_guard = logging::init(&config.log_level, &logs_dir)?;

        tracing::info!("[Bootstrap] API base URL: {}", config.normalized_base_url());

        let api = Arc::new(HttpApiClient::from_config(&config));
        let credential_store = Arc::new(FileCredentialStore::new(config_dir)?);
        let notifier: Arc<dyn NotificationSink> = Arc::new(TerminalNotificationSink);

        let session = Arc::new(SessionManager::new(
            api.clone(),
            credential_store,
            notifier.clone(),
        ));
        let gateway = Arc::new(RemoteSyncGateway::new(api, notifier));

        Ok(Self {
            config,
            coordinator: SessionStoreCoordinator::new(session, gateway),
            _log_guard: log_guard,
        })
    }

    /// Restores the stored session and loads its decisions.
    ///
    /// Fails when nobody is signed in.
    pub async fn signed_in(&self) -> Result<Credential> {
        let report = self.coordinator.start().await?;
        let credential = self
            .coordinator
            .session()
            .credential()
            .await
            .context("Not signed in. Run `diq login` first.")?;

        if let Some(report) = report {
            report.decisions?;
        }
        Ok(credential)
    }
}
