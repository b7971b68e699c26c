use std::path::PathBuf;
use std::sync::Arc;

use crate::api::{HttpApiClient, ScraperApi};
use crate::app::error::{Result, WebIntelError};
use crate::config::Config;
use crate::dashboard::{DashboardController, DashboardSettings};
use crate::notify::Notifier;

pub struct AppContext {
    pub config: Arc<Config>,
    pub api: Arc<dyn ScraperApi + Send + Sync>,
}

impl AppContext {
    /// Build the HTTP client from `config`; `api_url` overrides the
    /// configured base URL.
    pub fn new(config: Config, api_url: Option<&str>) -> Result<Self> {
        let mut config = config;
        if let Some(url) = api_url {
            config.api.base_url = url.to_string();
        }

        let client = HttpApiClient::new(&config.api.base_url, config.api.timeout())?;
        tracing::debug!("Using backend {}", client.base_url());

        Ok(Self::with_api(config, Arc::new(client)))
    }

    pub fn with_api(config: Config, api: Arc<dyn ScraperApi + Send + Sync>) -> Self {
        Self {
            config: Arc::new(config),
            api,
        }
    }

    /// A dashboard controller wired to this context's backend.
    pub fn dashboard(&self, notifier: Arc<dyn Notifier>) -> Result<Arc<DashboardController>> {
        let settings = DashboardSettings::from_config(&self.config.refresh)
            .map_err(|e| WebIntelError::Config(e.to_string()))?;
        Ok(Arc::new(DashboardController::new(
            self.api.clone(),
            notifier,
            settings,
        )))
    }

    /// `~/.local/share/webintel` (or the platform equivalent), created on demand.
    pub fn data_dir() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| WebIntelError::Config("Could not find data directory".into()))?;
        let dir = data_dir.join("webintel");
        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    }
}
