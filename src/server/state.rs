//! Application state shared across HTTP handlers

use super::handler::ServerlessHandler;
use crate::config::Config;
use crate::generation::{ModelManager, RemoteGenerator, VoiceCatalog};
use crate::monitoring::MonitoringSystem;
use crate::monitoring::resources::ReportedAccelerator;
use crate::storage;
use crate::utils::error::Result;
use std::sync::Arc;
use tracing::info;

/// HTTP server state shared across handlers
///
/// Built once by the process entry point; every field is shared through an
/// `Arc` so cloning the state per worker is cheap.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub handler: Arc<ServerlessHandler>,
    pub monitoring: Arc<MonitoringSystem>,
}

impl AppState {
    pub fn new(config: Arc<Config>, handler: Arc<ServerlessHandler>) -> Self {
        Self {
            monitoring: Arc::clone(handler.monitoring()),
            config,
            handler,
        }
    }

    /// Wire the production collaborators described by `config`
    pub fn from_config(config: Config) -> Result<Self> {
        let config = Arc::new(config);

        let accelerator = Arc::new(ReportedAccelerator::new());
        let monitoring = Arc::new(MonitoringSystem::new(&config, accelerator.clone()));
        let generator = RemoteGenerator::new(&config.model)?.with_accelerator(accelerator);
        let models = Arc::new(ModelManager::new(
            Arc::new(generator),
            Arc::clone(&monitoring),
            config.model.clone(),
        ));
        let voices = Arc::new(VoiceCatalog::load(&config.voices.prompts_path));
        let storage = storage::from_config(&config.storage)?;

        info!(
            "Handler ready: backend {}, {} voices",
            config.model.backend_url,
            voices.available_voices().len()
        );

        let handler = Arc::new(ServerlessHandler::new(
            Arc::clone(&config),
            models,
            voices,
            storage,
            monitoring,
        ));
        Ok(Self::new(config, handler))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}
