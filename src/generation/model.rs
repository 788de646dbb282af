//! Model lifecycle
//!
//! Loading happens once per process. Concurrent callers of
//! [`ModelManager::initialize`] wait on the same load; a failed load leaves
//! the model in [`ModelState::Failed`] and the next call tries again.

use super::backend::AudioGenerator;
use crate::config::ModelConfig;
use crate::monitoring::MonitoringSystem;
use crate::monitoring::health::ModelState;
use crate::utils::error::{Result, ServiceError};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

/// Static description of the loaded model
#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
    pub model_path: String,
    pub tokenizer_path: String,
    pub backend_url: String,
    pub state: ModelState,
}

pub struct ModelManager {
    generator: Arc<dyn AudioGenerator>,
    monitoring: Arc<MonitoringSystem>,
    config: ModelConfig,
    init: tokio::sync::Mutex<()>,
}

impl ModelManager {
    pub fn new(
        generator: Arc<dyn AudioGenerator>,
        monitoring: Arc<MonitoringSystem>,
        config: ModelConfig,
    ) -> Self {
        Self {
            generator,
            monitoring,
            config,
            init: tokio::sync::Mutex::new(()),
        }
    }

    pub fn generator(&self) -> &Arc<dyn AudioGenerator> {
        &self.generator
    }

    pub fn state(&self) -> ModelState {
        self.monitoring.model_state()
    }

    pub fn is_ready(&self) -> bool {
        self.state().is_ready()
    }

    /// Load the model if it is not loaded yet
    pub async fn initialize(&self) -> Result<()> {
        if self.is_ready() {
            return Ok(());
        }

        let _guard = self.init.lock().await;
        if self.is_ready() {
            return Ok(());
        }

        info!("Loading model {} from {}", self.config.model_path, self.config.backend_url);
        self.monitoring.set_model_state(ModelState::Loading);
        let started = Instant::now();

        let result = match tokio::time::timeout(self.config.load_timeout(), self.generator.warm_up()).await {
            Ok(result) => result,
            Err(_) => Err(ServiceError::not_ready(format!(
                "model load timed out after {}s",
                self.config.load_timeout
            ))),
        };

        match result {
            Ok(()) => {
                self.monitoring.set_model_state(ModelState::Ready);
                info!("Model loaded in {:.2}s", started.elapsed().as_secs_f64());
                Ok(())
            }
            Err(e) => {
                error!("Failed to load model: {}", e);
                self.monitoring.set_model_state(ModelState::Failed(e.to_string()));
                Err(ServiceError::not_ready(
                    "Models not loaded. Please wait for initialization.",
                ))
            }
        }
    }

    pub fn model_info(&self) -> ModelInfo {
        ModelInfo {
            model_path: self.config.model_path.clone(),
            tokenizer_path: self.config.tokenizer_path.clone(),
            backend_url: self.config.backend_url.clone(),
            state: self.state(),
        }
    }
}
