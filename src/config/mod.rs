//! Configuration management for the service
//!
//! This module handles loading, validation, and environment overrides of all
//! service configuration.

pub mod models;
pub mod validation;

pub use models::*;
pub use validation::Validate;

use crate::utils::error::{Result, ServiceError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, warn};

/// Main configuration struct for the service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub voices: VoicesConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub monitoring: MonitoringConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file, then apply environment overrides
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ServiceError::Config(format!("Failed to read config file: {}", e)))?;

        let mut config: Config = if content.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml::from_str(&content)
                .map_err(|e| ServiceError::Config(format!("Failed to parse config: {}", e)))?
        };

        config.apply_env_overrides();
        config.validate()?;

        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Load configuration from defaults and environment variables
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        if let Err(e) = dotenvy::dotenv() {
            debug!("No .env file loaded: {}", e);
        }

        let mut config = Config::default();
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Overlay `HIGGS_*` and `ALERT_WEBHOOK_URL` environment variables
    pub fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("HIGGS_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("HIGGS_PORT") {
            match port.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => warn!("Ignoring invalid HIGGS_PORT: {}", port),
            }
        }
        if let Ok(url) = std::env::var("HIGGS_BACKEND_URL") {
            self.model.backend_url = url;
        }
        if let Ok(path) = std::env::var("HIGGS_VOICE_PROMPTS_PATH") {
            self.voices.prompts_path = path.into();
        }
        if let Ok(region) = std::env::var("HIGGS_S3_REGION") {
            self.storage.s3.get_or_insert_with(S3Config::default).region = region;
        }
        if let Ok(endpoint) = std::env::var("HIGGS_S3_ENDPOINT") {
            self.storage.s3.get_or_insert_with(S3Config::default).endpoint = Some(endpoint);
        }
        if let Ok(url) = std::env::var("ALERT_WEBHOOK_URL") {
            if !url.is_empty() {
                self.monitoring.alert_webhook_url = Some(url);
            }
        }
        if let Ok(level) = std::env::var("HIGGS_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("HIGGS_LOG_FORMAT") {
            match format.parse() {
                Ok(format) => self.logging.format = format,
                Err(e) => warn!("Ignoring HIGGS_LOG_FORMAT: {}", e),
            }
        }
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        debug!("Validating configuration");

        self.server
            .validate()
            .map_err(|e| ServiceError::Config(format!("Server config error: {}", e)))?;
        self.model
            .validate()
            .map_err(|e| ServiceError::Config(format!("Model config error: {}", e)))?;
        self.generation
            .validate()
            .map_err(|e| ServiceError::Config(format!("Generation config error: {}", e)))?;
        self.storage
            .validate()
            .map_err(|e| ServiceError::Config(format!("Storage config error: {}", e)))?;
        self.monitoring
            .validate()
            .map_err(|e| ServiceError::Config(format!("Monitoring config error: {}", e)))?;
        self.logging
            .validate()
            .map_err(|e| ServiceError::Config(format!("Logging config error: {}", e)))?;

        debug!("Configuration validation completed");
        Ok(())
    }

    /// Convert to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| ServiceError::Config(format!("Failed to serialize config to YAML: {}", e)))
    }
}
