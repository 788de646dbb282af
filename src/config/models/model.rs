//! Inference backend and model loading configuration

use super::default_true;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Model backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Base URL of the inference backend serving the audio model
    #[serde(default = "default_backend_url")]
    pub backend_url: String,
    /// Model checkpoint identifier reported in responses
    #[serde(default = "default_model_path")]
    pub model_path: String,
    /// Audio tokenizer identifier
    #[serde(default = "default_tokenizer_path")]
    pub tokenizer_path: String,
    /// Warm the model up at process start
    #[serde(default = "default_true")]
    pub warm_up: bool,
    /// Seconds to wait for the backend to become ready
    #[serde(default = "default_load_timeout")]
    pub load_timeout: u64,
    /// Seconds allowed for a single generate call
    #[serde(default = "default_generate_timeout")]
    pub generate_timeout: u64,
}

fn default_backend_url() -> String {
    "http://127.0.0.1:8001".to_string()
}

fn default_model_path() -> String {
    "bosonai/higgs-audio-v2-generation-3B-base".to_string()
}

fn default_tokenizer_path() -> String {
    "bosonai/higgs-audio-v2-tokenizer".to_string()
}

fn default_load_timeout() -> u64 {
    300
}

fn default_generate_timeout() -> u64 {
    600
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            backend_url: default_backend_url(),
            model_path: default_model_path(),
            tokenizer_path: default_tokenizer_path(),
            warm_up: true,
            load_timeout: default_load_timeout(),
            generate_timeout: default_generate_timeout(),
        }
    }
}

impl ModelConfig {
    pub fn load_timeout(&self) -> Duration {
        Duration::from_secs(self.load_timeout)
    }

    pub fn generate_timeout(&self) -> Duration {
        Duration::from_secs(self.generate_timeout)
    }
}
