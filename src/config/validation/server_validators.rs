//! Server-side configuration validators
//!
//! Covers the HTTP server, inference backend, object storage and logging
//! sections.

use super::trait_def::Validate;
use crate::config::models::*;
use tracing::debug;

impl Validate for ServerConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating server configuration");

        if self.host.is_empty() {
            return Err("Server host cannot be empty".to_string());
        }

        if self.port == 0 {
            return Err("Server port must be greater than 0".to_string());
        }

        if let Some(workers) = self.workers {
            if workers == 0 {
                return Err("Worker count must be greater than 0".to_string());
            }
            if workers > 1000 {
                return Err("Worker count seems too high (>1000)".to_string());
            }
        }

        if self.request_timeout == 0 {
            return Err("Request timeout must be greater than 0".to_string());
        }

        if self.max_body_size == 0 {
            return Err("Max body size must be greater than 0".to_string());
        }

        Ok(())
    }
}

impl Validate for ModelConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating model configuration");

        if !(self.backend_url.starts_with("http://") || self.backend_url.starts_with("https://")) {
            return Err(format!(
                "Backend URL must start with http:// or https://, got '{}'",
                self.backend_url
            ));
        }

        if self.model_path.is_empty() {
            return Err("Model path cannot be empty".to_string());
        }

        if self.load_timeout == 0 || self.generate_timeout == 0 {
            return Err("Model timeouts must be greater than 0".to_string());
        }

        Ok(())
    }
}

impl Validate for StorageConfig {
    fn validate(&self) -> Result<(), String> {
        let Some(s3) = &self.s3 else {
            return Ok(());
        };

        if s3.region.is_empty() {
            return Err("S3 region cannot be empty".to_string());
        }

        if let Some(endpoint) = &s3.endpoint {
            if endpoint.starts_with("http://") && !s3.allow_http {
                return Err("Plain HTTP S3 endpoint requires allow_http".to_string());
            }
        }

        if s3.access_key_id.is_some() != s3.secret_access_key.is_some() {
            return Err("S3 access key and secret must be set together".to_string());
        }

        Ok(())
    }
}

impl Validate for LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        if self.level.trim().is_empty() {
            return Err("Log level cannot be empty".to_string());
        }
        Ok(())
    }
}
