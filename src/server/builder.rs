//! Server builder

use crate::config::Config;
use crate::server::server::HttpServer;
use crate::server::state::AppState;
use crate::utils::error::{Result, ServiceError};

/// Server builder for easier configuration
#[derive(Default)]
pub struct ServerBuilder {
    config: Option<Config>,
    state: Option<AppState>,
}

impl ServerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Use pre-wired collaborators instead of building them from config
    pub fn with_state(mut self, state: AppState) -> Self {
        self.state = Some(state);
        self
    }

    /// Build the HTTP server
    pub fn build(self) -> Result<HttpServer> {
        if let Some(state) = self.state {
            return Ok(HttpServer::with_state(state));
        }

        let config = self
            .config
            .ok_or_else(|| ServiceError::Config("Configuration is required".to_string()))?;
        HttpServer::new(&config)
    }
}
