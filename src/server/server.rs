//! HTTP server core implementation

use crate::config::{Config, ServerConfig};
use crate::server::routes;
use crate::server::state::AppState;
use crate::utils::error::{Result, ServiceError};
use actix_cors::Cors;
use actix_web::{
    App, HttpServer as ActixHttpServer,
    middleware::{DefaultHeaders, Logger},
    web,
};
use tracing::{info, warn};
use tracing_actix_web::TracingLogger;

/// HTTP server
pub struct HttpServer {
    config: ServerConfig,
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server with production collaborators
    pub fn new(config: &Config) -> Result<Self> {
        info!("Creating HTTP server");
        Ok(Self::with_state(AppState::from_config(config.clone())?))
    }

    /// Create a server around an already wired state
    pub fn with_state(state: AppState) -> Self {
        Self {
            config: state.config.server.clone(),
            state,
        }
    }

    fn cors(config: &ServerConfig) -> Cors {
        if config.cors_allowed_origins.is_empty() {
            return Cors::permissive();
        }

        config
            .cors_allowed_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
            .allow_any_method()
            .allow_any_header()
    }

    /// Create the Actix-web application
    pub(crate) fn create_app(
        state: web::Data<AppState>,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        let server = &state.config.server;
        let cors = Self::cors(server);
        let json = web::JsonConfig::default().limit(server.max_body_size);

        App::new()
            .app_data(state)
            .app_data(json)
            .wrap(cors)
            .wrap(Logger::default())
            .wrap(TracingLogger::default())
            .wrap(DefaultHeaders::new().add(("Server", "higgs-audio-serverless")))
            .configure(routes::configure_routes)
    }

    /// Start the HTTP server and the monitoring tasks
    pub async fn start(self) -> Result<()> {
        let bind_addr = self.config.address();
        info!("Starting HTTP server on {}", bind_addr);

        let monitoring = self.state.monitoring.clone();
        monitoring.start();

        if self.state.config.model.warm_up {
            let handler = self.state.handler.clone();
            tokio::spawn(async move {
                if let Err(e) = handler.models().initialize().await {
                    warn!("Model warm-up failed, will retry on first request: {}", e);
                }
            });
        }

        let state = web::Data::new(self.state);
        let mut server = ActixHttpServer::new(move || Self::create_app(state.clone()))
            .client_request_timeout(self.config.request_timeout());
        if let Some(workers) = self.config.workers {
            server = server.workers(workers);
        }

        let server = server
            .bind(&bind_addr)
            .map_err(|e| ServiceError::config(format!("Failed to bind {}: {}", bind_addr, e)))?
            .run();

        info!("HTTP server listening on {}", bind_addr);
        let result = server.await;
        monitoring.stop();

        result.map_err(|e| ServiceError::internal(format!("Server error: {}", e)))?;
        info!("HTTP server stopped");
        Ok(())
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }
}
