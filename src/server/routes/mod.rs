//! HTTP route modules

pub mod health;
pub mod monitoring;
pub mod run;
pub mod voices;

use actix_web::{HttpResponse, web};
use serde::Serialize;

/// Envelope for JSON endpoints other than the serverless ones
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// HTTP 200 for successful responses, HTTP 400 otherwise
    pub fn to_http_response(&self) -> HttpResponse {
        if self.success {
            HttpResponse::Ok().json(self)
        } else {
            HttpResponse::BadRequest().json(self)
        }
    }
}

impl ApiResponse<()> {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Register every route
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(run::configure_routes)
        .configure(health::configure_routes)
        .configure(monitoring::configure_routes)
        .configure(voices::configure_routes);
}
