//! Monitoring dashboard, performance and metrics endpoints

use crate::server::routes::ApiResponse;
use crate::server::state::AppState;
use actix_web::{HttpResponse, Result as ActixResult, web};
use serde::Deserialize;
use tracing::{debug, error, warn};

/// Prometheus text exposition content type
const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/monitoring")
            .route("/dashboard", web::get().to(dashboard))
            .route("/performance", web::get().to(performance))
            .route("/export", web::post().to(export)),
    )
    .route("/metrics", web::get().to(metrics));
}

#[derive(Debug, Default, Deserialize)]
pub struct ExportRequest {
    /// File name inside the export directory; timestamped when absent
    pub path: Option<String>,
}

async fn dashboard(state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    debug!("Dashboard requested");
    Ok(ApiResponse::success(state.monitoring.monitoring_dashboard()).to_http_response())
}

async fn performance(state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    Ok(ApiResponse::success(state.monitoring.performance_summary()).to_http_response())
}

async fn metrics(state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok()
        .content_type(PROMETHEUS_CONTENT_TYPE)
        .body(state.monitoring.prometheus_metrics()))
}

async fn export(
    state: web::Data<AppState>,
    body: Option<web::Json<ExportRequest>>,
) -> ActixResult<HttpResponse> {
    let request = body.map(web::Json::into_inner).unwrap_or_default();
    let target = match request.path.as_deref().map(|name| state.monitoring.export_file(name)) {
        Some(Err(e)) => {
            warn!("Rejected metrics export: {}", e);
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error(e.to_string())));
        }
        Some(Ok(path)) => Some(path),
        None => None,
    };

    match state.monitoring.export_metrics(target).await {
        Ok(path) => Ok(ApiResponse::success(serde_json::json!({
            "path": path.to_string_lossy(),
        }))
        .to_http_response()),
        Err(e) => {
            error!("Metrics export failed: {}", e);
            Ok(HttpResponse::InternalServerError().json(ApiResponse::error(e.to_string())))
        }
    }
}
