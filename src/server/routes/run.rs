//! Serverless invocation endpoints

use crate::server::state::AppState;
use actix_web::{HttpResponse, Result as ActixResult, web};
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/run", web::post().to(run))
        .route("/runsync", web::post().to(run_sync));
}

/// Run an event and return the handler document as-is
pub async fn run_sync(
    state: web::Data<AppState>,
    event: web::Json<Value>,
) -> ActixResult<HttpResponse> {
    debug!("Synchronous run requested");
    let output = state.handler.handle(&event).await;
    Ok(HttpResponse::Ok().json(output))
}

/// Run an event, wrapping the result in a job record
///
/// Jobs complete before the response is written, so the status is always
/// `COMPLETED`.
pub async fn run(state: web::Data<AppState>, event: web::Json<Value>) -> ActixResult<HttpResponse> {
    let id = Uuid::new_v4().to_string();
    debug!(job_id = %id, "Run requested");

    let mut document = state.handler.handle(&event).await;
    if let Value::Object(fields) = &mut document {
        fields.insert("id".to_string(), Value::String(id));
        fields.insert("status".to_string(), Value::String("COMPLETED".to_string()));
    }
    Ok(HttpResponse::Ok().json(document))
}
