//! Voice catalog endpoint

use crate::generation::voices::available_tones;
use crate::server::routes::ApiResponse;
use crate::server::state::AppState;
use actix_web::{HttpResponse, Result as ActixResult, web};
use serde_json::json;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/voices", web::get().to(list_voices));
}

/// Installed voices with descriptions, plus the tone presets
async fn list_voices(state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    let voices = state.handler.voices();
    Ok(ApiResponse::success(json!({
        "available": voices.available_voices(),
        "voices": voices.voice_suggestions(),
        "tones": available_tones(),
    }))
    .to_http_response())
}
