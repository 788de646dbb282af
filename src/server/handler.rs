//! The serverless request handler
//!
//! One event in, one `{"output": ...}` document out. Every handled failure
//! becomes a `success: false` outcome; nothing here returns a transport
//! error.

use super::types::{
    GenerationMetadata, GenerationOutcome, GenerationParameters, GenerationSuccess,
    HandlerResponse,
};
use crate::config::Config;
use crate::generation::transcript::speaker_tags;
use crate::generation::voices::{
    DEFAULT_SCENE_PROMPT, DEFAULT_SYSTEM_MESSAGE, scene_prompt_for_tone, system_message_for_tone,
};
use crate::generation::{
    GenerationInput, GenerationRequest, ModelInfo, ModelManager, RequestValidator, VoiceCatalog,
    VoiceReference, VoiceSuggestion, build_messages, encode_wav, normalize_transcript, to_base64,
};
use crate::monitoring::health::HealthSummary;
use crate::monitoring::types::PerformanceMetrics;
use crate::monitoring::{MonitoringSystem, RequestContext, RequestOutcome};
use crate::storage::{ObjectStorage, upload_best_effort};
use crate::utils::error::{Result, ServiceError};
use bytes::Bytes;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Health document returned for health-check events
#[derive(Debug, Clone, Serialize)]
pub struct HandlerHealth {
    #[serde(flatten)]
    pub summary: HealthSummary,
    pub model_info: ModelInfo,
    pub voice_suggestions: Vec<VoiceSuggestion>,
}

pub struct ServerlessHandler {
    config: Arc<Config>,
    validator: RequestValidator,
    models: Arc<ModelManager>,
    voices: Arc<VoiceCatalog>,
    storage: Option<Arc<dyn ObjectStorage>>,
    monitoring: Arc<MonitoringSystem>,
}

impl ServerlessHandler {
    pub fn new(
        config: Arc<Config>,
        models: Arc<ModelManager>,
        voices: Arc<VoiceCatalog>,
        storage: Option<Arc<dyn ObjectStorage>>,
        monitoring: Arc<MonitoringSystem>,
    ) -> Self {
        Self {
            validator: RequestValidator::new(config.generation.max_transcript_length),
            config,
            models,
            voices,
            storage,
            monitoring,
        }
    }

    pub fn models(&self) -> &Arc<ModelManager> {
        &self.models
    }

    pub fn voices(&self) -> &Arc<VoiceCatalog> {
        &self.voices
    }

    pub fn monitoring(&self) -> &Arc<MonitoringSystem> {
        &self.monitoring
    }

    /// Dispatch a raw serverless event
    ///
    /// Events with `"path": "/health"` or a truthy `health_check` get the
    /// health document; everything else is a generation request read from
    /// `input`.
    pub async fn handle(&self, event: &Value) -> Value {
        if is_health_event(event) {
            return serde_json::to_value(self.health_check()).unwrap_or_else(|e| {
                error!("Failed to serialize health document: {}", e);
                serde_json::json!({"status": "error", "error": e.to_string()})
            });
        }

        let empty = Value::Object(Default::default());
        let input = event.get("input").unwrap_or(&empty);
        let response = HandlerResponse {
            output: self.generate(input).await,
        };
        serde_json::to_value(response).unwrap_or_else(|e| {
            error!("Failed to serialize handler output: {}", e);
            serde_json::json!({"output": {"success": false, "error": format!("Internal error: {}", e)}})
        })
    }

    pub fn health_check(&self) -> HandlerHealth {
        HandlerHealth {
            summary: self.monitoring.health_summary(),
            model_info: self.models.model_info(),
            voice_suggestions: self.voices.voice_suggestions(),
        }
    }

    /// Validate `input` and run it through the model
    pub async fn generate(&self, input: &Value) -> GenerationOutcome {
        let request = match self.validator.validate(input) {
            Ok(request) => request,
            Err(e) => {
                debug!("Rejected request: {}", e);
                return GenerationOutcome::failure(user_message(&e), None);
            }
        };

        let request_id = Uuid::new_v4().to_string();
        let endpoint = request.endpoint_type.as_str();
        let input_length = request.transcript.chars().count();

        let mut context = RequestContext::new(endpoint).with_text_length(input_length);
        if let Some(voice) = &request.ref_audio {
            context = context.with_voice(voice.as_str());
        }
        if let Err(e) = self.monitoring.start_request(&request_id, context) {
            warn!(request_id = %request_id, "Request tracking unavailable: {}", e);
        }

        match self.run(&request, &request_id).await {
            Ok((success, metrics)) => {
                let outcome = RequestOutcome::success(Some(success.duration_seconds))
                    .with_memory_usage(metrics.accel_mem_peak);
                self.finish(&request_id, outcome);
                info!(
                    request_id = %request_id,
                    endpoint,
                    "Generated {:.2}s of audio in {:.2}s",
                    success.duration_seconds,
                    success.metadata.generation_parameters.generation_time
                );
                GenerationOutcome::Success(Box::new(success))
            }
            Err(e) => {
                error!(request_id = %request_id, endpoint, "Generation failed: {}", e);
                self.monitoring
                    .record_error(&e, endpoint, Some(&request_id), Some(input_length));
                self.finish(&request_id, RequestOutcome::failure(e.to_string()));
                GenerationOutcome::failure(user_message(&e), Some(request_id))
            }
        }
    }

    fn finish(&self, request_id: &str, outcome: RequestOutcome) {
        if let Err(e) = self.monitoring.end_request(request_id, outcome) {
            warn!(request_id, "Failed to close request: {}", e);
        }
    }

    async fn run(
        &self,
        request: &GenerationRequest,
        request_id: &str,
    ) -> Result<(GenerationSuccess, PerformanceMetrics)> {
        self.models.initialize().await?;

        let transcript = normalize_transcript(&request.transcript);
        let voice = self.resolve_voice(request, &transcript).await;

        let tone = request.tone.as_deref().filter(|t| !t.is_empty());
        let scene_prompt = match (request.scene_prompt.as_deref().filter(|s| !s.is_empty()), tone) {
            (Some(scene), _) => scene.to_string(),
            (None, Some(tone)) => scene_prompt_for_tone(tone, None),
            (None, None) => DEFAULT_SCENE_PROMPT.to_string(),
        };
        let system_message = tone.map_or(DEFAULT_SYSTEM_MESSAGE, system_message_for_tone);

        let params = self
            .monitoring
            .governor()
            .optimize_parameters(&request.sampling_params(&self.config.generation));

        let input = GenerationInput {
            messages: build_messages(&transcript, system_message, &scene_prompt, voice.as_ref()),
            params,
            chunking: request.chunk_options(),
            speaker_tags: speaker_tags(&transcript),
            ref_audio_path: voice
                .as_ref()
                .map(|v| v.audio_path.to_string_lossy().into_owned()),
        };

        let measurement = self
            .monitoring
            .resources()
            .scoped_measurement(request.endpoint_type.as_str());
        let started = Instant::now();
        let audio = self.models.generator().generate(&input).await?;
        let generation_time = started.elapsed().as_secs_f64();
        let metrics = measurement.finish();

        let wav = Bytes::from(encode_wav(&audio.samples, audio.sample_rate)?);
        let default_bucket = self
            .config
            .storage
            .s3
            .as_ref()
            .and_then(|s3| s3.default_bucket.as_deref());
        let audio_url = match request.upload_target(default_bucket) {
            Some((bucket, key)) => {
                upload_best_effort(self.storage.as_deref(), wav.clone(), bucket, key).await
            }
            None => None,
        };
        let audio_base64 = audio_url.is_none().then(|| to_base64(&wav));

        let success = GenerationSuccess {
            audio_url,
            audio_base64,
            duration_seconds: audio.duration_seconds(),
            sample_rate: audio.sample_rate,
            text_output: audio.text_output,
            metadata: GenerationMetadata {
                model_used: self.config.model.model_path.clone(),
                voice_clone: voice.map(|v| v.name),
                endpoint_type: request.endpoint_type.to_string(),
                request_id: request_id.to_string(),
                generation_parameters: GenerationParameters {
                    temperature: input.params.temperature,
                    top_k: input.params.top_k,
                    top_p: input.params.top_p,
                    max_new_tokens: input.params.max_new_tokens,
                    generation_time,
                    chunks_processed: audio.chunks_processed,
                },
            },
            voice_suggestions: self.voices.voice_suggestions(),
        };
        Ok((success, metrics))
    }

    /// The requested voice prompt, or the best installed suggestion
    async fn resolve_voice(
        &self,
        request: &GenerationRequest,
        transcript: &str,
    ) -> Option<VoiceReference> {
        let requested = request
            .ref_audio
            .as_deref()
            .filter(|v| !v.is_empty() && *v != "default")?;

        let name = if self.voices.is_available(requested) {
            requested.to_string()
        } else {
            let suggestions = self
                .voices
                .suggest_voices(transcript, request.scene_prompt.as_deref());
            let fallback = suggestions.into_iter().next()?;
            warn!("Voice {} not available, using {}", requested, fallback);
            if !self.voices.is_available(&fallback) {
                return None;
            }
            fallback
        };

        let text = self.voices.voice_text(&name).await.unwrap_or_default();
        let audio_path = self.voices.voice_audio_path(&name)?;
        Some(VoiceReference {
            name,
            text,
            audio_path,
        })
    }
}

fn is_health_event(event: &Value) -> bool {
    event.get("path").and_then(Value::as_str) == Some("/health")
        || event
            .get("health_check")
            .is_some_and(|v| v.as_bool().unwrap_or(!v.is_null()))
}

/// Error text shown to callers
fn user_message(error: &ServiceError) -> String {
    match error {
        ServiceError::Validation(message) | ServiceError::NotReady(message) => message.clone(),
        ServiceError::Internal(message) => format!("Internal error: {}", message),
        other => format!("Internal error: {}", other),
    }
}
