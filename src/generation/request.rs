//! Generation requests and their validation

use super::types::{ChunkOptions, SamplingParams};
use crate::config::GenerationConfig;
use crate::utils::error::{Result, ServiceError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

/// Category of generation request, used to bucket statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndpointType {
    #[default]
    TextToSpeech,
    VoiceCloning,
    MultiSpeaker,
    Vllm,
    SceneBased,
    Experimental,
}

impl EndpointType {
    pub const ALL: [EndpointType; 6] = [
        EndpointType::TextToSpeech,
        EndpointType::VoiceCloning,
        EndpointType::MultiSpeaker,
        EndpointType::Vllm,
        EndpointType::SceneBased,
        EndpointType::Experimental,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EndpointType::TextToSpeech => "text_to_speech",
            EndpointType::VoiceCloning => "voice_cloning",
            EndpointType::MultiSpeaker => "multi_speaker",
            EndpointType::Vllm => "vllm",
            EndpointType::SceneBased => "scene_based",
            EndpointType::Experimental => "experimental",
        }
    }
}

impl std::fmt::Display for EndpointType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EndpointType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|e| e.as_str() == s)
            .ok_or_else(|| format!("Unknown endpoint type: {}", s))
    }
}

/// A validated generation request
///
/// Sampling fields left unset fall back to the configured defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub transcript: String,
    /// Voice prompt to clone
    #[serde(default)]
    pub ref_audio: Option<String>,
    #[serde(default)]
    pub scene_prompt: Option<String>,
    /// Tone preset applied when no scene prompt is given
    #[serde(default)]
    pub tone: Option<String>,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub top_k: Option<u32>,
    #[serde(default)]
    pub top_p: Option<f64>,
    #[serde(default)]
    pub max_new_tokens: Option<u32>,
    #[serde(default)]
    pub chunk_method: Option<String>,
    #[serde(default = "default_chunk_max_word_num")]
    pub chunk_max_word_num: u32,
    #[serde(default = "default_chunk_max_num_turns")]
    pub chunk_max_num_turns: u32,
    #[serde(default = "default_ras_win_len")]
    pub ras_win_len: u32,
    #[serde(default = "default_ras_win_max_num_repeat")]
    pub ras_win_max_num_repeat: u32,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub s3_bucket: Option<String>,
    #[serde(default)]
    pub s3_key: Option<String>,
    #[serde(default)]
    pub endpoint_type: EndpointType,
}

fn default_chunk_max_word_num() -> u32 {
    200
}

fn default_chunk_max_num_turns() -> u32 {
    1
}

fn default_ras_win_len() -> u32 {
    7
}

fn default_ras_win_max_num_repeat() -> u32 {
    2
}

impl GenerationRequest {
    pub fn new(transcript: impl Into<String>) -> Self {
        Self {
            transcript: transcript.into(),
            ref_audio: None,
            scene_prompt: None,
            tone: None,
            temperature: None,
            top_k: None,
            top_p: None,
            max_new_tokens: None,
            chunk_method: None,
            chunk_max_word_num: default_chunk_max_word_num(),
            chunk_max_num_turns: default_chunk_max_num_turns(),
            ras_win_len: default_ras_win_len(),
            ras_win_max_num_repeat: default_ras_win_max_num_repeat(),
            seed: None,
            s3_bucket: None,
            s3_key: None,
            endpoint_type: EndpointType::default(),
        }
    }

    /// Requested parameters over the configured defaults
    pub fn sampling_params(&self, defaults: &GenerationConfig) -> SamplingParams {
        let base = SamplingParams::from_config(defaults);
        SamplingParams {
            temperature: self.temperature.unwrap_or(base.temperature),
            top_k: self.top_k.unwrap_or(base.top_k),
            top_p: self.top_p.unwrap_or(base.top_p),
            max_new_tokens: self.max_new_tokens.unwrap_or(base.max_new_tokens),
            ras_win_len: self.ras_win_len,
            ras_win_max_num_repeat: self.ras_win_max_num_repeat,
            seed: self.seed,
        }
    }

    pub fn chunk_options(&self) -> ChunkOptions {
        ChunkOptions {
            method: self.chunk_method.clone(),
            max_word_num: self.chunk_max_word_num,
            max_num_turns: self.chunk_max_num_turns,
        }
    }

    /// Upload target; the bucket falls back to `default_bucket`, the key is required
    pub fn upload_target<'a>(&'a self, default_bucket: Option<&'a str>) -> Option<(&'a str, &'a str)> {
        let key = self.s3_key.as_deref().filter(|k| !k.is_empty())?;
        let bucket = self
            .s3_bucket
            .as_deref()
            .or(default_bucket)
            .filter(|b| !b.is_empty())?;
        Some((bucket, key))
    }
}

/// Validates raw request input, reporting every violation at once
#[derive(Debug, Clone)]
pub struct RequestValidator {
    max_transcript_length: usize,
}

impl Default for RequestValidator {
    fn default() -> Self {
        Self::new(10_000)
    }
}

impl RequestValidator {
    pub fn new(max_transcript_length: usize) -> Self {
        Self {
            max_transcript_length,
        }
    }

    /// Every violation in `input`, empty when it is acceptable
    pub fn errors(&self, input: &Value) -> Vec<String> {
        let Some(fields) = input.as_object() else {
            return vec!["input must be a JSON object".to_string()];
        };
        let mut errors = Vec::new();

        match fields.get("transcript") {
            None => errors.push("Missing required field: transcript".to_string()),
            Some(Value::String(transcript)) => {
                if transcript.chars().count() > self.max_transcript_length {
                    errors.push(format!(
                        "transcript too long: max {} characters",
                        self.max_transcript_length
                    ));
                } else if transcript.trim().is_empty() {
                    errors.push("transcript cannot be empty".to_string());
                }
            }
            Some(_) => errors.push("transcript must be a string".to_string()),
        }

        if let Some(value) = present(fields, "temperature") {
            if !value.as_f64().is_some_and(|t| (0.0..=2.0).contains(&t)) {
                errors.push("temperature must be between 0 and 2".to_string());
            }
        }

        if let Some(value) = present(fields, "top_k") {
            if !value.as_i64().is_some_and(|k| (1..=100).contains(&k)) {
                errors.push("top_k must be between 1 and 100".to_string());
            }
        }

        if let Some(value) = present(fields, "top_p") {
            if !value.as_f64().is_some_and(|p| p > 0.0 && p <= 1.0) {
                errors.push("top_p must be between 0 and 1".to_string());
            }
        }

        if let Some(value) = present(fields, "max_new_tokens") {
            if !value.as_i64().is_some_and(|n| (1..=4096).contains(&n)) {
                errors.push("max_new_tokens must be between 1 and 4096".to_string());
            }
        }

        if let Some(value) = fields.get("endpoint_type") {
            let known = value
                .as_str()
                .is_some_and(|s| EndpointType::from_str(s).is_ok());
            if !known {
                let names: Vec<&str> = EndpointType::ALL.iter().map(|e| e.as_str()).collect();
                errors.push(format!("endpoint_type must be one of: {}", names.join(", ")));
            }
        }

        errors
    }

    /// Validate and parse `input`
    pub fn validate(&self, input: &Value) -> Result<GenerationRequest> {
        let errors = self.errors(input);
        if !errors.is_empty() {
            return Err(ServiceError::validation(format!(
                "Validation failed: {}",
                errors.join("; ")
            )));
        }

        serde_json::from_value(input.clone()).map_err(|e| {
            ServiceError::validation(format!("Validation failed: invalid request: {}", e))
        })
    }
}

/// A field that is set to something other than `null`
fn present<'a>(fields: &'a serde_json::Map<String, Value>, key: &str) -> Option<&'a Value> {
    fields.get(key).filter(|value| !value.is_null())
}
