//! Data exchanged with the generation backend

use crate::config::GenerationConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Sampling parameters handed to the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplingParams {
    pub temperature: f64,
    pub top_k: u32,
    pub top_p: f64,
    pub max_new_tokens: u32,
    pub ras_win_len: u32,
    pub ras_win_max_num_repeat: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self::from_config(&GenerationConfig::default())
    }
}

impl SamplingParams {
    pub fn from_config(config: &GenerationConfig) -> Self {
        Self {
            temperature: config.temperature,
            top_k: config.top_k,
            top_p: config.top_p,
            max_new_tokens: config.max_new_tokens,
            ras_win_len: 7,
            ras_win_max_num_repeat: 2,
            seed: None,
        }
    }
}

/// How the transcript is split before generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    pub max_word_num: u32,
    pub max_num_turns: u32,
}

impl Default for ChunkOptions {
    fn default() -> Self {
        Self {
            method: None,
            max_word_num: 200,
            max_num_turns: 1,
        }
    }
}

/// One call to the generation collaborator
#[derive(Debug, Clone, Serialize)]
pub struct GenerationInput {
    pub messages: Vec<ChatMessage>,
    #[serde(flatten)]
    pub params: SamplingParams,
    pub chunking: ChunkOptions,
    /// `[SPEAKERn]` tags present in the transcript
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub speaker_tags: Vec<String>,
    /// Voice prompt audio the backend should condition on
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ref_audio_path: Option<String>,
}

/// Mono audio produced by the backend
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedAudio {
    /// Samples in [-1.0, 1.0]
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    pub text_output: Option<String>,
    pub chunks_processed: usize,
}

impl GeneratedAudio {
    /// Length in seconds
    pub fn duration_seconds(&self) -> f64 {
        if self.sample_rate == 0 {
            0.0
        } else {
            self.samples.len() as f64 / self.sample_rate as f64
        }
    }
}
