//! Generation defaults and request limits

use serde::{Deserialize, Serialize};

/// Default sampling parameters and input limits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_top_k")]
    pub top_k: u32,
    #[serde(default = "default_top_p")]
    pub top_p: f64,
    #[serde(default = "default_max_new_tokens")]
    pub max_new_tokens: u32,
    /// Output sample rate in Hz
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,
    /// Longest transcript accepted, in characters
    #[serde(default = "default_max_transcript_length")]
    pub max_transcript_length: usize,
}

pub fn default_temperature() -> f64 {
    1.0
}

pub fn default_top_k() -> u32 {
    50
}

pub fn default_top_p() -> f64 {
    0.95
}

pub fn default_max_new_tokens() -> u32 {
    2048
}

pub fn default_sample_rate() -> u32 {
    24_000
}

fn default_max_transcript_length() -> usize {
    10_000
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: default_temperature(),
            top_k: default_top_k(),
            top_p: default_top_p(),
            max_new_tokens: default_max_new_tokens(),
            sample_rate: default_sample_rate(),
            max_transcript_length: default_max_transcript_length(),
        }
    }
}
