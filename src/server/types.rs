//! Response envelope of the serverless handler

use crate::generation::VoiceSuggestion;
use serde::{Serialize, Serializer};

/// Sampling parameters as actually used, after governance
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationParameters {
    pub temperature: f64,
    pub top_k: u32,
    pub top_p: f64,
    pub max_new_tokens: u32,
    /// Seconds spent in the generator
    pub generation_time: f64,
    pub chunks_processed: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationMetadata {
    pub model_used: String,
    /// Voice prompt the audio was cloned from
    pub voice_clone: Option<String>,
    pub endpoint_type: String,
    pub request_id: String,
    pub generation_parameters: GenerationParameters,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationSuccess {
    pub audio_url: Option<String>,
    /// Inline WAV, present only when the audio was not uploaded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_base64: Option<String>,
    pub duration_seconds: f64,
    pub sample_rate: u32,
    pub text_output: Option<String>,
    pub metadata: GenerationMetadata,
    pub voice_suggestions: Vec<VoiceSuggestion>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationFailure {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

/// Result of one generation request, serialized with a `success` flag
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationOutcome {
    Success(Box<GenerationSuccess>),
    Failure(GenerationFailure),
}

impl GenerationOutcome {
    pub fn failure(error: impl Into<String>, request_id: Option<String>) -> Self {
        Self::Failure(GenerationFailure {
            error: error.into(),
            request_id,
        })
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Success(_) => None,
            Self::Failure(failure) => Some(&failure.error),
        }
    }
}

impl Serialize for GenerationOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Flagged<'a, T> {
            success: bool,
            #[serde(flatten)]
            body: &'a T,
        }

        match self {
            Self::Success(body) => Flagged {
                success: true,
                body: body.as_ref(),
            }
            .serialize(serializer),
            Self::Failure(body) => Flagged {
                success: false,
                body,
            }
            .serialize(serializer),
        }
    }
}

/// Wire shape of a handler response
#[derive(Debug, Clone, Serialize)]
pub struct HandlerResponse {
    pub output: GenerationOutcome,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_failure_serialization() {
        let outcome = GenerationOutcome::failure("Validation failed: Missing required field: transcript", None);
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            json!({"success": false, "error": "Validation failed: Missing required field: transcript"})
        );
        assert!(!outcome.is_success());
    }

    #[test]
    fn test_success_serialization() {
        let outcome = GenerationOutcome::Success(Box::new(GenerationSuccess {
            audio_url: None,
            audio_base64: Some("UklGRg==".to_string()),
            duration_seconds: 1.5,
            sample_rate: 24_000,
            text_output: None,
            metadata: GenerationMetadata {
                model_used: "model".to_string(),
                voice_clone: Some("belinda".to_string()),
                endpoint_type: "voice_cloning".to_string(),
                request_id: "req-1".to_string(),
                generation_parameters: GenerationParameters {
                    temperature: 0.9,
                    top_k: 50,
                    top_p: 0.95,
                    max_new_tokens: 512,
                    generation_time: 2.0,
                    chunks_processed: 1,
                },
            },
            voice_suggestions: Vec::new(),
        }));

        let value = serde_json::to_value(HandlerResponse { output: outcome }).unwrap();
        let output = &value["output"];
        assert_eq!(output["success"], true);
        assert!(output["audio_url"].is_null());
        assert_eq!(output["audio_base64"], "UklGRg==");
        assert_eq!(output["metadata"]["voice_clone"], "belinda");
        assert_eq!(output["metadata"]["generation_parameters"]["max_new_tokens"], 512);
    }
}
