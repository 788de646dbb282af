//! Audio generation
//!
//! Everything between a validated request and encoded audio: the request
//! model, the generator collaborator, model warm-loading, the voice prompt
//! catalog and WAV encoding.

pub mod audio;
pub mod backend;
pub mod model;
pub mod request;
pub mod transcript;
pub mod types;
pub mod voices;

pub use audio::{WAV_CONTENT_TYPE, encode_wav, to_base64};
pub use backend::{AudioGenerator, RemoteGenerator};
pub use model::{ModelInfo, ModelManager};
pub use request::{EndpointType, GenerationRequest, RequestValidator};
pub use transcript::normalize_transcript;
pub use types::{ChatMessage, ChunkOptions, GeneratedAudio, GenerationInput, Role, SamplingParams};
pub use voices::{VoiceCatalog, VoiceReference, VoiceSuggestion, build_messages};
