//! The generation collaborator
//!
//! The model runs in a separate inference backend. [`RemoteGenerator`]
//! talks to it over HTTP: `GET /health` to warm up, `POST /generate` per
//! request. Backend responses may carry an accelerator memory report, which
//! is forwarded to a [`ReportedAccelerator`] so resource monitoring sees it.

use super::types::{GeneratedAudio, GenerationInput};
use crate::config::ModelConfig;
use crate::monitoring::resources::{AcceleratorMemory, ReportedAccelerator};
use crate::utils::error::{Result, ServiceError, is_resource_message};
use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use reqwest::StatusCode;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Opaque "generate audio from messages" collaborator
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AudioGenerator: Send + Sync {
    fn name(&self) -> &str;

    /// Load or wake the model; called once before serving
    async fn warm_up(&self) -> Result<()>;

    async fn generate(&self, input: &GenerationInput) -> Result<GeneratedAudio>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum SampleEncoding {
    #[default]
    Pcm16,
    F32,
}

#[derive(Debug, Deserialize)]
struct AcceleratorReport {
    #[serde(flatten)]
    memory: AcceleratorMemory,
    #[serde(default)]
    utilization: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    /// Base64 little-endian samples
    audio: String,
    #[serde(default)]
    encoding: SampleEncoding,
    sample_rate: u32,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    chunks_processed: Option<usize>,
    #[serde(default)]
    accelerator: Option<AcceleratorReport>,
}

#[derive(Debug, Default, Deserialize)]
struct BackendHealth {
    #[serde(default)]
    accelerator: Option<AcceleratorReport>,
}

/// HTTP client for the inference backend
#[derive(Debug, Clone)]
pub struct RemoteGenerator {
    client: reqwest::Client,
    base_url: String,
    accelerator: Option<Arc<ReportedAccelerator>>,
}

impl RemoteGenerator {
    pub fn new(config: &ModelConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.generate_timeout())
            .build()?;
        Ok(Self {
            client,
            base_url: config.backend_url.trim_end_matches('/').to_string(),
            accelerator: None,
        })
    }

    /// Forward backend accelerator reports to `probe`
    pub fn with_accelerator(mut self, probe: Arc<ReportedAccelerator>) -> Self {
        self.accelerator = Some(probe);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn report(&self, report: Option<AcceleratorReport>) {
        if let (Some(probe), Some(report)) = (&self.accelerator, report) {
            probe.update(report.memory, report.utilization);
        }
    }

    async fn error_from(response: reqwest::Response) -> ServiceError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = format!("backend returned {}: {}", status, body.trim());

        if status == StatusCode::INSUFFICIENT_STORAGE || is_resource_message(&body) {
            ServiceError::resource_exhausted(message)
        } else {
            ServiceError::generation(message)
        }
    }
}

#[async_trait]
impl AudioGenerator for RemoteGenerator {
    fn name(&self) -> &str {
        "remote"
    }

    async fn warm_up(&self) -> Result<()> {
        let url = format!("{}/health", self.base_url);
        info!("Waiting for inference backend at {}", url);

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }

        let health: BackendHealth = response.json().await.unwrap_or_default();
        self.report(health.accelerator);
        info!("Inference backend ready");
        Ok(())
    }

    async fn generate(&self, input: &GenerationInput) -> Result<GeneratedAudio> {
        let url = format!("{}/generate", self.base_url);
        debug!(
            "Requesting generation: {} messages, max_new_tokens={}",
            input.messages.len(),
            input.params.max_new_tokens
        );

        let started = Instant::now();
        let response = self.client.post(&url).json(input).send().await?;
        if !response.status().is_success() {
            let error = Self::error_from(response).await;
            warn!("Generation failed after {:?}: {}", started.elapsed(), error);
            return Err(error);
        }

        let body: GenerateResponse = response.json().await?;
        self.report(body.accelerator);

        let bytes = STANDARD
            .decode(body.audio.as_bytes())
            .map_err(|e| ServiceError::generation(format!("invalid audio payload: {}", e)))?;

        Ok(GeneratedAudio {
            samples: decode_samples(&bytes, body.encoding)?,
            sample_rate: body.sample_rate,
            text_output: body.text,
            chunks_processed: body.chunks_processed.unwrap_or(1),
        })
    }
}

fn decode_samples(bytes: &[u8], encoding: SampleEncoding) -> Result<Vec<f32>> {
    let width = match encoding {
        SampleEncoding::Pcm16 => 2,
        SampleEncoding::F32 => 4,
    };
    if bytes.len() % width != 0 {
        return Err(ServiceError::generation(format!(
            "audio payload of {} bytes is not a whole number of samples",
            bytes.len()
        )));
    }

    let samples = match encoding {
        SampleEncoding::Pcm16 => bytes
            .chunks_exact(2)
            .map(|b| i16::from_le_bytes([b[0], b[1]]) as f32 / 32768.0)
            .collect(),
        SampleEncoding::F32 => bytes
            .chunks_exact(4)
            .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
            .collect(),
    };
    Ok(samples)
}
