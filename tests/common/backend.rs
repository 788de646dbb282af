//! Fake inference backend

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub struct FakeBackend {
    pub server: MockServer,
}

/// PCM16 payload of `samples` copies of a quarter-scale sample
pub fn pcm16_payload(samples: usize) -> String {
    let bytes: Vec<u8> = std::iter::repeat_n(8192i16, samples)
        .flat_map(|s| s.to_le_bytes())
        .collect();
    STANDARD.encode(bytes)
}

impl FakeBackend {
    /// Backend that is healthy and returns `seconds` of audio at 24kHz
    pub async fn healthy(seconds: usize) -> Self {
        let server = MockServer::start().await;
        Self::mount_health(&server, 200).await;

        Mock::given(method("POST"))
            .and(path("/generate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "audio": pcm16_payload(24_000 * seconds),
                "sample_rate": 24_000,
                "text": "generated",
                "chunks_processed": 1,
            })))
            .mount(&server)
            .await;

        Self { server }
    }

    /// Backend that loads but fails every generation with `status` and `body`
    pub async fn failing(status: u16, body: &str) -> Self {
        let server = MockServer::start().await;
        Self::mount_health(&server, 200).await;

        Mock::given(method("POST"))
            .and(path("/generate"))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&server)
            .await;

        Self { server }
    }

    /// Backend whose health check never succeeds
    pub async fn unavailable() -> Self {
        let server = MockServer::start().await;
        Self::mount_health(&server, 503).await;
        Self { server }
    }

    async fn mount_health(server: &MockServer, status: u16) {
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({})))
            .mount(server)
            .await;
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// Number of generate calls received
    pub async fn generate_calls(&self) -> usize {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|r| r.url.path() == "/generate")
            .count()
    }
}
