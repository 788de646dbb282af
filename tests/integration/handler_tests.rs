//! End-to-end handler flow against a fake inference backend

use crate::common::assertions::{assert_failure_contains, assert_success};
use crate::common::{FailingStorage, FakeBackend, RecordingStorage, TestContext};
use higgs_audio_serverless::monitoring::HealthStatus;
use higgs_audio_serverless::monitoring::alerts::CRITICAL_ALERT;
use serde_json::json;
use std::sync::Arc;

#[tokio::test]
async fn test_generation_returns_inline_wav() {
    let backend = FakeBackend::healthy(2).await;
    let ctx = TestContext::new(&backend.uri(), None);

    let output = ctx
        .run(json!({"transcript": "Good morning, everyone", "top_k": 40}))
        .await;

    assert_success(&output);
    assert_eq!(output["duration_seconds"], 2.0);
    assert_eq!(output["sample_rate"], 24_000);
    assert_eq!(output["text_output"], "generated");
    assert_eq!(output["metadata"]["generation_parameters"]["top_k"], 40);
    assert!(output["audio_url"].is_null());

    use base64::Engine as _;
    let wav = base64::engine::general_purpose::STANDARD
        .decode(output["audio_base64"].as_str().unwrap())
        .unwrap();
    assert_eq!(&wav[..4], b"RIFF");
    // 44-byte header plus 16-bit mono samples
    assert_eq!(wav.len(), 44 + 2 * 48_000);

    assert_eq!(backend.generate_calls().await, 1);
    assert_eq!(ctx.monitoring.health_summary().status, HealthStatus::Healthy);
}

#[tokio::test]
async fn test_upload_failure_does_not_fail_request() {
    let backend = FakeBackend::healthy(1).await;
    let ctx = TestContext::new(&backend.uri(), Some(Arc::new(FailingStorage)));

    let output = ctx
        .run(json!({"transcript": "Hello", "s3_bucket": "audio", "s3_key": "clips/hello.wav"}))
        .await;

    assert_success(&output);
    assert!(output["audio_url"].is_null());
    assert!(output["audio_base64"].is_string());

    let counters = ctx.monitoring.production().counters();
    assert_eq!(counters.successful_requests, 1);
    assert_eq!(counters.total_errors, 0);
}

#[tokio::test]
async fn test_upload_success_returns_url() {
    let backend = FakeBackend::healthy(1).await;
    let storage = Arc::new(RecordingStorage::default());
    let ctx = TestContext::new(&backend.uri(), Some(storage.clone()));

    let output = ctx
        .run(json!({"transcript": "Hello", "s3_bucket": "audio", "s3_key": "clips/hello.wav"}))
        .await;

    assert_eq!(output["audio_url"], "s3://audio/clips/hello.wav");
    assert!(output.get("audio_base64").is_none());

    let uploads = storage.uploads.lock();
    assert_eq!(uploads.len(), 1);
    assert_eq!(uploads[0].0, "audio");
    assert_eq!(&uploads[0].2[..4], b"RIFF");
}

#[tokio::test]
async fn test_backend_out_of_memory_raises_critical_alert() {
    let backend = FakeBackend::failing(500, "RuntimeError: CUDA out of memory").await;
    let ctx = TestContext::new(&backend.uri(), None);

    for _ in 0..2 {
        let output = ctx.run(json!({"transcript": "Hello"})).await;
        assert_failure_contains(&output, "CUDA out of memory");
        assert!(output["request_id"].is_string());
    }

    let stats = ctx.monitoring.alerts().stats();
    // critical alerts bypass the cooldown
    assert_eq!(stats.alerts_by_type[CRITICAL_ALERT], 2);
    assert_eq!(stats.suppressed_alerts, 0);

    let errors = ctx.monitoring.production().recent_errors(1.0);
    assert_eq!(errors.len(), 2);
    assert_eq!(errors[0].error_kind, "ResourceExhausted");
    assert_eq!(errors[0].endpoint, "text_to_speech");
}

#[tokio::test]
async fn test_backend_failure_is_reported_without_alert() {
    let backend = FakeBackend::failing(502, "bad gateway").await;
    let ctx = TestContext::new(&backend.uri(), None);

    let output = ctx.run(json!({"transcript": "Hello"})).await;
    assert_failure_contains(&output, "Internal error: Generation error");
    assert_eq!(ctx.monitoring.alerts().stats().total_alerts, 0);
    assert_eq!(ctx.monitoring.tracker().counters().failed_requests, 1);
}

#[tokio::test]
async fn test_unavailable_backend_reports_not_loaded() {
    let backend = FakeBackend::unavailable().await;
    let ctx = TestContext::new(&backend.uri(), None);

    let output = ctx.run(json!({"transcript": "Hello"})).await;
    assert_failure_contains(&output, "Models not loaded. Please wait for initialization.");
    assert_eq!(ctx.monitoring.health_summary().status, HealthStatus::Unhealthy);
    assert_eq!(backend.generate_calls().await, 0);
}

#[tokio::test]
async fn test_validation_errors_are_collected() {
    let backend = FakeBackend::healthy(1).await;
    let ctx = TestContext::new(&backend.uri(), None);

    let output = ctx
        .run(json!({"transcript": "  ", "top_p": 0, "max_new_tokens": 9000, "endpoint_type": "karaoke"}))
        .await;

    assert_failure_contains(
        &output,
        "Validation failed: transcript cannot be empty; top_p must be between 0 and 1; \
         max_new_tokens must be between 1 and 4096",
    );
    assert_eq!(backend.generate_calls().await, 0);
    assert_eq!(ctx.monitoring.production().counters().total_errors, 0);
}

#[tokio::test]
async fn test_voice_clone_forwards_reference() {
    let backend = FakeBackend::healthy(1).await;
    let ctx = TestContext::with_voices(&backend.uri(), None, &["belinda", "chadwick"]);

    let output = ctx
        .run(json!({"transcript": "Welcome", "ref_audio": "chadwick", "endpoint_type": "voice_cloning"}))
        .await;

    assert_success(&output);
    assert_eq!(output["metadata"]["voice_clone"], "chadwick");
    assert_eq!(output["voice_suggestions"].as_array().unwrap().len(), 2);

    let requests = backend.server.received_requests().await.unwrap();
    let generate = requests.iter().find(|r| r.url.path() == "/generate").unwrap();
    let body: serde_json::Value = serde_json::from_slice(&generate.body).unwrap();
    assert!(body["ref_audio_path"].as_str().unwrap().ends_with("chadwick.wav"));
    assert_eq!(body["messages"][1]["content"], "[SPEAKER:chadwick] Reference line.");

    let usage = ctx.monitoring.detailed_metrics().voice_usage;
    assert_eq!(usage["chadwick"], 1);
}

#[tokio::test]
async fn test_backend_accelerator_report_reaches_health() {
    let backend = FakeBackend::healthy(1).await;
    wiremock::Mock::given(wiremock::matchers::method("POST"))
        .and(wiremock::matchers::path("/generate"))
        .respond_with(wiremock::ResponseTemplate::new(200).set_body_json(json!({
            "audio": crate::common::backend::pcm16_payload(2400),
            "sample_rate": 24_000,
            "accelerator": {
                "allocated": 12_000_000_000u64,
                "reserved": 14_000_000_000u64,
                "peak": 13_000_000_000u64,
                "total": 24_000_000_000u64,
                "utilization": 90.0,
            },
        })))
        .with_priority(1)
        .mount(&backend.server)
        .await;
    let ctx = TestContext::new(&backend.uri(), None);

    assert_success(&ctx.run(json!({"transcript": "Hello"})).await);

    let metrics = ctx.monitoring.health_metrics();
    assert_eq!(metrics.gpu_memory_gb, 12.0);
    assert_eq!(metrics.gpu_utilization_percent, 90.0);
    assert_eq!(metrics.status, HealthStatus::Degraded);
}

#[tokio::test]
async fn test_health_event_reports_model_info() {
    let backend = FakeBackend::healthy(1).await;
    let ctx = TestContext::new(&backend.uri(), None);

    let health = ctx.handler.handle(&json!({"path": "/health"})).await;
    assert_eq!(health["status"], "initializing");
    assert_eq!(health["model_info"]["backend_url"], backend.uri());
    assert!(health["version"].is_string());
}
