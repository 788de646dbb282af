//! Monitoring invariants across components

use higgs_audio_serverless::Config;
use higgs_audio_serverless::generation::SamplingParams;
use higgs_audio_serverless::monitoring::alerts::AlertSeverity;
use higgs_audio_serverless::monitoring::resources::{AcceleratorMemory, ReportedAccelerator};
use higgs_audio_serverless::monitoring::{
    AlertManager, EventStore, HealthStatus, ModelState, MonitoringSystem, RequestContext,
    RequestOutcome, WebhookChannel,
};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn system(accelerator: Arc<ReportedAccelerator>) -> Arc<MonitoringSystem> {
    let mut config = Config::default();
    config.monitoring.health.system_memory_gb = 1e9;
    config.monitoring.export_dir = std::env::temp_dir();
    let system = Arc::new(MonitoringSystem::new(&config, accelerator));
    system.set_model_state(ModelState::Ready);
    system
}

#[test]
fn test_degraded_by_error_rate() {
    let monitoring = system(Arc::new(ReportedAccelerator::new()));

    for i in 0..15 {
        let id = format!("req-{i}");
        monitoring
            .start_request(&id, RequestContext::new("text_to_speech"))
            .unwrap();
        let outcome = if i < 4 {
            RequestOutcome::failure("backend error")
        } else {
            RequestOutcome::success(Some(1.0))
        };
        monitoring.end_request(&id, outcome).unwrap();
    }

    let summary = monitoring.health_summary();
    assert_eq!(summary.status, HealthStatus::Degraded);
    assert!((summary.metrics.error_rate - 4.0 / 15.0 * 100.0).abs() < 1e-9);
    assert_eq!(summary.metrics.total_requests, 15);

    let again = monitoring.health_summary();
    assert_eq!(again.metrics.error_rate, summary.metrics.error_rate);
    assert_eq!(again.metrics.average_response_time, summary.metrics.average_response_time);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_active_count_returns_to_zero() {
    let monitoring = system(Arc::new(ReportedAccelerator::new()));

    let tasks: Vec<_> = (0..64)
        .map(|i| {
            let monitoring = Arc::clone(&monitoring);
            tokio::spawn(async move {
                let id = format!("req-{i}");
                let context = RequestContext::new("text_to_speech").with_voice("belinda");
                monitoring.start_request(&id, context).unwrap();
                tokio::task::yield_now().await;
                monitoring
                    .end_request(&id, RequestOutcome::success(Some(0.5)))
                    .unwrap();
            })
        })
        .collect();

    for task in tasks {
        task.await.unwrap();
    }

    let tracker = monitoring.tracker();
    assert_eq!(tracker.active_requests(), 0);
    assert_eq!(tracker.counters().total_requests, 64);
    assert_eq!(tracker.voice_usage()["belinda"], 64);
}

#[test]
fn test_memory_pressure_shrinks_parameters() {
    let accelerator = Arc::new(ReportedAccelerator::new());
    let monitoring = system(Arc::clone(&accelerator));

    accelerator.update(
        AcceleratorMemory {
            allocated: 21_000_000_000,
            reserved: 22_000_000_000,
            peak: 21_000_000_000,
            total: 24_000_000_000,
        },
        None,
    );

    let base = SamplingParams {
        max_new_tokens: 1024,
        temperature: 0.15,
        ..SamplingParams::default()
    };
    let tuned = monitoring.governor().optimize_parameters(&base);
    assert_eq!(tuned.max_new_tokens, 512);
    assert_eq!(tuned.temperature, 0.1);

    let recommendations = monitoring.governor().recommendations();
    assert!(recommendations.iter().any(|r| r.contains("memory")));
}

#[test]
fn test_event_store_keeps_newest() {
    let store = EventStore::new(5);
    for i in 0..12 {
        store.append(i);
    }
    assert_eq!(store.snapshot(), vec![7, 8, 9, 10, 11]);
    assert_eq!(store.evicted(), 7);
}

#[tokio::test]
async fn test_webhook_receives_alert_once_per_cooldown() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hook"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let manager = Arc::new(
        AlertManager::new(Duration::from_secs(300)).with_channel(Arc::new(WebhookChannel::new(
            format!("{}/hook", server.uri()),
            AlertSeverity::Warning,
        ))),
    );
    manager.start();

    assert!(manager.notify("performance", "HIGH ERROR RATE: 12.0% in last hour", AlertSeverity::Critical));
    assert!(!manager.notify("performance", "HIGH ERROR RATE: 13.0% in last hour", AlertSeverity::Critical));

    for _ in 0..50 {
        if manager.pending_count() == 0
            && !server.received_requests().await.unwrap_or_default().is_empty()
        {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    manager.stop();

    let received = server.received_requests().await.unwrap();
    assert_eq!(received.len(), 1);
    let payload: serde_json::Value = serde_json::from_slice(&received[0].body).unwrap();
    assert!(payload["text"].as_str().unwrap().contains("HIGH ERROR RATE"));
    assert_eq!(manager.stats().suppressed_alerts, 1);
}

#[tokio::test]
async fn test_export_writes_dashboard() {
    let monitoring = system(Arc::new(ReportedAccelerator::new()));
    monitoring
        .start_request("req-1", RequestContext::new("voice_cloning"))
        .unwrap();
    monitoring
        .end_request("req-1", RequestOutcome::success(Some(3.0)))
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = monitoring
        .export_metrics(Some(dir.path().join("metrics.json")))
        .await
        .unwrap();

    let exported: serde_json::Value =
        serde_json::from_str(&tokio::fs::read_to_string(path).await.unwrap()).unwrap();
    assert_eq!(exported["counters"]["total_requests"], 1);
    assert!(exported["endpoint_stats"]["voice_cloning"].is_object());
}
