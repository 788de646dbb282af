//! Alert system tests

use super::*;
use crate::config::AlertThresholds;
use crate::monitoring::stats::RollingStatsEngine;
use crate::monitoring::types::RequestEvent;
use chrono::{Duration as ChronoDuration, Utc};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn stats_with(n: usize, failures: usize, time: f64) -> RollingStatsEngine {
    let now = Utc::now();
    let events = (0..n)
        .map(|i| {
            RequestEvent::new("text_to_speech", time, i >= failures)
                .at(now - ChronoDuration::minutes(5))
        })
        .collect();
    RollingStatsEngine::new(events, now)
}

fn rules(alerts: &[TriggeredAlert]) -> Vec<AlertRule> {
    alerts.iter().map(|a| a.rule).collect()
}

#[test]
fn test_quiet_window_raises_nothing() {
    let evaluator = AlertEvaluator::default();
    assert!(evaluator.evaluate(&stats_with(0, 0, 0.0), 0).is_empty());
    assert!(evaluator.evaluate(&stats_with(100, 5, 15.0), 50).is_empty());
}

#[test]
fn test_error_rate_bands_are_exclusive() {
    let evaluator = AlertEvaluator::default();

    let high = evaluator.evaluate(&stats_with(15, 4, 1.0), 4);
    assert_eq!(rules(&high), vec![AlertRule::HighErrorRate]);
    assert_eq!(high[0].message, "HIGH ERROR RATE: 26.7% in last hour");

    let elevated = evaluator.evaluate(&stats_with(100, 8, 1.0), 8);
    assert_eq!(rules(&elevated), vec![AlertRule::ElevatedErrorRate]);
    assert_eq!(elevated[0].message, "Elevated error rate: 8.0% in last hour");
}

#[test]
fn test_response_time_bands() {
    let evaluator = AlertEvaluator::default();

    let slow = evaluator.evaluate(&stats_with(3, 0, 31.0), 0);
    assert_eq!(rules(&slow), vec![AlertRule::SlowResponse]);
    assert_eq!(slow[0].message, "SLOW RESPONSE: 31.0s average in last hour");

    let elevated = evaluator.evaluate(&stats_with(3, 0, 20.0), 0);
    assert_eq!(rules(&elevated), vec![AlertRule::ElevatedResponseTime]);
}

#[test]
fn test_rules_fire_independently() {
    let evaluator = AlertEvaluator::default();
    let alerts = evaluator.evaluate(&stats_with(10, 5, 45.0), 51);
    assert_eq!(
        rules(&alerts),
        vec![
            AlertRule::HighErrorRate,
            AlertRule::SlowResponse,
            AlertRule::HighErrorCount
        ]
    );
    assert_eq!(alerts[2].message, "HIGH ERROR COUNT: 51 errors in last hour");
    assert!(alerts.iter().all(|a| a.rule.is_escalated()));
}

#[test]
fn test_thresholds_are_configurable() {
    let evaluator = AlertEvaluator::new(AlertThresholds {
        error_rate_high: 50.0,
        error_rate_elevated: 30.0,
        ..AlertThresholds::default()
    });
    let alerts = evaluator.evaluate(&stats_with(15, 4, 1.0), 4);
    assert!(alerts.is_empty());
}

#[test]
fn test_cooldown_suppresses_repeats() {
    let manager = AlertManager::new(Duration::from_secs(300));
    let t0 = Utc::now();

    assert!(manager.notify_at("performance", "first", AlertSeverity::Critical, t0));
    assert!(!manager.notify_at(
        "performance",
        "second",
        AlertSeverity::Critical,
        t0 + ChronoDuration::seconds(120)
    ));
    assert!(manager.notify_at(
        "performance",
        "third",
        AlertSeverity::Critical,
        t0 + ChronoDuration::seconds(301)
    ));

    let stats = manager.stats();
    assert_eq!(stats.total_alerts, 2);
    assert_eq!(stats.suppressed_alerts, 1);
    assert_eq!(stats.alerts_by_type["performance"], 2);
}

#[test]
fn test_cooldown_is_per_type() {
    let manager = AlertManager::new(Duration::from_secs(300));
    let t0 = Utc::now();

    assert!(manager.notify_at("performance", "a", AlertSeverity::Warning, t0));
    assert!(manager.notify_at("memory", "b", AlertSeverity::Warning, t0));
}

#[test]
fn test_polling_does_not_bypass_cooldown() {
    let manager = AlertManager::new(Duration::from_secs(300));
    let t0 = Utc::now();

    let delivered = (0..100)
        .filter(|i| {
            manager.notify_at(
                "performance",
                "HIGH ERROR RATE",
                AlertSeverity::Critical,
                t0 + ChronoDuration::seconds(*i),
            )
        })
        .count();
    assert_eq!(delivered, 1);
}

#[test]
fn test_critical_type_bypasses_cooldown() {
    let manager = AlertManager::new(Duration::from_secs(300));
    let t0 = Utc::now();

    assert!(manager.notify_at(CRITICAL_ALERT, "CUDA out of memory", AlertSeverity::Critical, t0));
    assert!(manager.notify_at(
        CRITICAL_ALERT,
        "CUDA out of memory",
        AlertSeverity::Critical,
        t0 + ChronoDuration::seconds(1)
    ));
    assert_eq!(manager.stats().suppressed_alerts, 0);
}

#[test]
fn test_recent_alerts_newest_first() {
    let manager = AlertManager::new(Duration::from_secs(0));
    let t0 = Utc::now();
    for i in 0..5 {
        manager.notify_at(
            "performance",
            &format!("alert {}", i),
            AlertSeverity::Warning,
            t0 + ChronoDuration::seconds(i),
        );
    }

    let recent = manager.recent_alerts(2);
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].message, "alert 4");
    assert_eq!(recent[1].message, "alert 3");
}

#[test]
fn test_webhook_channel_severity_filter() {
    let channel = WebhookChannel::new("http://localhost/hook", AlertSeverity::Warning);
    assert_eq!(channel.name(), "webhook");
    assert!(channel.supports_severity(AlertSeverity::Critical));
    assert!(!channel.supports_severity(AlertSeverity::Info));
}

#[tokio::test]
async fn test_webhook_delivery() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hook"))
        .and(body_partial_json(serde_json::json!({
            "text": "🚨 Higgs Audio Alert [performance]: SLOW RESPONSE: 31.0s average in last hour"
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let channel = Arc::new(WebhookChannel::new(
        format!("{}/hook", server.uri()),
        AlertSeverity::Info,
    ));
    let manager = AlertManager::new(Duration::from_secs(300)).with_channel(channel);

    assert!(manager.notify(
        PERFORMANCE_ALERT,
        "SLOW RESPONSE: 31.0s average in last hour",
        AlertSeverity::Critical
    ));
    assert_eq!(manager.pending_count(), 1);

    manager.process_pending().await;
    assert_eq!(manager.pending_count(), 0);
    assert_eq!(manager.stats().failed_notifications, 0);
}

#[tokio::test]
async fn test_webhook_failure_is_counted() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let channel = Arc::new(WebhookChannel::new(server.uri(), AlertSeverity::Info));
    let manager = AlertManager::new(Duration::from_secs(300)).with_channel(channel);

    manager.notify("memory", "pressure", AlertSeverity::Warning);
    manager.process_pending().await;
    assert_eq!(manager.stats().failed_notifications, 1);
}
