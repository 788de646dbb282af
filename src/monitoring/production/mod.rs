//! Process-wide request and error accounting
//!
//! [`ProductionMonitor`] owns the error and request event stores and the
//! lifetime counters. Every statistic it reports is recomputed from a store
//! snapshot, so two reads with no intervening events agree exactly.

mod types;

pub use types::{ErrorSummary, HealthSnapshot, MonitoringSummary};

use super::alerts::{AlertEvaluator, TriggeredAlert};
use super::stats::{EndpointStats, RollingStatsEngine, window_start};
use super::store::{DEFAULT_EVENT_CAPACITY, DEFAULT_HISTORY_CAPACITY, EventStore};
use super::types::{Counters, ErrorEvent, RequestEvent, SystemHealthSample};
use crate::config::MonitoringConfig;
use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use tracing::{debug, error};

/// Error and request stores plus lifetime counters
#[derive(Debug)]
pub struct ProductionMonitor {
    errors: EventStore<ErrorEvent>,
    requests: EventStore<RequestEvent>,
    health_samples: EventStore<SystemHealthSample>,
    counters: Mutex<Counters>,
    evaluator: AlertEvaluator,
}

impl Default for ProductionMonitor {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_EVENT_CAPACITY)
    }
}

impl ProductionMonitor {
    pub fn new(config: &MonitoringConfig) -> Self {
        Self {
            errors: EventStore::new(config.max_events),
            requests: EventStore::new(config.max_events),
            health_samples: EventStore::new(DEFAULT_HISTORY_CAPACITY),
            counters: Mutex::new(Counters::default()),
            evaluator: AlertEvaluator::new(config.alerts.clone()),
        }
    }

    /// Monitor with default thresholds and `max_events` per store
    pub fn with_capacity(max_events: usize) -> Self {
        Self::new(&MonitoringConfig {
            max_events,
            ..MonitoringConfig::default()
        })
    }

    /// Record a completed request
    pub fn log_request(&self, event: RequestEvent) {
        self.counters
            .lock()
            .record_request(&event.endpoint, event.success);
        self.requests.append(event);
    }

    /// Record a failure
    pub fn log_error(&self, event: ErrorEvent) {
        error!(
            request_id = event.request_id.as_deref().unwrap_or("-"),
            "Error in {}: {} - {}", event.endpoint, event.error_kind, event.error_message
        );
        self.counters.lock().record_error(&event.error_kind);
        self.errors.append(event);
    }

    pub fn log_health_sample(&self, sample: SystemHealthSample) {
        self.health_samples.append(sample);
    }

    pub fn latest_health_sample(&self) -> Option<SystemHealthSample> {
        self.health_samples.last()
    }

    /// Statistics over a snapshot of the request store as of now
    pub fn stats(&self) -> RollingStatsEngine {
        self.stats_at(Utc::now())
    }

    pub fn stats_at(&self, now: DateTime<Utc>) -> RollingStatsEngine {
        RollingStatsEngine::new(self.requests.snapshot(), now)
    }

    pub fn error_rate(&self, hours: f64) -> f64 {
        self.stats().error_rate(hours)
    }

    pub fn avg_response_time(&self, hours: f64, endpoint: Option<&str>) -> f64 {
        self.stats().avg_response_time(hours, endpoint)
    }

    pub fn endpoint_stats(&self) -> BTreeMap<String, EndpointStats> {
        self.stats().endpoint_stats()
    }

    /// Errors recorded within the last `hours`, oldest first
    pub fn recent_errors(&self, hours: f64) -> Vec<ErrorEvent> {
        self.errors.since(window_start(Utc::now(), hours))
    }

    pub fn error_summary(&self, hours: f64) -> ErrorSummary {
        let stats = self.stats();
        let errors = self.errors.since(window_start(stats.now(), hours));
        ErrorSummary::from_errors(&errors, stats.error_rate(hours))
    }

    /// Alert rules evaluated over the last hour
    pub fn evaluate_alerts(&self) -> Vec<TriggeredAlert> {
        let stats = self.stats();
        let errors_last_hour = self.errors.since(window_start(stats.now(), 1.0)).len();
        self.evaluator.evaluate(&stats, errors_last_hour)
    }

    /// Alert messages for the current window
    pub fn check_alerts(&self) -> Vec<String> {
        self.evaluate_alerts()
            .into_iter()
            .map(|alert| alert.message)
            .collect()
    }

    pub fn counters(&self) -> Counters {
        self.counters.lock().clone()
    }

    /// Dashboard payload
    pub fn monitoring_summary(&self) -> MonitoringSummary {
        self.summarize().0
    }

    /// Dashboard payload plus the alerts behind its `recent_alerts`
    pub(crate) fn summarize(&self) -> (MonitoringSummary, Vec<TriggeredAlert>) {
        let stats = self.stats();
        let counters = self.counters();
        let error_rate_1h = stats.error_rate(1.0);
        let errors = self.errors.snapshot();
        let errors_since = |hours: f64| -> Vec<ErrorEvent> {
            let start = window_start(stats.now(), hours);
            errors
                .iter()
                .filter(|e| e.timestamp >= start)
                .cloned()
                .collect()
        };
        let errors_1h = errors_since(1.0);
        let errors_24h = errors_since(24.0);

        let alerts = self.evaluator.evaluate(&stats, errors_1h.len());

        let summary = MonitoringSummary {
            timestamp: stats.now(),
            endpoint_stats: stats.endpoint_stats(),
            error_summary_24h: ErrorSummary::from_errors(&errors_24h, stats.error_rate(24.0)),
            error_summary_1h: ErrorSummary::from_errors(&errors_1h, error_rate_1h),
            recent_alerts: alerts.iter().map(|a| a.message.clone()).collect(),
            health_status: HealthSnapshot {
                error_rate_1h,
                avg_response_time_1h: stats.avg_response_time(1.0, None),
                total_requests: counters.total_requests,
                total_errors: counters.total_errors,
            },
            counters,
        };
        (summary, alerts)
    }

    /// Drop events older than `retention` from every store
    pub fn cleanup(&self, retention: Duration) -> usize {
        let cutoff = Utc::now() - retention;
        let removed = self.errors.purge_older_than(cutoff)
            + self.requests.purge_older_than(cutoff)
            + self.health_samples.purge_older_than(cutoff);
        debug!("Monitor cleanup removed {} aged events", removed);
        removed
    }

    pub fn request_count(&self) -> usize {
        self.requests.len()
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }
}
