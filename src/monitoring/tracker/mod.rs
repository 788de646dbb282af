//! Request lifecycle tracking
//!
//! Each request id moves `unstarted -> active -> completed`. Starting an id
//! that is already active is rejected, as is ending an id that is not
//! active, so the active count is always the size of the active map and can
//! never go negative. Completed requests feed the [`ProductionMonitor`]
//! request store.

mod types;

pub use types::{
    DURATION_BUCKETS, DurationHistogram, FailureRecord, RecentPerformance, RequestContext,
    RequestOutcome, RequestRecord, TrackerCounters, UNKNOWN_VOICE, VoicePerformance,
};

use super::production::ProductionMonitor;
use super::stats::window_start;
use super::store::EventStore;
use super::types::{ErrorEvent, RequestEvent};
use crate::config::MonitoringConfig;
use crate::utils::error::{Result, ServiceError};
use chrono::Utc;
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};
use types::ActiveRequest;

/// Error kind recorded for requests closed by the reconciliation sweep
pub const ABANDONED_KIND: &str = "Abandoned";

#[derive(Debug, Default)]
struct TrackerState {
    active: HashMap<String, ActiveRequest>,
    counters: TrackerCounters,
}

#[derive(Debug)]
pub struct RequestLifecycleTracker {
    monitor: Arc<ProductionMonitor>,
    state: Mutex<TrackerState>,
    history: EventStore<RequestRecord>,
    history_max_age: chrono::Duration,
}

impl RequestLifecycleTracker {
    pub fn new(monitor: Arc<ProductionMonitor>, config: &MonitoringConfig) -> Self {
        Self {
            monitor,
            state: Mutex::new(TrackerState::default()),
            history: EventStore::new(config.request_history_size),
            history_max_age: chrono::Duration::seconds(config.request_history_max_age as i64),
        }
    }

    /// Mark `request_id` active
    pub fn start_request(&self, request_id: &str, context: RequestContext) -> Result<()> {
        let mut state = self.state.lock();
        if state.active.contains_key(request_id) {
            return Err(ServiceError::DuplicateRequest(request_id.to_string()));
        }

        debug!(request_id, endpoint = %context.endpoint, "Request started");
        state.active.insert(
            request_id.to_string(),
            ActiveRequest {
                context,
                started_at: Utc::now(),
                started: Instant::now(),
            },
        );
        state.counters.total_requests += 1;
        Ok(())
    }

    /// Complete an active request and record it
    pub fn end_request(&self, request_id: &str, outcome: RequestOutcome) -> Result<RequestRecord> {
        let record = {
            let mut state = self.state.lock();
            let active = state
                .active
                .remove(request_id)
                .ok_or_else(|| ServiceError::UnknownRequest(request_id.to_string()))?;
            let record = Self::complete(request_id, active, outcome.clone());
            state.counters.record_end(
                record.voice.as_deref().unwrap_or(UNKNOWN_VOICE),
                record.success,
                record.duration,
            );
            record
        };

        debug!(
            request_id,
            success = record.success,
            "Request finished in {:.2}s", record.duration
        );
        self.publish(&record, outcome.memory_usage_gb);
        Ok(record)
    }

    fn complete(request_id: &str, active: ActiveRequest, outcome: RequestOutcome) -> RequestRecord {
        let duration = active.started.elapsed().as_secs_f64();
        RequestRecord {
            request_id: request_id.to_string(),
            endpoint: active.context.endpoint,
            voice: active.context.voice,
            text_length: active.context.text_length,
            start_time: active.started_at,
            end_time: Utc::now(),
            duration,
            success: outcome.success,
            error_message: outcome.error_message,
            audio_duration: outcome.audio_duration,
        }
    }

    fn publish(&self, record: &RequestRecord, memory_usage_gb: Option<f64>) {
        let mut event = RequestEvent::new(&record.endpoint, record.duration, record.success);
        event.input_length = record.text_length;
        event.audio_length_seconds = record.audio_duration;
        event.memory_usage_gb = memory_usage_gb;
        event.request_id = Some(record.request_id.clone());
        self.monitor.log_request(event);
        self.history.append(record.clone());
    }

    /// Force-close requests active for at least `timeout` as failures
    pub fn reap_abandoned(&self, timeout: Duration) -> Vec<RequestRecord> {
        let reaped: Vec<RequestRecord> = {
            let mut state = self.state.lock();
            let expired: Vec<String> = state
                .active
                .iter()
                .filter(|(_, active)| active.started.elapsed() >= timeout)
                .map(|(id, _)| id.clone())
                .collect();

            expired
                .into_iter()
                .filter_map(|id| {
                    let active = state.active.remove(&id)?;
                    let record =
                        Self::complete(&id, active, RequestOutcome::failure("abandoned"));
                    state.counters.abandoned_requests += 1;
                    state.counters.record_end(
                        record.voice.as_deref().unwrap_or(UNKNOWN_VOICE),
                        false,
                        record.duration,
                    );
                    Some(record)
                })
                .collect()
        };

        for record in &reaped {
            warn!(
                request_id = %record.request_id,
                "Request abandoned after {:.0}s without completion", record.duration
            );
            self.publish(record, None);
            self.monitor.log_error(
                ErrorEvent::new(ABANDONED_KIND, "abandoned", &record.endpoint)
                    .with_request_id(&record.request_id)
                    .with_input_length(record.text_length),
            );
        }
        reaped
    }

    pub fn active_requests(&self) -> usize {
        self.state.lock().active.len()
    }

    pub fn counters(&self) -> TrackerCounters {
        self.state.lock().counters.clone()
    }

    /// Completed requests still in the history
    pub fn history(&self) -> Vec<RequestRecord> {
        self.history.snapshot()
    }

    /// Drop history older than the configured age
    pub fn cleanup(&self) -> usize {
        self.history.purge_older_than(Utc::now() - self.history_max_age)
    }

    /// Requests per voice over the history
    pub fn voice_usage(&self) -> BTreeMap<String, u64> {
        let mut usage = BTreeMap::new();
        for record in self.history.snapshot() {
            if let Some(voice) = record.voice {
                *usage.entry(voice).or_insert(0) += 1;
            }
        }
        usage
    }

    pub fn performance_by_voice(&self) -> BTreeMap<String, VoicePerformance> {
        let mut grouped: BTreeMap<String, Vec<RequestRecord>> = BTreeMap::new();
        for record in self.history.snapshot() {
            if let Some(voice) = record.voice.clone() {
                grouped.entry(voice).or_default().push(record);
            }
        }

        grouped
            .into_iter()
            .map(|(voice, records)| {
                let n = records.len() as f64;
                let performance = VoicePerformance {
                    request_count: records.len(),
                    average_duration: records.iter().map(|r| r.duration).sum::<f64>() / n,
                    success_rate: records.iter().filter(|r| r.success).count() as f64 / n * 100.0,
                    average_audio_duration: records
                        .iter()
                        .map(|r| r.audio_duration.unwrap_or(0.0))
                        .sum::<f64>()
                        / n,
                };
                (voice, performance)
            })
            .collect()
    }

    pub fn recent_performance(&self) -> RecentPerformance {
        let recent = self.history.since(window_start(Utc::now(), 1.0));
        if recent.is_empty() {
            return RecentPerformance {
                requests_last_hour: 0,
                success_rate_last_hour: 100.0,
                average_duration_last_hour: 0.0,
            };
        }

        let n = recent.len() as f64;
        RecentPerformance {
            requests_last_hour: recent.len(),
            success_rate_last_hour: recent.iter().filter(|r| r.success).count() as f64 / n * 100.0,
            average_duration_last_hour: recent.iter().map(|r| r.duration).sum::<f64>() / n,
        }
    }

    /// Newest `limit` failures from the last hour, oldest first
    pub fn recent_failures(&self, limit: usize) -> Vec<FailureRecord> {
        let start = window_start(Utc::now(), 1.0);
        let failures: Vec<FailureRecord> = self
            .history
            .snapshot_filtered(|r| !r.success && r.error_message.is_some() && r.start_time >= start)
            .into_iter()
            .map(|r| FailureRecord {
                request_id: r.request_id,
                error: r.error_message,
                timestamp: r.start_time,
                voice: r.voice,
            })
            .collect();
        let skip = failures.len().saturating_sub(limit);
        failures.into_iter().skip(skip).collect()
    }
}
