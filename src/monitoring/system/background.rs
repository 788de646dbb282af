//! Periodic sampling and cleanup tasks

use super::MonitoringSystem;
use crate::monitoring::types::SystemHealthSample;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Event retention for the production stores
const EVENT_RETENTION_HOURS: i64 = 24;

/// Take one health sample and store it
pub(super) fn sample_once(system: &MonitoringSystem) -> SystemHealthSample {
    let resources = system.resources().sample();
    let stats = system.production().stats();
    let sample = SystemHealthSample {
        timestamp: stats.now(),
        accelerator_memory_pct: resources.accelerator_memory_pct,
        cpu_pct: resources.cpu_pct,
        system_memory_pct: resources.system_memory_pct,
        disk_pct: resources.disk_pct,
        models_loaded: system.model_state().is_ready(),
        total_requests: system.production().counters().total_requests,
        error_rate_1h: stats.error_rate(1.0),
        avg_response_time_1h: stats.avg_response_time(1.0, None),
    };

    info!(
        "Health: GPU {:.1}%, CPU {:.1}%, RAM {:.1}%, active {}, error rate {:.1}%",
        sample.accelerator_memory_pct,
        sample.cpu_pct,
        sample.system_memory_pct,
        system.tracker().active_requests(),
        sample.error_rate_1h
    );
    system.production().log_health_sample(sample.clone());
    sample
}

/// Purge aged data and close abandoned requests; returns items removed
pub(super) fn cleanup_once(system: &MonitoringSystem) -> usize {
    let history = system.tracker().cleanup();
    let reaped = system.tracker().reap_abandoned(system.request_timeout).len();
    let events = system
        .production()
        .cleanup(chrono::Duration::hours(EVENT_RETENTION_HOURS));

    debug!(
        "Cleanup: {} history records, {} abandoned requests, {} events",
        history, reaped, events
    );
    history + reaped + events
}

fn spawn_periodic(
    system: &Arc<MonitoringSystem>,
    period: Duration,
    task: fn(&MonitoringSystem),
) -> JoinHandle<()> {
    // The loop ends once the context is dropped
    let system: Weak<MonitoringSystem> = Arc::downgrade(system);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.tick().await;
        loop {
            interval.tick().await;
            match system.upgrade() {
                Some(system) => task(&system),
                None => break,
            }
        }
    })
}

pub(super) fn spawn_sampler(system: Arc<MonitoringSystem>, period: Duration) -> JoinHandle<()> {
    spawn_periodic(&system, period, |s| {
        sample_once(s);
    })
}

pub(super) fn spawn_cleanup(system: Arc<MonitoringSystem>, period: Duration) -> JoinHandle<()> {
    spawn_periodic(&system, period, |s| {
        cleanup_once(s);
    })
}
