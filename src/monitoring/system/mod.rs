//! The monitoring context
//!
//! [`MonitoringSystem`] is built once by the process entry point and shared
//! with every handler through an `Arc`. It owns the stores, the tracker, the
//! resource monitor, the governor and the alert manager, and assembles the
//! health, dashboard and metrics reports from them.

mod background;

use super::alerts::{AlertManager, AlertSeverity, CRITICAL_ALERT, PERFORMANCE_ALERT};
use super::governor::{PerformanceGovernor, PerformanceSummary};
use super::health::{
    DetailedMetrics, HealthMetrics, HealthStatus, HealthSummary, ModelState, classify,
    format_uptime, prometheus,
};
use super::production::{MonitoringSummary, ProductionMonitor};
use super::resources::{AcceleratorProbe, ResourceMonitor, ResourceSample};
use super::tracker::{RequestContext, RequestLifecycleTracker, RequestOutcome, RequestRecord};
use super::types::ErrorEvent;
use crate::config::{Config, HealthThresholds};
use crate::utils::error::{Result, ServiceError};
use crate::VERSION;
use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Number of failures listed in the detailed metrics
const RECENT_FAILURE_LIMIT: usize = 10;

/// Shared monitoring context
#[derive(Debug)]
pub struct MonitoringSystem {
    production: Arc<ProductionMonitor>,
    tracker: Arc<RequestLifecycleTracker>,
    resources: Arc<ResourceMonitor>,
    governor: Arc<PerformanceGovernor>,
    alerts: Arc<AlertManager>,
    thresholds: HealthThresholds,
    model_state: RwLock<ModelState>,
    started_at: DateTime<Utc>,
    started: Instant,
    request_timeout: Duration,
    sample_interval: Duration,
    cleanup_interval: Duration,
    export_dir: PathBuf,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl MonitoringSystem {
    pub fn new(config: &Config, probe: Arc<dyn AcceleratorProbe>) -> Self {
        let monitoring = &config.monitoring;
        let production = Arc::new(ProductionMonitor::new(monitoring));
        let resources = Arc::new(ResourceMonitor::new(
            probe,
            monitoring.performance_history_size,
            monitoring.governor.memory_pressure_ratio,
        ));

        Self {
            tracker: Arc::new(RequestLifecycleTracker::new(
                Arc::clone(&production),
                monitoring,
            )),
            governor: Arc::new(PerformanceGovernor::new(
                Arc::clone(&resources),
                monitoring.governor.clone(),
            )),
            alerts: Arc::new(AlertManager::from_config(monitoring)),
            production,
            resources,
            thresholds: monitoring.health.clone(),
            model_state: RwLock::new(ModelState::NotLoaded),
            started_at: Utc::now(),
            started: Instant::now(),
            request_timeout: config.server.request_timeout(),
            sample_interval: monitoring.sample_interval(),
            cleanup_interval: monitoring.cleanup_interval(),
            export_dir: monitoring.export_dir.clone(),
            tasks: Mutex::new(Vec::new()),
        }
    }

    /// Replace the alert manager, e.g. to attach extra channels
    pub fn with_alert_manager(mut self, alerts: AlertManager) -> Self {
        self.alerts = Arc::new(alerts);
        self
    }

    pub fn production(&self) -> &Arc<ProductionMonitor> {
        &self.production
    }

    pub fn tracker(&self) -> &Arc<RequestLifecycleTracker> {
        &self.tracker
    }

    pub fn resources(&self) -> &Arc<ResourceMonitor> {
        &self.resources
    }

    pub fn governor(&self) -> &Arc<PerformanceGovernor> {
        &self.governor
    }

    pub fn alerts(&self) -> &Arc<AlertManager> {
        &self.alerts
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Spawn the sampler, the cleanup task and the alert dispatcher
    pub fn start(self: &Arc<Self>) {
        let mut tasks = self.tasks.lock();
        if !tasks.is_empty() {
            debug!("Monitoring already started");
            return;
        }

        self.alerts.start();
        tasks.push(background::spawn_sampler(Arc::clone(self), self.sample_interval));
        tasks.push(background::spawn_cleanup(Arc::clone(self), self.cleanup_interval));
        info!(
            "Monitoring started: sampling every {:?}, cleanup every {:?}",
            self.sample_interval, self.cleanup_interval
        );
    }

    /// Abort background tasks and stop alert delivery
    pub fn stop(&self) {
        for task in self.tasks.lock().drain(..) {
            task.abort();
        }
        self.alerts.stop();
        info!("Monitoring stopped");
    }

    pub fn is_running(&self) -> bool {
        !self.tasks.lock().is_empty()
    }

    pub fn model_state(&self) -> ModelState {
        self.model_state.read().clone()
    }

    pub fn set_model_state(&self, state: ModelState) {
        debug!("Model state -> {:?}", state);
        *self.model_state.write() = state;
    }

    pub fn start_request(&self, request_id: &str, context: RequestContext) -> Result<()> {
        self.tracker.start_request(request_id, context)
    }

    pub fn end_request(&self, request_id: &str, outcome: RequestOutcome) -> Result<RequestRecord> {
        self.tracker.end_request(request_id, outcome)
    }

    /// Record a system failure; accelerator memory failures alert immediately
    ///
    /// Caller mistakes are not system faults and are ignored here.
    pub fn record_error(
        &self,
        error: &ServiceError,
        endpoint: &str,
        request_id: Option<&str>,
        input_length: Option<usize>,
    ) {
        if error.is_caller_error() {
            return;
        }

        let message = error.to_string();
        let mut event =
            ErrorEvent::new(error.kind(), &message, endpoint).with_stack_trace(format!("{:?}", error));
        if let Some(id) = request_id {
            event = event.with_request_id(id);
        }
        if let Some(length) = input_length {
            event = event.with_input_length(length);
        }
        self.production.log_error(event);

        if error.is_transient_resource() {
            self.alerts.notify(
                CRITICAL_ALERT,
                &format!("Memory error in {}: {}", endpoint, message),
                AlertSeverity::Critical,
            );
        }
    }

    pub fn uptime(&self) -> Duration {
        self.started.elapsed()
    }

    /// Current health figures and the status they classify to
    pub fn health_metrics(&self) -> HealthMetrics {
        let (status, sample) = match self.resources.try_sample() {
            Ok(sample) => (None, sample),
            Err(e) => {
                warn!("Health sampling failed: {}", e);
                (Some(HealthStatus::Error), ResourceSample::default())
            }
        };

        let stats = self.production.stats();
        let error_rate = stats.error_rate(1.0);
        let total_requests = self.production.counters().total_requests;
        let model_state = self.model_state();

        let status = match (&model_state, status) {
            (ModelState::Failed(_), _) => HealthStatus::Unhealthy,
            (_, Some(status)) => status,
            (state, None) if !state.is_ready() => HealthStatus::Initializing,
            _ => classify(
                &self.thresholds,
                sample.system_memory_used_gb,
                sample.accelerator_allocated_gb,
                total_requests,
                error_rate,
            ),
        };

        HealthMetrics {
            timestamp: stats.now(),
            status,
            memory_usage_gb: sample.system_memory_used_gb,
            gpu_memory_gb: sample.accelerator_allocated_gb,
            gpu_utilization_percent: sample.accelerator_utilization_pct,
            models_loaded: model_state.is_ready(),
            active_requests: self.tracker.active_requests(),
            total_requests,
            error_rate,
            average_response_time: stats.avg_response_time(1.0, None),
        }
    }

    pub fn health_summary(&self) -> HealthSummary {
        let metrics = self.health_metrics();
        let uptime = self.uptime();

        HealthSummary {
            status: metrics.status,
            uptime_seconds: uptime.as_secs_f64(),
            uptime_formatted: format_uptime(uptime.as_secs()),
            recent_performance: self.tracker.recent_performance(),
            model_state: self.model_state(),
            version: VERSION,
            monitoring_enabled: self.is_running(),
            metrics,
        }
    }

    /// Dashboard payload; escalated alerts are forwarded to the alert manager
    pub fn monitoring_dashboard(&self) -> MonitoringSummary {
        let (summary, alerts) = self.production.summarize();
        for alert in alerts.iter().filter(|a| a.rule.is_escalated()) {
            self.alerts
                .notify(PERFORMANCE_ALERT, &alert.message, alert.severity);
        }
        summary
    }

    pub fn detailed_metrics(&self) -> DetailedMetrics {
        DetailedMetrics {
            current_metrics: self.health_metrics(),
            recent_errors: self.tracker.recent_failures(RECENT_FAILURE_LIMIT),
            voice_usage: self.tracker.voice_usage(),
            performance_by_voice: self.tracker.performance_by_voice(),
            system_info: self.resources.system_info(),
        }
    }

    pub fn performance_summary(&self) -> PerformanceSummary {
        self.governor.performance_summary()
    }

    /// Prometheus text exposition
    pub fn prometheus_metrics(&self) -> String {
        prometheus::render(
            &self.health_metrics(),
            &self.tracker.counters(),
            self.uptime().as_secs_f64(),
        )
    }

    /// Export target for a caller-supplied file name, confined to the export directory
    pub fn export_file(&self, file_name: &str) -> Result<PathBuf> {
        let mut components = Path::new(file_name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(name)), None) if !file_name.contains(['/', '\\']) => {
                Ok(self.export_dir.join(name))
            }
            _ => Err(ServiceError::validation(format!(
                "Export file must be a plain file name: {:?}",
                file_name
            ))),
        }
    }

    /// Write the dashboard payload as pretty JSON, returning the path written
    pub async fn export_metrics(&self, path: Option<PathBuf>) -> Result<PathBuf> {
        let path = path.unwrap_or_else(|| {
            self.export_dir
                .join(format!("higgs_audio_metrics_{}.json", Utc::now().timestamp()))
        });

        let json = serde_json::to_string_pretty(&self.production.monitoring_summary())?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, json).await.map_err(|e| {
            ServiceError::monitoring(format!("Failed to export metrics to {:?}: {}", path, e))
        })?;

        info!("Metrics exported to {:?}", path);
        Ok(path)
    }
}

/// The sampler and cleanup loops hold a `Weak` and end on their own; the
/// alert dispatcher holds only its manager, so it is stopped here.
impl Drop for MonitoringSystem {
    fn drop(&mut self) {
        if self.alerts.is_active() {
            self.alerts.stop();
        }
    }
}
