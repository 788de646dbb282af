//! Event and sample types recorded by the monitoring system

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Anything carrying a creation time, used for age-based purges
pub trait Timestamped {
    fn timestamp(&self) -> DateTime<Utc>;
}

/// A failure observed while serving a request
#[derive(Debug, Clone, Serialize)]
pub struct ErrorEvent {
    pub timestamp: DateTime<Utc>,
    pub error_kind: String,
    pub error_message: String,
    pub endpoint: String,
    pub request_id: Option<String>,
    pub stack_trace: Option<String>,
    pub input_length: Option<usize>,
}

impl ErrorEvent {
    pub fn new(
        error_kind: impl Into<String>,
        error_message: impl Into<String>,
        endpoint: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            error_kind: error_kind.into(),
            error_message: error_message.into(),
            endpoint: endpoint.into(),
            request_id: None,
            stack_trace: None,
            input_length: None,
        }
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    pub fn with_input_length(mut self, input_length: usize) -> Self {
        self.input_length = Some(input_length);
        self
    }

    pub fn with_stack_trace(mut self, stack_trace: impl Into<String>) -> Self {
        self.stack_trace = Some(stack_trace.into());
        self
    }

    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}

impl Timestamped for ErrorEvent {
    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// A completed request
#[derive(Debug, Clone, Serialize)]
pub struct RequestEvent {
    pub timestamp: DateTime<Utc>,
    pub endpoint: String,
    /// Seconds
    pub processing_time: f64,
    pub success: bool,
    pub input_length: usize,
    pub audio_length_seconds: Option<f64>,
    pub memory_usage_gb: Option<f64>,
    pub request_id: Option<String>,
}

impl RequestEvent {
    pub fn new(endpoint: impl Into<String>, processing_time: f64, success: bool) -> Self {
        Self {
            timestamp: Utc::now(),
            endpoint: endpoint.into(),
            processing_time,
            success,
            input_length: 0,
            audio_length_seconds: None,
            memory_usage_gb: None,
            request_id: None,
        }
    }

    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}

impl Timestamped for RequestEvent {
    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// Point-in-time system health, taken by the background sampler
#[derive(Debug, Clone, Serialize)]
pub struct SystemHealthSample {
    pub timestamp: DateTime<Utc>,
    pub accelerator_memory_pct: f64,
    pub cpu_pct: f64,
    pub system_memory_pct: f64,
    pub disk_pct: f64,
    pub models_loaded: bool,
    pub total_requests: u64,
    pub error_rate_1h: f64,
    pub avg_response_time_1h: f64,
}

impl Timestamped for SystemHealthSample {
    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// Resource usage around one measured operation
#[derive(Debug, Clone, Serialize)]
pub struct PerformanceMetrics {
    pub label: String,
    pub timestamp: DateTime<Utc>,
    /// Seconds
    pub processing_time: f64,
    /// Accelerator memory in GB
    pub accel_mem_before: f64,
    pub accel_mem_after: f64,
    pub accel_mem_peak: f64,
    /// Percent, averaged over before/after
    pub cpu_usage: f64,
    pub system_memory_usage: f64,
}

impl Timestamped for PerformanceMetrics {
    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// Process-lifetime counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Counters {
    pub total_requests: u64,
    pub successful_requests: u64,
    pub failed_requests: u64,
    pub total_errors: u64,
    pub requests_by_endpoint: BTreeMap<String, u64>,
    pub errors_by_kind: BTreeMap<String, u64>,
}

impl Counters {
    pub(crate) fn record_request(&mut self, endpoint: &str, success: bool) {
        self.total_requests += 1;
        *self
            .requests_by_endpoint
            .entry(endpoint.to_string())
            .or_insert(0) += 1;
        if success {
            self.successful_requests += 1;
        } else {
            self.failed_requests += 1;
        }
    }

    pub(crate) fn record_error(&mut self, error_kind: &str) {
        self.total_errors += 1;
        *self.errors_by_kind.entry(error_kind.to_string()).or_insert(0) += 1;
    }
}

/// Convert bytes to gigabytes (10^9, matching accelerator tooling)
pub(crate) fn bytes_to_gb(bytes: u64) -> f64 {
    bytes as f64 / 1e9
}

/// Percentage of `part` in `whole`, zero when `whole` is zero
pub(crate) fn percent(part: f64, whole: f64) -> f64 {
    if whole > 0.0 { part / whole * 100.0 } else { 0.0 }
}
