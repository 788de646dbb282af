//! Health reporting types

use crate::monitoring::resources::SystemInfo;
use crate::monitoring::tracker::{FailureRecord, RecentPerformance, VoicePerformance};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Overall service status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
    /// Models are not loaded yet
    Initializing,
    /// Resource sampling failed outright
    Error,
}

impl HealthStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => "healthy",
            HealthStatus::Degraded => "degraded",
            HealthStatus::Unhealthy => "unhealthy",
            HealthStatus::Initializing => "initializing",
            HealthStatus::Error => "error",
        }
    }

    /// Whether the service can take generation traffic
    pub fn is_serving(&self) -> bool {
        matches!(self, HealthStatus::Healthy | HealthStatus::Degraded)
    }
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Model lifecycle as seen by health checks
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "reason", rename_all = "snake_case")]
pub enum ModelState {
    NotLoaded,
    Loading,
    Ready,
    Failed(String),
}

impl ModelState {
    pub fn is_ready(&self) -> bool {
        matches!(self, ModelState::Ready)
    }
}

/// Point-in-time health figures
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthMetrics {
    pub timestamp: DateTime<Utc>,
    pub status: HealthStatus,
    pub memory_usage_gb: f64,
    pub gpu_memory_gb: f64,
    pub gpu_utilization_percent: f64,
    pub models_loaded: bool,
    pub active_requests: usize,
    pub total_requests: u64,
    /// Rolling one-hour error rate, percent
    pub error_rate: f64,
    /// Rolling one-hour mean, seconds
    pub average_response_time: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthSummary {
    pub status: HealthStatus,
    pub uptime_seconds: f64,
    pub uptime_formatted: String,
    pub metrics: HealthMetrics,
    pub recent_performance: RecentPerformance,
    pub model_state: ModelState,
    pub version: &'static str,
    pub monitoring_enabled: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct DetailedMetrics {
    pub current_metrics: HealthMetrics,
    pub recent_errors: Vec<FailureRecord>,
    pub voice_usage: BTreeMap<String, u64>,
    pub performance_by_voice: BTreeMap<String, VoicePerformance>,
    pub system_info: SystemInfo,
}
