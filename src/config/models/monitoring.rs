//! Monitoring configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Monitoring configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    /// Capacity of each error/request event store
    #[serde(default = "default_max_events")]
    pub max_events: usize,
    /// Capacity of the per-request lifecycle history
    #[serde(default = "default_history_size")]
    pub request_history_size: usize,
    /// Lifecycle records older than this are purged, in seconds
    #[serde(default = "default_history_max_age")]
    pub request_history_max_age: u64,
    /// Number of performance measurements retained
    #[serde(default = "default_history_size")]
    pub performance_history_size: usize,
    /// Seconds between repeated notifications of one alert type
    #[serde(default = "default_alert_cooldown")]
    pub alert_cooldown: u64,
    /// Webhook receiving alert notifications
    pub alert_webhook_url: Option<String>,
    /// Seconds between background health samples
    #[serde(default = "default_sample_interval")]
    pub sample_interval: u64,
    /// Seconds between cleanup passes
    #[serde(default = "default_cleanup_interval")]
    pub cleanup_interval: u64,
    /// Directory for metrics exports
    #[serde(default = "default_export_dir")]
    pub export_dir: PathBuf,
    #[serde(default)]
    pub health: HealthThresholds,
    #[serde(default)]
    pub alerts: AlertThresholds,
    #[serde(default)]
    pub governor: GovernorConfig,
}

fn default_max_events() -> usize {
    10_000
}

fn default_history_size() -> usize {
    1_000
}

fn default_history_max_age() -> u64 {
    3600
}

fn default_alert_cooldown() -> u64 {
    300
}

fn default_sample_interval() -> u64 {
    10
}

fn default_cleanup_interval() -> u64 {
    300
}

fn default_export_dir() -> PathBuf {
    PathBuf::from("/tmp")
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            max_events: default_max_events(),
            request_history_size: default_history_size(),
            request_history_max_age: default_history_max_age(),
            performance_history_size: default_history_size(),
            alert_cooldown: default_alert_cooldown(),
            alert_webhook_url: None,
            sample_interval: default_sample_interval(),
            cleanup_interval: default_cleanup_interval(),
            export_dir: default_export_dir(),
            health: HealthThresholds::default(),
            alerts: AlertThresholds::default(),
            governor: GovernorConfig::default(),
        }
    }
}

impl MonitoringConfig {
    pub fn alert_cooldown(&self) -> Duration {
        Duration::from_secs(self.alert_cooldown)
    }

    pub fn sample_interval(&self) -> Duration {
        Duration::from_secs(self.sample_interval)
    }

    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval)
    }

    pub fn request_history_max_age(&self) -> Duration {
        Duration::from_secs(self.request_history_max_age)
    }
}

/// Thresholds that move the health status to degraded
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthThresholds {
    /// Used system memory, in GB
    #[serde(default = "default_system_memory_gb")]
    pub system_memory_gb: f64,
    /// Used accelerator memory, in GB
    #[serde(default = "default_accelerator_memory_gb")]
    pub accelerator_memory_gb: f64,
    /// Recent error rate, in percent
    #[serde(default = "default_error_rate_pct")]
    pub error_rate_pct: f64,
    /// Requests needed before the error rate counts
    #[serde(default = "default_min_requests")]
    pub min_requests: u64,
}

fn default_system_memory_gb() -> f64 {
    15.0
}

fn default_accelerator_memory_gb() -> f64 {
    10.0
}

fn default_error_rate_pct() -> f64 {
    20.0
}

fn default_min_requests() -> u64 {
    10
}

impl Default for HealthThresholds {
    fn default() -> Self {
        Self {
            system_memory_gb: default_system_memory_gb(),
            accelerator_memory_gb: default_accelerator_memory_gb(),
            error_rate_pct: default_error_rate_pct(),
            min_requests: default_min_requests(),
        }
    }
}

/// Alert rule thresholds evaluated over the last hour
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertThresholds {
    #[serde(default = "default_error_rate_high")]
    pub error_rate_high: f64,
    #[serde(default = "default_error_rate_elevated")]
    pub error_rate_elevated: f64,
    /// Seconds
    #[serde(default = "default_response_time_slow")]
    pub response_time_slow: f64,
    /// Seconds
    #[serde(default = "default_response_time_elevated")]
    pub response_time_elevated: f64,
    #[serde(default = "default_error_count_high")]
    pub error_count_high: usize,
}

fn default_error_rate_high() -> f64 {
    10.0
}

fn default_error_rate_elevated() -> f64 {
    5.0
}

fn default_response_time_slow() -> f64 {
    30.0
}

fn default_response_time_elevated() -> f64 {
    15.0
}

fn default_error_count_high() -> usize {
    50
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            error_rate_high: default_error_rate_high(),
            error_rate_elevated: default_error_rate_elevated(),
            response_time_slow: default_response_time_slow(),
            response_time_elevated: default_response_time_elevated(),
            error_count_high: default_error_count_high(),
        }
    }
}

/// Parameter governance under load
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GovernorConfig {
    /// Accelerator allocated/total ratio above which memory is under pressure
    #[serde(default = "default_pressure_ratio")]
    pub memory_pressure_ratio: f64,
    /// Token budget cap applied when throttling
    #[serde(default = "default_throttled_max_tokens")]
    pub throttled_max_new_tokens: u32,
    #[serde(default = "default_temperature_step")]
    pub temperature_step: f64,
    #[serde(default = "default_min_temperature")]
    pub min_temperature: f64,
    /// Average processing time, in seconds, treated as slow
    #[serde(default = "default_slow_processing")]
    pub slow_processing_secs: f64,
    /// Number of recent measurements averaged
    #[serde(default = "default_recent_window")]
    pub recent_window: usize,
    #[serde(default = "default_batch_cpu_pct")]
    pub batch_max_cpu_pct: f64,
    #[serde(default = "default_batch_accelerator_pct")]
    pub batch_max_accelerator_pct: f64,
}

fn default_pressure_ratio() -> f64 {
    0.8
}

fn default_throttled_max_tokens() -> u32 {
    512
}

fn default_temperature_step() -> f64 {
    0.1
}

fn default_min_temperature() -> f64 {
    0.1
}

fn default_slow_processing() -> f64 {
    10.0
}

fn default_recent_window() -> usize {
    10
}

fn default_batch_cpu_pct() -> f64 {
    60.0
}

fn default_batch_accelerator_pct() -> f64 {
    70.0
}

impl Default for GovernorConfig {
    fn default() -> Self {
        Self {
            memory_pressure_ratio: default_pressure_ratio(),
            throttled_max_new_tokens: default_throttled_max_tokens(),
            temperature_step: default_temperature_step(),
            min_temperature: default_min_temperature(),
            slow_processing_secs: default_slow_processing(),
            recent_window: default_recent_window(),
            batch_max_cpu_pct: default_batch_cpu_pct(),
            batch_max_accelerator_pct: default_batch_accelerator_pct(),
        }
    }
}
