//! Health status classification

use super::types::HealthStatus;
use crate::config::HealthThresholds;

/// Classify a serving process as healthy or degraded
pub fn classify(
    thresholds: &HealthThresholds,
    system_memory_gb: f64,
    accelerator_memory_gb: f64,
    total_requests: u64,
    error_rate_pct: f64,
) -> HealthStatus {
    if system_memory_gb > thresholds.system_memory_gb
        || accelerator_memory_gb > thresholds.accelerator_memory_gb
    {
        return HealthStatus::Degraded;
    }

    if total_requests > thresholds.min_requests && error_rate_pct > thresholds.error_rate_pct {
        return HealthStatus::Degraded;
    }

    HealthStatus::Healthy
}

/// `H:MM:SS`, prefixed with `N day(s), ` past one day
pub fn format_uptime(seconds: u64) -> String {
    let days = seconds / 86_400;
    let rest = seconds % 86_400;
    let clock = format!("{}:{:02}:{:02}", rest / 3600, (rest % 3600) / 60, rest % 60);
    match days {
        0 => clock,
        1 => format!("1 day, {}", clock),
        n => format!("{} days, {}", n, clock),
    }
}
