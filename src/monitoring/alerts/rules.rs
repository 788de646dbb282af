//! Threshold rules evaluated over the last hour

use super::types::AlertSeverity;
use crate::config::AlertThresholds;
use crate::monitoring::stats::RollingStatsEngine;
use serde::Serialize;

/// The rule that produced an alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertRule {
    HighErrorRate,
    ElevatedErrorRate,
    SlowResponse,
    ElevatedResponseTime,
    HighErrorCount,
}

impl AlertRule {
    /// High-severity rules are forwarded to notification channels
    pub fn is_escalated(self) -> bool {
        matches!(
            self,
            AlertRule::HighErrorRate | AlertRule::SlowResponse | AlertRule::HighErrorCount
        )
    }

    pub fn severity(self) -> AlertSeverity {
        if self.is_escalated() {
            AlertSeverity::Critical
        } else {
            AlertSeverity::Warning
        }
    }
}

/// One rule firing, with the value that tripped it
#[derive(Debug, Clone, Serialize)]
pub struct TriggeredAlert {
    pub rule: AlertRule,
    pub severity: AlertSeverity,
    pub value: f64,
    pub message: String,
}

impl TriggeredAlert {
    fn new(rule: AlertRule, value: f64, message: String) -> Self {
        Self {
            rule,
            severity: rule.severity(),
            value,
            message,
        }
    }
}

impl std::fmt::Display for TriggeredAlert {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Evaluates alert rules; rules are independent, bands within one metric are exclusive
#[derive(Debug, Clone, Default)]
pub struct AlertEvaluator {
    thresholds: AlertThresholds,
}

impl AlertEvaluator {
    pub fn new(thresholds: AlertThresholds) -> Self {
        Self { thresholds }
    }

    /// Evaluate against the last hour of `stats` and the last hour's error count
    pub fn evaluate(&self, stats: &RollingStatsEngine, errors_last_hour: usize) -> Vec<TriggeredAlert> {
        let t = &self.thresholds;
        let mut alerts = Vec::new();

        let error_rate = stats.error_rate(1.0);
        if error_rate > t.error_rate_high {
            alerts.push(TriggeredAlert::new(
                AlertRule::HighErrorRate,
                error_rate,
                format!("HIGH ERROR RATE: {:.1}% in last hour", error_rate),
            ));
        } else if error_rate > t.error_rate_elevated {
            alerts.push(TriggeredAlert::new(
                AlertRule::ElevatedErrorRate,
                error_rate,
                format!("Elevated error rate: {:.1}% in last hour", error_rate),
            ));
        }

        let avg_response_time = stats.avg_response_time(1.0, None);
        if avg_response_time > t.response_time_slow {
            alerts.push(TriggeredAlert::new(
                AlertRule::SlowResponse,
                avg_response_time,
                format!("SLOW RESPONSE: {:.1}s average in last hour", avg_response_time),
            ));
        } else if avg_response_time > t.response_time_elevated {
            alerts.push(TriggeredAlert::new(
                AlertRule::ElevatedResponseTime,
                avg_response_time,
                format!(
                    "Elevated response time: {:.1}s average in last hour",
                    avg_response_time
                ),
            ));
        }

        if errors_last_hour > t.error_count_high {
            alerts.push(TriggeredAlert::new(
                AlertRule::HighErrorCount,
                errors_last_hour as f64,
                format!("HIGH ERROR COUNT: {} errors in last hour", errors_last_hour),
            ));
        }

        alerts
    }
}
