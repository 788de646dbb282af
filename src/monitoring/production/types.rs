//! Dashboard payload types

use crate::monitoring::stats::EndpointStats;
use crate::monitoring::types::{Counters, ErrorEvent};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Error breakdown over one window
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ErrorSummary {
    pub total_errors: usize,
    pub error_types: BTreeMap<String, u64>,
    pub endpoints_with_errors: BTreeMap<String, u64>,
    /// Request error rate over the same window, percent
    pub error_rate: f64,
}

impl ErrorSummary {
    pub(crate) fn from_errors(errors: &[ErrorEvent], error_rate: f64) -> Self {
        let mut summary = Self {
            total_errors: errors.len(),
            error_rate,
            ..Self::default()
        };
        for event in errors {
            *summary
                .error_types
                .entry(event.error_kind.clone())
                .or_insert(0) += 1;
            *summary
                .endpoints_with_errors
                .entry(event.endpoint.clone())
                .or_insert(0) += 1;
        }
        summary
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthSnapshot {
    pub error_rate_1h: f64,
    pub avg_response_time_1h: f64,
    pub total_requests: u64,
    pub total_errors: u64,
}

/// Everything the monitoring dashboard shows; also the metrics export schema
#[derive(Debug, Clone, Serialize)]
pub struct MonitoringSummary {
    pub timestamp: DateTime<Utc>,
    pub counters: Counters,
    pub endpoint_stats: BTreeMap<String, EndpointStats>,
    pub error_summary_24h: ErrorSummary,
    pub error_summary_1h: ErrorSummary,
    pub recent_alerts: Vec<String>,
    pub health_status: HealthSnapshot,
}
