//! Alert types and data structures

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, VecDeque};

/// Alert severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Info,
    Warning,
    Critical,
}

impl std::fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlertSeverity::Info => write!(f, "INFO"),
            AlertSeverity::Warning => write!(f, "WARNING"),
            AlertSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// A notification accepted for delivery
#[derive(Debug, Clone, Serialize)]
pub struct Alert {
    pub id: String,
    /// Cooldown key
    pub alert_type: String,
    pub severity: AlertSeverity,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Alert statistics
#[derive(Debug, Default, Clone, Serialize)]
pub struct AlertStats {
    /// Alerts accepted for delivery
    pub total_alerts: u64,
    /// Alerts dropped by the cooldown
    pub suppressed_alerts: u64,
    pub failed_notifications: u64,
    pub alerts_by_type: BTreeMap<String, u64>,
    pub last_alert: Option<DateTime<Utc>>,
}

/// Consolidated alert storage - single lock for related data
#[derive(Debug, Default)]
pub(super) struct AlertStorage {
    /// Last accepted time per alert type
    pub last_sent: HashMap<String, DateTime<Utc>>,
    pub history: VecDeque<Alert>,
    pub stats: AlertStats,
}
