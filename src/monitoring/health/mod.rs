//! Health summary, detailed metrics and Prometheus text
//!
//! Reports are assembled by [`MonitoringSystem`](crate::monitoring::MonitoringSystem);
//! this module holds the payload types and the pure pieces.

pub mod prometheus;
mod status;
mod types;

pub use status::{classify, format_uptime};
pub use types::{DetailedMetrics, HealthMetrics, HealthStatus, HealthSummary, ModelState};
