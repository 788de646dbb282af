//! Production monitoring
//!
//! Bounded event stores feed rolling-window statistics, alert rules and the
//! health reports. [`MonitoringSystem`] ties the pieces together and is the
//! only type request handlers need.

pub mod alerts;
pub mod governor;
pub mod health;
pub mod production;
pub mod resources;
pub mod stats;
pub mod store;
pub mod system;
pub mod tracker;
pub mod types;

pub use alerts::{Alert, AlertManager, AlertSeverity, NotificationChannel, WebhookChannel};
pub use governor::{PerformanceGovernor, PerformanceSummary};
pub use health::{DetailedMetrics, HealthMetrics, HealthStatus, HealthSummary, ModelState};
pub use production::{MonitoringSummary, ProductionMonitor};
pub use resources::{
    AcceleratorMemory, AcceleratorProbe, NoAccelerator, ReportedAccelerator, ResourceMonitor,
};
pub use stats::RollingStatsEngine;
pub use store::EventStore;
pub use system::MonitoringSystem;
pub use tracker::{RequestContext, RequestLifecycleTracker, RequestOutcome};
pub use types::{ErrorEvent, RequestEvent};
