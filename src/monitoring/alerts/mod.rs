//! Alert evaluation and delivery
//!
//! [`AlertEvaluator`] turns rolling statistics into triggered alerts on every
//! poll. [`AlertManager`] decides which of those reach a notification
//! channel: repeats of one alert type inside the cooldown window are
//! suppressed, however often the evaluator is polled.

mod channels;
mod manager;
mod rules;
#[cfg(test)]
mod tests;
mod types;

pub use channels::{NotificationChannel, WebhookChannel};
pub use manager::AlertManager;
pub use rules::{AlertEvaluator, AlertRule, TriggeredAlert};
pub use types::{Alert, AlertSeverity, AlertStats};

/// Alert type used for forwarded high-severity rule alerts
pub const PERFORMANCE_ALERT: &str = "performance";

/// Alert type used for accelerator memory failures
pub const CRITICAL_ALERT: &str = "critical";
