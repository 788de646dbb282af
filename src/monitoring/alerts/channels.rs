//! Notification channel implementations

use super::types::{Alert, AlertSeverity};
use crate::utils::error::{Result, ServiceError};
use std::time::Duration;

/// Notification channel trait
#[async_trait::async_trait]
pub trait NotificationChannel: Send + Sync + std::fmt::Debug {
    /// Send a notification
    async fn send(&self, alert: &Alert) -> Result<()>;

    /// Get channel name
    fn name(&self) -> &str;

    /// Check if channel supports severity level
    fn supports_severity(&self, severity: AlertSeverity) -> bool;
}

/// Chat-style webhook channel (`{"text", "timestamp"}` payload)
#[derive(Debug, Clone)]
pub struct WebhookChannel {
    webhook_url: String,
    client: reqwest::Client,
    min_severity: AlertSeverity,
}

impl WebhookChannel {
    pub fn new(webhook_url: impl Into<String>, min_severity: AlertSeverity) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();
        Self {
            webhook_url: webhook_url.into(),
            client,
            min_severity,
        }
    }

    /// Payload posted for `alert`
    pub fn payload(alert: &Alert) -> serde_json::Value {
        serde_json::json!({
            "text": format!("🚨 Higgs Audio Alert [{}]: {}", alert.alert_type, alert.message),
            "timestamp": alert.timestamp.timestamp_millis() as f64 / 1000.0,
        })
    }
}

#[async_trait::async_trait]
impl NotificationChannel for WebhookChannel {
    async fn send(&self, alert: &Alert) -> Result<()> {
        let response = self
            .client
            .post(&self.webhook_url)
            .json(&Self::payload(alert))
            .send()
            .await
            .map_err(|e| ServiceError::alert(format!("Failed to send webhook notification: {}", e)))?;

        if !response.status().is_success() {
            return Err(ServiceError::alert(format!(
                "Alert webhook returned status: {}",
                response.status()
            )));
        }

        Ok(())
    }

    fn name(&self) -> &str {
        "webhook"
    }

    fn supports_severity(&self, severity: AlertSeverity) -> bool {
        severity >= self.min_severity
    }
}
