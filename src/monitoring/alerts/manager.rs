//! Alert manager implementation

use super::channels::{NotificationChannel, WebhookChannel};
use super::types::{Alert, AlertSeverity, AlertStats, AlertStorage};
use super::CRITICAL_ALERT;
use crate::config::MonitoringConfig;
use crate::monitoring::store::{BoundedPush, DEFAULT_HISTORY_CAPACITY};
use chrono::{DateTime, Utc};
use futures::future::join_all;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::Notify;
use tracing::{debug, error, info, warn};

/// Dispatcher poll interval when no alert wakes it earlier
const DISPATCH_INTERVAL: Duration = Duration::from_secs(5);

/// Cooldown gate and delivery queue for alerts
#[derive(Debug)]
pub struct AlertManager {
    cooldown: chrono::Duration,
    /// Consolidated storage for all alert-related data
    storage: Mutex<AlertStorage>,
    /// Alerts accepted but not yet handed to the channels
    pending: Mutex<VecDeque<Alert>>,
    wake: Notify,
    channels: Vec<Arc<dyn NotificationChannel>>,
    active: AtomicBool,
}

impl AlertManager {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown: chrono::Duration::milliseconds(cooldown.as_millis() as i64),
            storage: Mutex::new(AlertStorage::default()),
            pending: Mutex::new(VecDeque::new()),
            wake: Notify::new(),
            channels: Vec::new(),
            active: AtomicBool::new(false),
        }
    }

    /// Manager with the webhook channel from `config`, when one is set
    pub fn from_config(config: &MonitoringConfig) -> Self {
        let manager = Self::new(config.alert_cooldown());
        match &config.alert_webhook_url {
            Some(url) => manager.with_channel(Arc::new(WebhookChannel::new(
                url.clone(),
                AlertSeverity::Info,
            ))),
            None => manager,
        }
    }

    pub fn with_channel(mut self, channel: Arc<dyn NotificationChannel>) -> Self {
        self.channels.push(channel);
        self
    }

    /// Accept an alert unless its type is cooling down. Returns whether it was accepted.
    pub fn notify(&self, alert_type: &str, message: &str, severity: AlertSeverity) -> bool {
        self.notify_at(alert_type, message, severity, Utc::now())
    }

    /// [`notify`](Self::notify) with an explicit reference time
    pub fn notify_at(
        &self,
        alert_type: &str,
        message: &str,
        severity: AlertSeverity,
        now: DateTime<Utc>,
    ) -> bool {
        let alert = {
            let mut storage = self.storage.lock();

            if alert_type != CRITICAL_ALERT {
                if let Some(last) = storage.last_sent.get(alert_type) {
                    if now - *last <= self.cooldown {
                        storage.stats.suppressed_alerts += 1;
                        debug!("Alert suppressed by cooldown: [{}] {}", alert_type, message);
                        return false;
                    }
                }
            }

            let alert = Alert {
                id: uuid::Uuid::new_v4().to_string(),
                alert_type: alert_type.to_string(),
                severity,
                message: message.to_string(),
                timestamp: now,
            };

            storage.last_sent.insert(alert_type.to_string(), now);
            storage.stats.total_alerts += 1;
            *storage
                .stats
                .alerts_by_type
                .entry(alert_type.to_string())
                .or_insert(0) += 1;
            storage.stats.last_alert = Some(now);
            storage
                .history
                .push_bounded(alert.clone(), DEFAULT_HISTORY_CAPACITY);
            alert
        };

        warn!("ALERT [{}]: {}", alert_type, message);

        if !self.channels.is_empty() {
            self.pending.lock().push_back(alert);
            self.wake.notify_one();
        }
        true
    }

    /// Deliver every queued alert, concurrently across the channels accepting its severity
    pub async fn process_pending(&self) {
        let alerts: Vec<Alert> = self.pending.lock().drain(..).collect();

        for alert in alerts {
            let alert = &alert;
            let deliveries = self
                .channels
                .iter()
                .filter(|channel| channel.supports_severity(alert.severity))
                .map(move |channel| async move { (channel, channel.send(alert).await) });

            for (channel, result) in join_all(deliveries).await {
                match result {
                    Ok(()) => debug!("Alert {} sent via {}", alert.id, channel.name()),
                    Err(e) => {
                        error!("Failed to send alert via {}: {}", channel.name(), e);
                        self.storage.lock().stats.failed_notifications += 1;
                    }
                }
            }
        }
    }

    /// Spawn the delivery task
    pub fn start(self: &Arc<Self>) {
        if self.active.swap(true, Ordering::AcqRel) {
            return;
        }
        info!("Starting alert dispatcher with {} channel(s)", self.channels.len());

        let manager = Arc::clone(self);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(DISPATCH_INTERVAL);
            loop {
                tokio::select! {
                    _ = manager.wake.notified() => {}
                    _ = interval.tick() => {}
                }
                if !manager.is_active() {
                    break;
                }
                manager.process_pending().await;
            }
            debug!("Alert dispatcher stopped");
        });
    }

    pub fn stop(&self) {
        info!("Stopping alert dispatcher");
        self.active.store(false, Ordering::Release);
        self.wake.notify_one();
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Newest alerts first
    pub fn recent_alerts(&self, limit: usize) -> Vec<Alert> {
        self.storage
            .lock()
            .history
            .iter()
            .rev()
            .take(limit)
            .cloned()
            .collect()
    }

    pub fn stats(&self) -> AlertStats {
        self.storage.lock().stats.clone()
    }

    /// Number of alerts waiting for delivery
    pub fn pending_count(&self) -> usize {
        self.pending.lock().len()
    }
}
