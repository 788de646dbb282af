//! Monitoring configuration validators
//!
//! This module provides validation implementations for the monitoring
//! section and its thresholds, and for generation defaults.

use super::trait_def::Validate;
use crate::config::models::*;
use tracing::debug;

impl Validate for MonitoringConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating monitoring configuration");

        if self.max_events == 0 {
            return Err("Event store capacity must be greater than 0".to_string());
        }

        if self.request_history_size == 0 || self.performance_history_size == 0 {
            return Err("History sizes must be greater than 0".to_string());
        }

        if self.sample_interval == 0 || self.cleanup_interval == 0 {
            return Err("Background task intervals must be greater than 0".to_string());
        }

        if let Some(url) = &self.alert_webhook_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err("Alert webhook URL must be http(s)".to_string());
            }
        }

        self.health.validate()?;
        self.alerts.validate()?;
        self.governor.validate()?;

        Ok(())
    }
}

impl Validate for HealthThresholds {
    fn validate(&self) -> Result<(), String> {
        if self.system_memory_gb <= 0.0 || self.accelerator_memory_gb <= 0.0 {
            return Err("Memory thresholds must be positive".to_string());
        }

        if !(0.0..=100.0).contains(&self.error_rate_pct) {
            return Err("Health error rate threshold must be within 0-100".to_string());
        }

        Ok(())
    }
}

impl Validate for AlertThresholds {
    fn validate(&self) -> Result<(), String> {
        if self.error_rate_elevated > self.error_rate_high {
            return Err("Elevated error rate threshold exceeds the high threshold".to_string());
        }

        if self.response_time_elevated > self.response_time_slow {
            return Err("Elevated response time threshold exceeds the slow threshold".to_string());
        }

        Ok(())
    }
}

impl Validate for GovernorConfig {
    fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.memory_pressure_ratio) {
            return Err("Memory pressure ratio must be within 0-1".to_string());
        }

        if self.throttled_max_new_tokens == 0 {
            return Err("Throttled token budget must be greater than 0".to_string());
        }

        if self.temperature_step < 0.0 || self.min_temperature < 0.0 {
            return Err("Temperature adjustments cannot be negative".to_string());
        }

        if self.recent_window == 0 {
            return Err("Recent measurement window must be greater than 0".to_string());
        }

        Ok(())
    }
}

impl Validate for GenerationConfig {
    fn validate(&self) -> Result<(), String> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err("Default temperature must be between 0 and 2".to_string());
        }

        if !(1..=100).contains(&self.top_k) {
            return Err("Default top_k must be between 1 and 100".to_string());
        }

        if self.top_p <= 0.0 || self.top_p > 1.0 {
            return Err("Default top_p must be between 0 and 1".to_string());
        }

        if !(1..=4096).contains(&self.max_new_tokens) {
            return Err("Default max_new_tokens must be between 1 and 4096".to_string());
        }

        if self.sample_rate == 0 {
            return Err("Sample rate must be greater than 0".to_string());
        }

        if self.max_transcript_length == 0 {
            return Err("Max transcript length must be greater than 0".to_string());
        }

        Ok(())
    }
}
