//! Guard-based measurement of one operation

use super::ResourceMonitor;
use crate::monitoring::types::{PerformanceMetrics, bytes_to_gb};
use chrono::Utc;
use std::time::Instant;
use tracing::info;

/// Records a [`PerformanceMetrics`] sample when finished or dropped.
///
/// Dropping covers every exit path: early returns, `?` propagation, panics
/// and cancelled futures all still record the measurement.
#[must_use = "the measurement ends when the guard is dropped"]
pub struct MeasurementGuard<'a> {
    monitor: &'a ResourceMonitor,
    label: String,
    started: Instant,
    accel_mem_before: f64,
    cpu_before: f64,
    memory_before: f64,
    recorded: bool,
}

impl<'a> MeasurementGuard<'a> {
    pub(super) fn start(monitor: &'a ResourceMonitor, label: String) -> Self {
        let accel_mem_before = monitor
            .accelerator_memory()
            .map_or(0.0, |m| bytes_to_gb(m.allocated));
        monitor.probe().reset_peak();
        let (cpu_before, memory_before) = monitor.host_readings();

        Self {
            monitor,
            label,
            started: Instant::now(),
            accel_mem_before,
            cpu_before,
            memory_before,
            recorded: false,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// End the measurement now and return what was recorded
    pub fn finish(mut self) -> PerformanceMetrics {
        self.record()
    }

    fn record(&mut self) -> PerformanceMetrics {
        self.recorded = true;

        let processing_time = self.started.elapsed().as_secs_f64();
        let memory = self.monitor.accelerator_memory();
        let accel_mem_after = memory.map_or(0.0, |m| bytes_to_gb(m.allocated));
        let accel_mem_peak = memory.map_or(0.0, |m| bytes_to_gb(m.peak));
        let (cpu_after, memory_after) = self.monitor.host_readings();

        let metrics = PerformanceMetrics {
            label: self.label.clone(),
            timestamp: Utc::now(),
            processing_time,
            accel_mem_before: self.accel_mem_before,
            accel_mem_after,
            accel_mem_peak,
            cpu_usage: (self.cpu_before + cpu_after) / 2.0,
            system_memory_usage: (self.memory_before + memory_after) / 2.0,
        };

        info!(
            operation = %metrics.label,
            "Performance: {:.2}s, accelerator memory {:.2}GB -> {:.2}GB (peak {:.2}GB), cpu {:.1}%, memory {:.1}%",
            metrics.processing_time,
            metrics.accel_mem_before,
            metrics.accel_mem_after,
            metrics.accel_mem_peak,
            metrics.cpu_usage,
            metrics.system_memory_usage,
        );

        self.monitor.record_metrics(metrics.clone());
        metrics
    }
}

impl Drop for MeasurementGuard<'_> {
    fn drop(&mut self) {
        if !self.recorded {
            self.record();
        }
    }
}
