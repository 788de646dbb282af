//! Resource sampling, memory-pressure detection and operation measurement

mod accelerator;
mod measurement;
mod system;

pub use accelerator::{AcceleratorMemory, AcceleratorProbe, NoAccelerator, ReportedAccelerator};
pub use measurement::MeasurementGuard;
#[cfg(test)]
pub(crate) use accelerator::MockAcceleratorProbe;

use super::store::{DEFAULT_HISTORY_CAPACITY, EventStore};
use super::types::{PerformanceMetrics, bytes_to_gb, percent};
use crate::utils::error::Result;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

/// Point-in-time resource reading; every field is zero when unavailable
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResourceSample {
    pub accelerator_available: bool,
    pub accelerator_allocated_gb: f64,
    pub accelerator_reserved_gb: f64,
    pub accelerator_peak_gb: f64,
    pub accelerator_total_gb: f64,
    pub accelerator_memory_pct: f64,
    pub accelerator_utilization_pct: f64,
    pub cpu_pct: f64,
    pub system_memory_pct: f64,
    pub system_memory_used_gb: f64,
    pub system_memory_available_gb: f64,
    pub disk_pct: f64,
}

/// Host facts shown by the detailed metrics and performance endpoints
#[derive(Debug, Clone, Serialize)]
pub struct SystemInfo {
    pub cpu_percent: f64,
    pub cpu_count: usize,
    pub memory_percent: f64,
    pub memory_available_gb: f64,
    pub disk_usage_percent: f64,
    pub hostname: Option<String>,
    pub accelerator: String,
}

/// Averages over the most recent measurements
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AverageMetrics {
    pub samples: usize,
    pub avg_processing_time: f64,
    /// Peak accelerator memory, GB
    pub avg_accelerator_memory_gb: f64,
    pub avg_cpu_usage: f64,
    pub avg_memory_usage: f64,
}

/// Samples host and accelerator resources and keeps a measurement history
pub struct ResourceMonitor {
    probe: Arc<dyn AcceleratorProbe>,
    history: EventStore<PerformanceMetrics>,
    pressure_ratio: f64,
}

impl std::fmt::Debug for ResourceMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceMonitor")
            .field("probe", &self.probe.name())
            .field("history", &self.history.len())
            .field("pressure_ratio", &self.pressure_ratio)
            .finish()
    }
}

impl Default for ResourceMonitor {
    fn default() -> Self {
        Self::new(Arc::new(NoAccelerator), DEFAULT_HISTORY_CAPACITY, 0.8)
    }
}

impl ResourceMonitor {
    pub fn new(probe: Arc<dyn AcceleratorProbe>, history_size: usize, pressure_ratio: f64) -> Self {
        Self {
            probe,
            history: EventStore::new(history_size),
            pressure_ratio,
        }
    }

    pub fn probe(&self) -> &Arc<dyn AcceleratorProbe> {
        &self.probe
    }

    /// Sample every resource, failing if the accelerator probe fails
    pub fn try_sample(&self) -> Result<ResourceSample> {
        let memory = self.probe.memory()?.unwrap_or_default();
        let utilization = self.probe.utilization()?;
        let host = system::memory();

        Ok(ResourceSample {
            accelerator_available: memory.total > 0,
            accelerator_allocated_gb: bytes_to_gb(memory.allocated),
            accelerator_reserved_gb: bytes_to_gb(memory.reserved),
            accelerator_peak_gb: bytes_to_gb(memory.peak),
            accelerator_total_gb: bytes_to_gb(memory.total),
            accelerator_memory_pct: memory.usage_ratio() * 100.0,
            accelerator_utilization_pct: utilization.unwrap_or(0.0),
            cpu_pct: system::cpu_usage(),
            system_memory_pct: percent(host.used as f64, host.total as f64),
            system_memory_used_gb: bytes_to_gb(host.used),
            system_memory_available_gb: bytes_to_gb(host.available),
            disk_pct: system::disk_usage_pct(),
        })
    }

    /// Best-effort sample; a failing probe yields zeros
    pub fn sample(&self) -> ResourceSample {
        self.try_sample().unwrap_or_else(|e| {
            warn!("Resource sampling failed: {}", e);
            ResourceSample::default()
        })
    }

    /// Current accelerator memory, `None` when absent or unreadable
    pub fn accelerator_memory(&self) -> Option<AcceleratorMemory> {
        match self.probe.memory() {
            Ok(memory) => memory,
            Err(e) => {
                debug!("Accelerator memory unavailable: {}", e);
                None
            }
        }
    }

    /// Allocated accelerator memory as a percentage of total
    pub fn accelerator_memory_pct(&self) -> f64 {
        self.accelerator_memory()
            .map_or(0.0, |m| m.usage_ratio() * 100.0)
    }

    /// True when allocated/total accelerator memory exceeds the pressure ratio
    pub fn memory_pressure(&self) -> bool {
        self.accelerator_memory()
            .is_some_and(|m| m.usage_ratio() > self.pressure_ratio)
    }

    pub fn record_metrics(&self, metrics: PerformanceMetrics) {
        self.history.append(metrics);
    }

    /// Averages over the newest `last_n` measurements, `None` when there are none
    pub fn average_metrics(&self, last_n: usize) -> Option<AverageMetrics> {
        let recent = self.history.latest(last_n);
        if recent.is_empty() {
            return None;
        }
        let n = recent.len() as f64;
        let avg = |f: fn(&PerformanceMetrics) -> f64| recent.iter().map(f).sum::<f64>() / n;

        Some(AverageMetrics {
            samples: recent.len(),
            avg_processing_time: avg(|m| m.processing_time),
            avg_accelerator_memory_gb: avg(|m| m.accel_mem_peak),
            avg_cpu_usage: avg(|m| m.cpu_usage),
            avg_memory_usage: avg(|m| m.system_memory_usage),
        })
    }

    pub fn measurements(&self) -> Vec<PerformanceMetrics> {
        self.history.snapshot()
    }

    pub fn system_info(&self) -> SystemInfo {
        let host = system::memory();
        SystemInfo {
            cpu_percent: system::cpu_usage(),
            cpu_count: system::cpu_count(),
            memory_percent: percent(host.used as f64, host.total as f64),
            memory_available_gb: bytes_to_gb(host.available),
            disk_usage_percent: system::disk_usage_pct(),
            hostname: system::host_name(),
            accelerator: self.probe.name(),
        }
    }

    /// Measure the operation that lives as long as the returned guard
    pub fn scoped_measurement(&self, label: impl Into<String>) -> MeasurementGuard<'_> {
        MeasurementGuard::start(self, label.into())
    }

    fn host_readings(&self) -> (f64, f64) {
        let host = system::memory();
        (
            system::cpu_usage(),
            percent(host.used as f64, host.total as f64),
        )
    }
}
