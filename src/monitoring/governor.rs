//! Load-aware generation parameter governance
//!
//! The governor only ever tightens: every adjustment is a `min` against the
//! caller's value, so a request never becomes more expensive than asked.

use super::resources::{AverageMetrics, ResourceMonitor, SystemInfo};
use crate::config::GovernorConfig;
use crate::generation::SamplingParams;
use serde::Serialize;
use std::sync::Arc;
use tracing::warn;

const CRITICAL_ACCELERATOR_PCT: f64 = 90.0;
const WARNING_ACCELERATOR_PCT: f64 = 80.0;
const SLOW_PROCESSING_SECS: f64 = 15.0;
const MODERATE_PROCESSING_SECS: f64 = 10.0;
const HIGH_HOST_USAGE_PCT: f64 = 90.0;

/// Performance overview served by the performance endpoint
#[derive(Debug, Clone, Serialize)]
pub struct PerformanceSummary {
    pub accelerator_memory_pct: f64,
    pub system_info: SystemInfo,
    pub average_metrics: Option<AverageMetrics>,
    pub recommendations: Vec<String>,
}

#[derive(Debug)]
pub struct PerformanceGovernor {
    resources: Arc<ResourceMonitor>,
    config: GovernorConfig,
}

impl PerformanceGovernor {
    pub fn new(resources: Arc<ResourceMonitor>, config: GovernorConfig) -> Self {
        Self { resources, config }
    }

    fn recent_processing_time(&self) -> f64 {
        self.resources
            .average_metrics(self.config.recent_window)
            .map_or(0.0, |m| m.avg_processing_time)
    }

    /// Parameters to actually use for the next generation call
    pub fn optimize_parameters(&self, base: &SamplingParams) -> SamplingParams {
        let mut params = base.clone();
        let cap = self.config.throttled_max_new_tokens;

        if self.resources.memory_pressure() {
            warn!("High accelerator memory pressure detected, reducing generation parameters");
            params.max_new_tokens = params.max_new_tokens.min(cap);
            let lowered = params.temperature - self.config.temperature_step;
            params.temperature = params.temperature.min(lowered.max(self.config.min_temperature));
        }

        if self.recent_processing_time() > self.config.slow_processing_secs {
            warn!("Slow processing detected, optimizing for speed");
            params.max_new_tokens = params.max_new_tokens.min(cap);
        }

        params
    }

    /// Admission hint for a batching layer: quiet CPU and accelerator headroom
    pub fn should_batch(&self) -> bool {
        let cpu = self
            .resources
            .average_metrics(self.config.recent_window)
            .map_or(100.0, |m| m.avg_cpu_usage);
        cpu < self.config.batch_max_cpu_pct
            && self.resources.accelerator_memory_pct() < self.config.batch_max_accelerator_pct
    }

    pub fn recommendations(&self) -> Vec<String> {
        self.recommendations_for(&self.resources.system_info())
    }

    fn recommendations_for(&self, system: &SystemInfo) -> Vec<String> {
        let mut recommendations = Vec::new();

        let accelerator_pct = self.resources.accelerator_memory_pct();
        if accelerator_pct > CRITICAL_ACCELERATOR_PCT {
            recommendations.push(
                "Critical: GPU memory usage > 90%. Consider reducing batch size or model parameters."
                    .to_string(),
            );
        } else if accelerator_pct > WARNING_ACCELERATOR_PCT {
            recommendations
                .push("Warning: GPU memory usage > 80%. Monitor for out-of-memory errors.".to_string());
        }

        let avg_time = self.recent_processing_time();
        if avg_time > SLOW_PROCESSING_SECS {
            recommendations
                .push("Slow processing detected. Consider optimizing generation parameters.".to_string());
        } else if avg_time > MODERATE_PROCESSING_SECS {
            recommendations.push("Moderate processing times. Monitor performance.".to_string());
        }

        if system.memory_percent > HIGH_HOST_USAGE_PCT {
            recommendations.push("High system memory usage. Consider adding more RAM.".to_string());
        }
        if system.cpu_percent > HIGH_HOST_USAGE_PCT {
            recommendations
                .push("High CPU usage. Consider optimizing CPU-bound operations.".to_string());
        }

        if recommendations.is_empty() {
            recommendations.push("Performance looks good! No optimization needed.".to_string());
        }
        recommendations
    }

    pub fn performance_summary(&self) -> PerformanceSummary {
        let system_info = self.resources.system_info();
        PerformanceSummary {
            accelerator_memory_pct: self.resources.accelerator_memory_pct(),
            recommendations: self.recommendations_for(&system_info),
            average_metrics: self.resources.average_metrics(self.config.recent_window),
            system_info,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitoring::resources::{AcceleratorMemory, ReportedAccelerator};
    use crate::monitoring::types::PerformanceMetrics;

    const GB: u64 = 1_000_000_000;

    fn setup(allocated_gb: u64) -> (PerformanceGovernor, Arc<ResourceMonitor>) {
        let probe = Arc::new(ReportedAccelerator::new());
        probe.update(
            AcceleratorMemory {
                allocated: allocated_gb * GB,
                reserved: allocated_gb * GB,
                peak: allocated_gb * GB,
                total: 24 * GB,
            },
            None,
        );
        let resources = Arc::new(ResourceMonitor::new(probe, 100, 0.8));
        (
            PerformanceGovernor::new(resources.clone(), GovernorConfig::default()),
            resources,
        )
    }

    fn record(resources: &ResourceMonitor, processing_time: f64, cpu: f64) {
        resources.record_metrics(PerformanceMetrics {
            label: "generate".to_string(),
            timestamp: chrono::Utc::now(),
            processing_time,
            accel_mem_before: 0.0,
            accel_mem_after: 0.0,
            accel_mem_peak: 0.0,
            cpu_usage: cpu,
            system_memory_usage: 0.0,
        });
    }

    fn params(max_new_tokens: u32, temperature: f64) -> SamplingParams {
        SamplingParams {
            max_new_tokens,
            temperature,
            ..SamplingParams::default()
        }
    }

    #[test]
    fn test_pressure_shrinks_tokens_and_temperature() {
        let (governor, _) = setup(22);
        let tuned = governor.optimize_parameters(&params(1024, 0.7));
        assert_eq!(tuned.max_new_tokens, 512);
        assert!((tuned.temperature - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_temperature_floor() {
        let (governor, _) = setup(22);
        assert_eq!(governor.optimize_parameters(&params(1024, 0.15)).temperature, 0.1);
        // already below the floor: never raised
        assert_eq!(governor.optimize_parameters(&params(1024, 0.05)).temperature, 0.05);
    }

    #[test]
    fn test_never_loosens() {
        let (governor, _) = setup(22);
        let tuned = governor.optimize_parameters(&params(256, 1.0));
        assert_eq!(tuned.max_new_tokens, 256);
    }

    #[test]
    fn test_no_pressure_leaves_params() {
        let (governor, _) = setup(4);
        let base = params(2048, 1.0);
        assert_eq!(governor.optimize_parameters(&base), base);
    }

    #[test]
    fn test_slow_processing_caps_tokens() {
        let (governor, resources) = setup(4);
        for _ in 0..10 {
            record(&resources, 12.0, 20.0);
        }
        let tuned = governor.optimize_parameters(&params(2048, 1.0));
        assert_eq!(tuned.max_new_tokens, 512);
        assert_eq!(tuned.temperature, 1.0);
    }

    #[test]
    fn test_should_batch() {
        let (governor, resources) = setup(4);
        // no measurements: cpu assumed saturated
        assert!(!governor.should_batch());

        record(&resources, 1.0, 30.0);
        assert!(governor.should_batch());

        let (busy, resources) = setup(20);
        record(&resources, 1.0, 30.0);
        assert!(!busy.should_batch());
    }

    #[test]
    fn test_recommendations() {
        let (governor, resources) = setup(22);
        for _ in 0..3 {
            record(&resources, 16.0, 10.0);
        }
        let quiet = SystemInfo {
            cpu_percent: 10.0,
            cpu_count: 4,
            memory_percent: 20.0,
            memory_available_gb: 8.0,
            disk_usage_percent: 10.0,
            hostname: None,
            accelerator: "test".to_string(),
        };
        let recs = governor.recommendations_for(&quiet);
        assert_eq!(
            recs,
            vec![
                "Critical: GPU memory usage > 90%. Consider reducing batch size or model parameters."
                    .to_string(),
                "Slow processing detected. Consider optimizing generation parameters.".to_string(),
            ]
        );

        let (idle, _) = setup(4);
        assert_eq!(
            idle.recommendations_for(&quiet),
            vec!["Performance looks good! No optimization needed.".to_string()]
        );
    }
}
