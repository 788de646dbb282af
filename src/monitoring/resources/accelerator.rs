//! Accelerator memory probes
//!
//! The model runs in a separate inference backend, so this process learns
//! about accelerator memory from what the backend reports. A probe that has
//! nothing to report returns `Ok(None)`; absence of an accelerator is never
//! an error.

use crate::utils::error::Result;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Accelerator memory figures, in bytes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcceleratorMemory {
    pub allocated: u64,
    pub reserved: u64,
    /// High-water mark of `allocated` since the last peak reset
    pub peak: u64,
    pub total: u64,
}

impl AcceleratorMemory {
    /// Allocated share of total memory, 0.0 when total is unknown
    pub fn usage_ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.allocated as f64 / self.total as f64
        }
    }
}

/// Source of accelerator readings
#[cfg_attr(test, mockall::automock)]
pub trait AcceleratorProbe: Send + Sync {
    fn name(&self) -> String;

    fn memory(&self) -> Result<Option<AcceleratorMemory>>;

    /// Compute utilization, percent
    fn utilization(&self) -> Result<Option<f64>>;

    /// Restart peak tracking from the current allocation
    fn reset_peak(&self);
}

/// Probe for hosts without an accelerator
#[derive(Debug, Default, Clone, Copy)]
pub struct NoAccelerator;

impl AcceleratorProbe for NoAccelerator {
    fn name(&self) -> String {
        "none".to_string()
    }

    fn memory(&self) -> Result<Option<AcceleratorMemory>> {
        Ok(None)
    }

    fn utilization(&self) -> Result<Option<f64>> {
        Ok(None)
    }

    fn reset_peak(&self) {}
}

/// Probe fed by readings the inference backend reports
#[derive(Debug, Default)]
pub struct ReportedAccelerator {
    reported: AtomicBool,
    allocated: AtomicU64,
    reserved: AtomicU64,
    peak: AtomicU64,
    total: AtomicU64,
    /// f64 bits
    utilization: AtomicU64,
}

impl ReportedAccelerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a backend reading; the peak only moves up until reset
    pub fn update(&self, memory: AcceleratorMemory, utilization: Option<f64>) {
        self.allocated.store(memory.allocated, Ordering::Relaxed);
        self.reserved.store(memory.reserved, Ordering::Relaxed);
        self.total.store(memory.total, Ordering::Relaxed);
        self.peak
            .fetch_max(memory.peak.max(memory.allocated), Ordering::Relaxed);
        if let Some(utilization) = utilization {
            self.utilization
                .store(utilization.to_bits(), Ordering::Relaxed);
        }
        self.reported.store(true, Ordering::Release);
    }
}

impl AcceleratorProbe for ReportedAccelerator {
    fn name(&self) -> String {
        "backend-reported".to_string()
    }

    fn memory(&self) -> Result<Option<AcceleratorMemory>> {
        if !self.reported.load(Ordering::Acquire) {
            return Ok(None);
        }
        Ok(Some(AcceleratorMemory {
            allocated: self.allocated.load(Ordering::Relaxed),
            reserved: self.reserved.load(Ordering::Relaxed),
            peak: self.peak.load(Ordering::Relaxed),
            total: self.total.load(Ordering::Relaxed),
        }))
    }

    fn utilization(&self) -> Result<Option<f64>> {
        if !self.reported.load(Ordering::Acquire) {
            return Ok(None);
        }
        Ok(Some(f64::from_bits(self.utilization.load(Ordering::Relaxed))))
    }

    fn reset_peak(&self) {
        self.peak
            .store(self.allocated.load(Ordering::Relaxed), Ordering::Relaxed);
    }
}
