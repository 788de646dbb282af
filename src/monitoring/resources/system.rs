//! Host metrics collected with sysinfo when the metrics feature is enabled

#[cfg(feature = "metrics")]
use once_cell::sync::Lazy;
#[cfg(feature = "metrics")]
use sysinfo::{Disks, System};

#[cfg(feature = "metrics")]
static SYSTEM: Lazy<parking_lot::Mutex<System>> =
    Lazy::new(|| parking_lot::Mutex::new(System::new_all()));

#[cfg(feature = "metrics")]
static DISKS: Lazy<parking_lot::Mutex<Disks>> =
    Lazy::new(|| parking_lot::Mutex::new(Disks::new_with_refreshed_list()));

/// Host memory, in bytes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(super) struct HostMemory {
    pub used: u64,
    pub total: u64,
    pub available: u64,
}

#[cfg(feature = "metrics")]
pub(super) fn cpu_usage() -> f64 {
    let mut sys = SYSTEM.lock();
    sys.refresh_cpu_usage();
    sys.global_cpu_usage() as f64
}

#[cfg(not(feature = "metrics"))]
pub(super) fn cpu_usage() -> f64 {
    0.0
}

#[cfg(feature = "metrics")]
pub(super) fn memory() -> HostMemory {
    let mut sys = SYSTEM.lock();
    sys.refresh_memory();
    HostMemory {
        used: sys.used_memory(),
        total: sys.total_memory(),
        available: sys.available_memory(),
    }
}

#[cfg(not(feature = "metrics"))]
pub(super) fn memory() -> HostMemory {
    HostMemory::default()
}

/// Used share of the root filesystem, percent
#[cfg(feature = "metrics")]
pub(super) fn disk_usage_pct() -> f64 {
    let mut disks = DISKS.lock();
    disks.refresh_list();
    let root = disks
        .iter()
        .find(|d| d.mount_point() == std::path::Path::new("/"))
        .or_else(|| disks.iter().next());
    match root {
        Some(disk) if disk.total_space() > 0 => {
            let used = disk.total_space().saturating_sub(disk.available_space());
            used as f64 / disk.total_space() as f64 * 100.0
        }
        _ => 0.0,
    }
}

#[cfg(not(feature = "metrics"))]
pub(super) fn disk_usage_pct() -> f64 {
    0.0
}

#[cfg(feature = "metrics")]
pub(super) fn cpu_count() -> usize {
    SYSTEM.lock().cpus().len()
}

#[cfg(not(feature = "metrics"))]
pub(super) fn cpu_count() -> usize {
    std::thread::available_parallelism().map_or(1, |n| n.get())
}

pub(super) fn host_name() -> Option<String> {
    #[cfg(feature = "metrics")]
    {
        System::host_name()
    }
    #[cfg(not(feature = "metrics"))]
    {
        None
    }
}
