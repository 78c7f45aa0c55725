use chrono::{DateTime, Local};
use serde::Serialize;

/// Result of one CPU sampling call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CpuInfo {
    /// Busy share of all logical cores since the previous call (0 – 100).
    pub usage_percent: u8,
    /// Clock speed of the first core as reported by the OS.
    pub clock_speed_mhz: u64,
}

/// Physical memory usage, in megabytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct MemoryInfo {
    pub used_mb: u64,
    pub total_mb: u64,
    pub usage_percent: u8,
}

/// Usage of the monitored filesystem, in gigabytes.
///
/// An all-zero value means disk monitoring was unavailable for this cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DiskInfo {
    pub free_gb: u64,
    pub total_gb: u64,
    pub usage_percent: u8,
}

impl DiskInfo {
    /// Used space (`total - free`), as shown by "used / total" displays.
    #[must_use]
    pub fn used_gb(&self) -> u64 {
        self.total_gb.saturating_sub(self.free_gb)
    }
}

/// One row of the rolling history window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Sample {
    pub timestamp: DateTime<Local>,
    pub cpu_usage: u8,
    pub memory_usage: u8,
    pub disk_usage: u8,
}

/// Moving averages over the current history window (each 0 – 100).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Averages {
    pub cpu_avg: u8,
    pub memory_avg: u8,
    pub disk_avg: u8,
}

/// Everything a presentation layer needs for one refresh.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Snapshot {
    pub cpu: CpuInfo,
    pub memory: MemoryInfo,
    pub disk: DiskInfo,
    pub averages: Averages,
    /// Human label of the monitored filesystem, e.g. `"Disk Usage (/)"`.
    pub disk_label: &'static str,
}

/// `part / whole` as a rounded percentage clamped to `0..=100`.
///
/// A zero (or negative) denominator yields 0 instead of NaN.
#[must_use]
pub fn percent(part: f64, whole: f64) -> u8 {
    if whole <= 0.0 || !part.is_finite() || !whole.is_finite() {
        return 0;
    }
    (part / whole * 100.0).round().clamp(0.0, 100.0) as u8
}
