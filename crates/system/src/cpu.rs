use crate::probe::{CpuCounters, HostProbe};
use pulse_core::CpuInfo;

/// Cumulative tick totals across all cores at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CpuTimes {
    idle:  u64,
    total: u64,
}

/// Delta-based CPU usage.
///
/// Holds the previous tick totals between calls; the first call after
/// construction has no baseline and reports 0.
#[derive(Debug, Default)]
pub struct CpuSampler {
    previous: Option<CpuTimes>,
}

impl CpuSampler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sample(&mut self, probe: &mut impl HostProbe) -> CpuInfo {
        let clock_speed_mhz = probe.cpu_speed_mhz();

        let cores = match probe.cpu_counters() {
            CpuCounters::Ticks(cores) => cores,
            CpuCounters::Unavailable => {
                tracing::debug!("CPU tick counters unavailable; reporting 0%");
                return CpuInfo { usage_percent: 0, clock_speed_mhz };
            }
        };

        let current = CpuTimes {
            idle:  cores.iter().map(|c| c.idle).sum(),
            total: cores.iter().map(|c| c.total()).sum(),
        };

        let usage_percent = match self.previous.replace(current) {
            None => 0,
            Some(prev) => usage_from_delta(
                current.idle.saturating_sub(prev.idle),
                current.total.saturating_sub(prev.total),
            ),
        };

        CpuInfo { usage_percent, clock_speed_mhz }
    }
}

/// `100 - idle_delta / total_delta * 100`, rounded and clamped to `0..=100`.
///
/// No elapsed ticks means no measurable usage: 0.
pub fn usage_from_delta(idle_delta: u64, total_delta: u64) -> u8 {
    if total_delta == 0 {
        return 0;
    }
    let busy = 100.0 - (idle_delta as f64 / total_delta as f64) * 100.0;
    busy.round().clamp(0.0, 100.0) as u8
}
