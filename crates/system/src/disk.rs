use crate::platform::DiskTarget;
use crate::probe::HostProbe;
use pulse_core::{state::percent, DiskInfo};
use tracing::{debug, warn};

const GIB: f64 = (1u64 << 30) as f64;

/// Usage of the filesystem holding `target.path`.
///
/// Best-effort: an unresolved path or a failing stat yields
/// `DiskInfo::default()` and a log line, never an error.
pub fn sample_disk(probe: &mut impl HostProbe, target: &DiskTarget) -> DiskInfo {
    let Some(path) = target.path.as_deref() else {
        debug!("Disk monitoring unsupported on this platform");
        return DiskInfo::default();
    };

    let stats = match probe.filesystem(path) {
        Ok(stats) => stats,
        Err(e) => {
            warn!("Failed to get disk stats for '{}': {e}", path.display());
            return DiskInfo::default();
        }
    };

    let total_gb = bytes_to_gb(stats.blocks.saturating_mul(stats.block_size));
    let free_gb  = bytes_to_gb(stats.blocks_free.saturating_mul(stats.block_size));
    let used_gb  = total_gb.saturating_sub(free_gb);

    DiskInfo {
        free_gb,
        total_gb,
        usage_percent: percent(used_gb as f64, total_gb as f64),
    }
}

fn bytes_to_gb(bytes: u64) -> u64 {
    (bytes as f64 / GIB).round() as u64
}
