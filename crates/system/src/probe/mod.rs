//! Raw OS readings behind a trait so the samplers stay testable.

mod linux;
mod mach;
mod statvfs;
mod win;

pub use linux::parse_proc_stat;
pub use mach::parse_cpu_load_info;
pub use statvfs::block_stats;
pub use win::{filetime_ticks, system_times};

use pulse_core::Result;
use std::path::Path;
use sysinfo::{CpuRefreshKind, MemoryRefreshKind, RefreshKind, System};

/// Cumulative per-core tick counters, in the categories the usage formula uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CoreTimes {
    pub user: u64,
    pub nice: u64,
    pub system: u64,
    pub idle: u64,
    pub irq: u64,
}

impl CoreTimes {
    /// `user + nice + system + idle + irq`.
    pub fn total(&self) -> u64 {
        self.user + self.nice + self.system + self.idle + self.irq
    }
}

/// What the OS could tell us about CPU time this cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CpuCounters {
    /// One entry per logical core (Windows reports a single machine-wide entry).
    Ticks(Vec<CoreTimes>),
    /// No tick source on this platform, or the read failed.
    Unavailable,
}

/// Physical memory, in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MemoryReading {
    pub total_bytes: u64,
    pub free_bytes: u64,
}

/// Block statistics for the filesystem containing a path.
///
/// `blocks_free` counts every free block, including those reserved for root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FsStats {
    pub block_size: u64,
    pub blocks: u64,
    pub blocks_free: u64,
}

/// Source of raw host counters.
///
/// Every sampler goes through this seam; [`SystemProbe`] is the real one.
pub trait HostProbe {
    fn cpu_counters(&mut self) -> CpuCounters;

    /// Clock speed of the first core in MHz, 0 when unknown.
    fn cpu_speed_mhz(&mut self) -> u64;

    fn memory(&mut self) -> MemoryReading;

    fn filesystem(&mut self, path: &Path) -> Result<FsStats>;
}

/// [`HostProbe`] backed by the OS tick sources, `statvfs` / `GetDiskFreeSpaceExW`
/// and `sysinfo`.
pub struct SystemProbe {
    sys: System,
}

impl SystemProbe {
    pub fn new() -> Self {
        let kind = RefreshKind::nothing()
            .with_cpu(CpuRefreshKind::nothing().with_frequency())
            .with_memory(MemoryRefreshKind::nothing().with_ram());
        Self { sys: System::new_with_specifics(kind) }
    }
}

impl Default for SystemProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl HostProbe for SystemProbe {
    fn cpu_counters(&mut self) -> CpuCounters {
        #[cfg(target_os = "linux")]
        return linux::read_cpu_counters();
        #[cfg(target_os = "macos")]
        return mach::read_cpu_counters();
        #[cfg(windows)]
        return win::read_cpu_counters();
        #[cfg(not(any(target_os = "linux", target_os = "macos", windows)))]
        return CpuCounters::Unavailable;
    }

    fn cpu_speed_mhz(&mut self) -> u64 {
        self.sys.refresh_cpu_frequency();
        self.sys.cpus().first().map_or(0, |c| c.frequency())
    }

    fn memory(&mut self) -> MemoryReading {
        self.sys.refresh_memory();
        MemoryReading {
            total_bytes: self.sys.total_memory(),
            free_bytes:  self.sys.available_memory(),
        }
    }

    /// Stats of the filesystem that actually holds `path`, symlinks resolved.
    fn filesystem(&mut self, path: &Path) -> Result<FsStats> {
        stat_path(path)
    }
}

#[cfg(unix)]
fn stat_path(path: &Path) -> Result<FsStats> {
    let path = std::fs::canonicalize(path)?;
    statvfs::statfs(&path)
}

#[cfg(windows)]
fn stat_path(path: &Path) -> Result<FsStats> {
    // `canonicalize` yields `\\?\` paths; an absolute path is enough here.
    let path = std::path::absolute(path)?;
    std::fs::metadata(&path)?;
    win::statfs(&path)
}

#[cfg(not(any(unix, windows)))]
fn stat_path(path: &Path) -> Result<FsStats> {
    Err(pulse_core::PulseError::System(format!(
        "no filesystem stats for '{}' on this platform",
        path.display()
    )))
}



#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(target_os = "linux")]
    #[test]
    fn pseudo_filesystems_report_their_own_stats() {
        let mut probe = SystemProbe::new();
        let root = probe.filesystem(Path::new("/")).unwrap();
        let procfs = probe.filesystem(Path::new("/proc")).unwrap();
        assert_eq!(procfs.blocks, 0);
        assert_ne!(procfs, root);
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_directory_resolves_to_target() {
        let mut probe = SystemProbe::new();
        let dir = std::env::temp_dir().join(format!("pulse-link-{}", std::process::id()));
        let _ = std::fs::remove_file(&dir);
        std::os::unix::fs::symlink("/", &dir).unwrap();

        let linked = probe.filesystem(&dir);
        std::fs::remove_file(&dir).unwrap();
        let root = probe.filesystem(Path::new("/")).unwrap();
        assert_eq!(linked.unwrap().blocks, root.blocks);
    }

    #[test]
    fn missing_path_is_an_error() {
        let mut probe = SystemProbe::new();
        assert!(probe.filesystem(Path::new("/no/such/pulse/path")).is_err());
    }

    #[cfg(any(target_os = "linux", target_os = "macos", windows))]
    #[test]
    fn host_ticks_are_available() {
        match SystemProbe::new().cpu_counters() {
            CpuCounters::Ticks(cores) => assert!(cores.iter().any(|c| c.total() > 0)),
            CpuCounters::Unavailable => panic!("no CPU tick source on a supported platform"),
        }
    }
}
