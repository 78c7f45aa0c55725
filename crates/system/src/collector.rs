use crate::cpu::CpuSampler;
use crate::disk::sample_disk;
use crate::history::History;
use crate::memory::sample_memory;
use crate::platform::{resolve_target, EnvMarkers, Platform};
use crate::probe::{HostProbe, SystemProbe};
use chrono::Local;
use pulse_core::{Sample, Snapshot};
use tracing::debug;

/// Owns every piece of cross-cycle state: the CPU baseline and the history
/// window. Build one per process and call [`Collector::collect_all`] from a
/// single task.
pub struct Collector<P = SystemProbe> {
    probe:    P,
    cpu:      CpuSampler,
    history:  History,
    platform: Platform,
    env:      fn() -> EnvMarkers,
}

impl Collector<SystemProbe> {
    /// Collector for the running host.
    pub fn new(history_len: usize) -> Self {
        Self::with_probe(SystemProbe::new(), history_len, Platform::current())
    }
}

impl<P: HostProbe> Collector<P> {
    pub fn with_probe(probe: P, history_len: usize, platform: Platform) -> Self {
        Self {
            probe,
            cpu: CpuSampler::new(),
            history: History::new(history_len),
            platform,
            env: EnvMarkers::from_env,
        }
    }

    /// Replace the environment-marker source (defaults to the process env).
    pub fn with_env(mut self, env: fn() -> EnvMarkers) -> Self {
        self.env = env;
        self
    }

    /// Run one sampling cycle and fold it into the history window.
    pub fn collect_all(&mut self) -> Snapshot {
        let cpu    = self.cpu.sample(&mut self.probe);
        let memory = sample_memory(&mut self.probe);
        let target = resolve_target(self.platform, &(self.env)());
        let disk   = sample_disk(&mut self.probe, &target);

        self.history.push(Sample {
            timestamp:    Local::now(),
            cpu_usage:    cpu.usage_percent,
            memory_usage: memory.usage_percent,
            disk_usage:   disk.usage_percent,
        });
        let averages = self.history.averages();

        debug!(
            cpu = cpu.usage_percent,
            memory = memory.usage_percent,
            disk = disk.usage_percent,
            window = self.history.len(),
            "collected metrics"
        );

        Snapshot {
            cpu,
            memory,
            disk,
            averages,
            disk_label: target.label,
        }
    }

    pub fn history(&self) -> &History {
        &self.history
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::{fake::FakeProbe, FsStats, MemoryReading};
    use pulse_core::{Averages, DiskInfo, MemoryInfo};

    const MB: u64 = 1 << 20;

    fn desktop() -> EnvMarkers {
        EnvMarkers::default()
    }

    fn linux_box() -> FakeProbe {
        FakeProbe {
            memory: MemoryReading { total_bytes: 16_000 * MB, free_bytes: 4_000 * MB },
            fs: Some(FsStats { block_size: 1 << 30, blocks: 200, blocks_free: 50 }),
            ..FakeProbe::with_ticks(&[(1000, 2000), (1400, 2800)])
        }
    }

    #[test]
    fn linux_end_to_end() {
        let mut collector =
            Collector::with_probe(linux_box(), 24, Platform::Linux).with_env(desktop);

        let first = collector.collect_all();
        assert_eq!(first.cpu.usage_percent, 0);
        assert_eq!(first.disk_label, "Disk Usage (/)");

        let second = collector.collect_all();
        assert_eq!(second.cpu.usage_percent, 50);
        assert_eq!(second.cpu.clock_speed_mhz, 2400);
        assert_eq!(
            second.memory,
            MemoryInfo { used_mb: 12_000, total_mb: 16_000, usage_percent: 75 }
        );
        assert_eq!(second.disk, DiskInfo { free_gb: 50, total_gb: 200, usage_percent: 75 });
        assert_eq!(
            second.averages,
            Averages { cpu_avg: 25, memory_avg: 75, disk_avg: 75 }
        );
        assert_eq!(collector.history().len(), 2);
    }

    #[test]
    fn disk_failure_keeps_cycle_alive() {
        let probe = FakeProbe { fs: None, ..linux_box() };
        let mut collector = Collector::with_probe(probe, 24, Platform::Linux).with_env(desktop);

        let snapshot = collector.collect_all();
        assert_eq!(snapshot.disk, DiskInfo::default());
        assert_eq!(snapshot.memory.usage_percent, 75);
    }

    #[test]
    fn unsupported_platform_labels_generic_disk() {
        let mut collector =
            Collector::with_probe(linux_box(), 24, Platform::Other).with_env(desktop);
        let snapshot = collector.collect_all();
        assert_eq!(snapshot.disk_label, "Disk Usage");
        assert_eq!(snapshot.disk, DiskInfo::default());
    }

    #[test]
    fn container_env_switches_label() {
        let mut collector = Collector::with_probe(linux_box(), 24, Platform::Linux).with_env(|| {
            EnvMarkers {
                cloud_container: true,
                workspace_folder: Some("/workspaces/app".into()),
                home_dir: None,
            }
        });
        assert_eq!(collector.collect_all().disk_label, "Disk Usage (Workspace)");
    }

    #[test]
    fn window_is_bounded() {
        let mut collector = Collector::with_probe(linux_box(), 3, Platform::Linux).with_env(desktop);
        for _ in 0..10 {
            collector.collect_all();
        }
        assert_eq!(collector.history().len(), 3);
    }
}
