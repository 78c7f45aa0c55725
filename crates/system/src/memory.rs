use crate::probe::HostProbe;
use pulse_core::{state::percent, MemoryInfo};

const MIB: f64 = (1u64 << 20) as f64;

/// Physical memory usage in megabytes.
///
/// Total and free are each rounded to whole megabytes before `used` is
/// derived, so `used + free == total` always holds in the reported figures.
pub fn sample_memory(probe: &mut impl HostProbe) -> MemoryInfo {
    let reading = probe.memory();
    let total_mb = bytes_to_mb(reading.total_bytes);
    let free_mb  = bytes_to_mb(reading.free_bytes);
    let used_mb  = total_mb.saturating_sub(free_mb);

    MemoryInfo {
        used_mb,
        total_mb,
        usage_percent: percent(used_mb as f64, total_mb as f64),
    }
}

fn bytes_to_mb(bytes: u64) -> u64 {
    (bytes as f64 / MIB).round() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::{fake::FakeProbe, MemoryReading};

    const MB: u64 = 1 << 20;

    fn probe(total_bytes: u64, free_bytes: u64) -> FakeProbe {
        FakeProbe {
            memory: MemoryReading { total_bytes, free_bytes },
            ..FakeProbe::default()
        }
    }

    #[test]
    fn three_quarters_used() {
        let info = sample_memory(&mut probe(16_000 * MB, 4_000 * MB));
        assert_eq!(info, MemoryInfo { used_mb: 12_000, total_mb: 16_000, usage_percent: 75 });
    }

    #[test]
    fn rounds_each_figure_before_subtracting() {
        // 1.6 MB total, 0.5 MB free: rounds to 2 and 1 (half away from zero).
        let info = sample_memory(&mut probe(MB + MB * 6 / 10, MB / 2));
        assert_eq!(info.total_mb, 2);
        assert_eq!(info.used_mb, 1);
        assert_eq!(info.usage_percent, 50);
    }

    #[test]
    fn zero_total_is_zero_percent() {
        assert_eq!(sample_memory(&mut probe(0, 0)), MemoryInfo::default());
    }
}
