//! Per-core ticks from `/proc/stat`.

use super::CoreTimes;

#[cfg(target_os = "linux")]
pub(super) fn read_cpu_counters() -> super::CpuCounters {
    use super::CpuCounters;

    match std::fs::read_to_string("/proc/stat") {
        Ok(text) => {
            let cores = parse_proc_stat(&text);
            if cores.is_empty() {
                tracing::warn!("/proc/stat has no per-core lines");
                CpuCounters::Unavailable
            } else {
                CpuCounters::Ticks(cores)
            }
        }
        Err(e) => {
            tracing::warn!("Cannot read /proc/stat: {e}");
            CpuCounters::Unavailable
        }
    }
}

/// Parse the per-core `cpuN` lines of `/proc/stat`.
///
/// Columns are `user nice system idle iowait irq ...`; `iowait` is not part
/// of the usage formula. The aggregate `cpu` line and malformed lines are skipped.
pub fn parse_proc_stat(text: &str) -> Vec<CoreTimes> {
    text.lines()
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            let name = fields.next()?;
            let index = name.strip_prefix("cpu")?;
            if index.is_empty() || !index.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }

            let values: Vec<u64> = fields
                .take(6)
                .map(str::parse)
                .collect::<std::result::Result<_, _>>()
                .ok()?;
            if values.len() < 4 {
                return None;
            }

            Some(CoreTimes {
                user:   values[0],
                nice:   values[1],
                system: values[2],
                idle:   values[3],
                irq:    values.get(5).copied().unwrap_or(0),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const STAT: &str = "\
cpu  300 20 100 5000 40 6 2 0 0 0
cpu0 100 10 50 2000 20 3 1 0 0 0
cpu1 200 10 50 3000 20 3 1 0 0 0
intr 12345 0 0
ctxt 98765
cpufreq garbage
";

    #[test]
    fn parses_per_core_lines_only() {
        let cores = parse_proc_stat(STAT);
        assert_eq!(cores.len(), 2);
        assert_eq!(
            cores[0],
            CoreTimes { user: 100, nice: 10, system: 50, idle: 2000, irq: 3 }
        );
        assert_eq!(cores[1].total(), 200 + 10 + 50 + 3000 + 3);
    }

    #[test]
    fn skips_malformed_lines() {
        let cores = parse_proc_stat("cpu0 1 2 x 4 5 6\ncpu1 1 2\ncpu2 1 2 3 4\n");
        assert_eq!(cores, vec![CoreTimes { user: 1, nice: 2, system: 3, idle: 4, irq: 0 }]);
    }

    #[test]
    fn empty_input_has_no_cores() {
        assert!(parse_proc_stat("").is_empty());
    }
}
