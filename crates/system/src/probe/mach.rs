//! Per-core ticks from the Mach host (`host_processor_info`).

use super::CoreTimes;

// Slot order of `processor_cpu_load_info.cpu_ticks`.
const CPU_STATE_USER: usize = 0;
const CPU_STATE_SYSTEM: usize = 1;
const CPU_STATE_IDLE: usize = 2;
const CPU_STATE_NICE: usize = 3;
const CPU_STATE_MAX: usize = 4;

#[cfg(target_os = "macos")]
#[allow(deprecated)] // libc points at `mach2` for the mach port helpers
pub(super) fn read_cpu_counters() -> super::CpuCounters {
    use super::CpuCounters;

    let mut cpu_count: libc::natural_t = 0;
    let mut info: libc::processor_info_array_t = std::ptr::null_mut();
    let mut info_len: libc::mach_msg_type_number_t = 0;

    // SAFETY: out-pointers are valid locals; on success the kernel hands back
    // an `info_len`-long array that we release with `vm_deallocate`.
    let rc = unsafe {
        libc::host_processor_info(
            libc::mach_host_self(),
            libc::PROCESSOR_CPU_LOAD_INFO,
            &mut cpu_count,
            &mut info,
            &mut info_len,
        )
    };
    if rc != libc::KERN_SUCCESS || info.is_null() {
        tracing::warn!("host_processor_info failed (kern_return {rc})");
        return CpuCounters::Unavailable;
    }

    let cores = {
        // SAFETY: see above; the slice does not outlive the deallocation below.
        let raw = unsafe { std::slice::from_raw_parts(info, info_len as usize) };
        parse_cpu_load_info(raw, cpu_count as usize)
    };

    unsafe {
        libc::vm_deallocate(
            libc::mach_task_self(),
            info as libc::vm_address_t,
            info_len as libc::vm_size_t * std::mem::size_of::<libc::integer_t>() as libc::vm_size_t,
        );
    }

    if cores.is_empty() {
        CpuCounters::Unavailable
    } else {
        CpuCounters::Ticks(cores)
    }
}

/// Split the flat `cpu_ticks` array into per-core counters.
///
/// Mach has no separate interrupt bucket, so `irq` stays 0. A trailing
/// partial record is dropped.
pub fn parse_cpu_load_info(raw: &[i32], cpu_count: usize) -> Vec<CoreTimes> {
    // Tick counters are `natural_t` (unsigned) in an `integer_t` array.
    let tick = |v: i32| u64::from(v as u32);
    raw.chunks_exact(CPU_STATE_MAX)
        .take(cpu_count)
        .map(|slots| CoreTimes {
            user:   tick(slots[CPU_STATE_USER]),
            nice:   tick(slots[CPU_STATE_NICE]),
            system: tick(slots[CPU_STATE_SYSTEM]),
            idle:   tick(slots[CPU_STATE_IDLE]),
            irq:    0,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_slots_per_core() {
        // user, system, idle, nice for two cores
        let raw = [10, 20, 300, 4, 11, 21, 301, 5];
        let cores = parse_cpu_load_info(&raw, 2);
        assert_eq!(
            cores,
            vec![
                CoreTimes { user: 10, nice: 4, system: 20, idle: 300, irq: 0 },
                CoreTimes { user: 11, nice: 5, system: 21, idle: 301, irq: 0 },
            ]
        );
    }

    #[test]
    fn respects_reported_core_count() {
        let raw = [1, 2, 3, 4, 5, 6, 7, 8];
        assert_eq!(parse_cpu_load_info(&raw, 1).len(), 1);
        assert_eq!(parse_cpu_load_info(&raw[..6], 2).len(), 1);
    }

    #[test]
    fn ticks_are_unsigned() {
        let cores = parse_cpu_load_info(&[-1, 0, 0, 0], 1);
        assert_eq!(cores[0].user, u64::from(u32::MAX));
    }
}
