//! Machine-wide ticks and volume stats from the Win32 API.

use super::CoreTimes;

/// `FILETIME` halves as one 100 ns tick count.
pub fn filetime_ticks(low: u32, high: u32) -> u64 {
    (u64::from(high) << 32) | u64::from(low)
}

/// Build counters from `GetSystemTimes`. Kernel time already includes idle
/// time, so idle is taken back out of the system bucket.
pub fn system_times(idle: u64, kernel: u64, user: u64) -> CoreTimes {
    CoreTimes {
        user,
        nice: 0,
        system: kernel.saturating_sub(idle),
        idle,
        irq: 0,
    }
}

#[cfg(windows)]
pub(super) fn read_cpu_counters() -> super::CpuCounters {
    use super::CpuCounters;
    use windows_sys::Win32::Foundation::FILETIME;
    use windows_sys::Win32::System::Threading::GetSystemTimes;

    let zero = FILETIME { dwLowDateTime: 0, dwHighDateTime: 0 };
    let (mut idle, mut kernel, mut user) = (zero, zero, zero);
    // SAFETY: three valid, writable FILETIME out-pointers.
    if unsafe { GetSystemTimes(&mut idle, &mut kernel, &mut user) } == 0 {
        tracing::warn!("GetSystemTimes failed: {}", std::io::Error::last_os_error());
        return CpuCounters::Unavailable;
    }

    let ticks = |t: FILETIME| filetime_ticks(t.dwLowDateTime, t.dwHighDateTime);
    // One machine-wide record; the usage formula only needs the sums.
    CpuCounters::Ticks(vec![system_times(ticks(idle), ticks(kernel), ticks(user))])
}

#[cfg(windows)]
pub(super) fn statfs(path: &std::path::Path) -> pulse_core::Result<super::FsStats> {
    use std::os::windows::ffi::OsStrExt;
    use windows_sys::Win32::Storage::FileSystem::GetDiskFreeSpaceExW;

    let wide: Vec<u16> = path.as_os_str().encode_wide().chain(std::iter::once(0)).collect();
    let (mut available, mut total, mut free) = (0u64, 0u64, 0u64);
    // SAFETY: `wide` is NUL-terminated and outlives the call.
    if unsafe { GetDiskFreeSpaceExW(wide.as_ptr(), &mut available, &mut total, &mut free) } == 0 {
        return Err(std::io::Error::last_os_error().into());
    }

    // Total free bytes, not the caller's quota-limited share.
    Ok(super::FsStats { block_size: 1, blocks: total, blocks_free: free })
}
