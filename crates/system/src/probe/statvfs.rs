//! Filesystem block stats from `statvfs(3)`.

use super::FsStats;

/// Normalize `statvfs` fields. `f_frsize` is the unit of the block counts;
/// some systems leave it 0 and expect `f_bsize` instead.
pub fn block_stats(fragment_size: u64, block_size: u64, blocks: u64, blocks_free: u64) -> FsStats {
    FsStats {
        block_size: if fragment_size > 0 { fragment_size } else { block_size },
        blocks,
        blocks_free,
    }
}

#[cfg(unix)]
pub(super) fn statfs(path: &std::path::Path) -> pulse_core::Result<FsStats> {
    use pulse_core::PulseError;
    use std::ffi::CString;
    use std::os::unix::ffi::OsStrExt;

    let c_path = CString::new(path.as_os_str().as_bytes())
        .map_err(|e| PulseError::System(format!("invalid path '{}': {e}", path.display())))?;

    // SAFETY: statvfs is plain old data; zero is a valid bit pattern.
    let mut stats: libc::statvfs = unsafe { std::mem::zeroed() };
    // SAFETY: `c_path` is NUL-terminated and `stats` is a valid out-pointer.
    if unsafe { libc::statvfs(c_path.as_ptr(), &mut stats) } != 0 {
        return Err(std::io::Error::last_os_error().into());
    }

    // Field widths differ per platform.
    #[allow(clippy::unnecessary_cast)]
    Ok(block_stats(
        stats.f_frsize as u64,
        stats.f_bsize as u64,
        stats.f_blocks as u64,
        stats.f_bfree as u64, // includes root-reserved blocks
    ))
}
