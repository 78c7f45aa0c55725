pub mod error;
pub mod state;

pub use error::{PulseError, Result};
pub use state::{Averages, CpuInfo, DiskInfo, MemoryInfo, Sample, Snapshot};
