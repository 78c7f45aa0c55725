//! Host resource sampling: CPU, memory and disk usage plus a rolling window
//! of recent samples for short-term averages.

pub mod collector;
pub mod cpu;
pub mod disk;
pub mod history;
pub mod memory;
pub mod monitor;
pub mod platform;
pub mod probe;

pub use collector::Collector;
pub use history::{History, DEFAULT_HISTORY_LEN};
pub use monitor::{spawn_monitor, Cadence, MonitorHandle};
pub use platform::{resolve_target, DiskTarget, EnvMarkers, Platform};
pub use probe::{HostProbe, SystemProbe};
