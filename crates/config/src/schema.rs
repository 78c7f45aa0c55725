use pulse_core::{PulseError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration structure parsed from `pulse.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PulseConfig {
    /// Sampling cadence and history window.
    pub sampling: SamplingConfig,
}

impl PulseConfig {
    /// Reject values the monitor cannot run with.
    pub fn validate(&self) -> Result<()> {
        let s = &self.sampling;
        if s.interval_ms == 0 || s.unfocused_interval_ms == 0 {
            return Err(PulseError::Config(
                "sampling intervals must be greater than zero".into(),
            ));
        }
        if s.history_len == 0 {
            return Err(PulseError::Config(
                "history_len must hold at least one sample".into(),
            ));
        }
        Ok(())
    }
}

/// `[sampling]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    /// Cadence while the host window has focus (milliseconds).
    pub interval_ms: u64,
    /// Cadence while the host window is in the background (milliseconds).
    pub unfocused_interval_ms: u64,
    /// Rolling window capacity, in samples.
    pub history_len: usize,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            interval_ms:           2_500,
            unfocused_interval_ms: 5_000,
            history_len:           24, // one minute at the focused cadence
        }
    }
}

impl SamplingConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn unfocused_interval(&self) -> Duration {
        Duration::from_millis(self.unfocused_interval_ms)
    }
}
